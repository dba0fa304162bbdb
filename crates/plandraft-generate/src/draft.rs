use chrono::Utc;

use plandraft_core::{Gap, ImplicitLink, ImplicitPlan, Kpi, Objective, PLAN_VERSION, PlanMeta};

use crate::model::{ClarifyingQuestions, DraftOutcome, GeneratePlanRequest};

fn draft_questions(request: &GeneratePlanRequest) -> Vec<String> {
    let context = &request.business_context;
    let mut questions = Vec::new();
    if context.summary.as_deref().is_none_or(str::is_empty) {
        questions.push("Provide a concise business context summary.".to_string());
    }
    if context.goals.as_deref().is_none_or(<[String]>::is_empty) {
        questions.push(
            "List the primary business goals to translate into objectives and KPIs.".to_string(),
        );
    }
    questions
}

/// Draft an implicit-link plan from a summary and goal list: one objective
/// per goal, one KPI per objective, one objective→KPI link per KPI.
///
/// Unlike [`crate::generate_plan`], the draft records its creation time, so
/// only the graph content is deterministic.
pub fn draft_plan(request: &GeneratePlanRequest) -> DraftOutcome {
    let questions = draft_questions(request);
    if !questions.is_empty() {
        return DraftOutcome::Questions(ClarifyingQuestions {
            clarifying_questions: questions,
        });
    }

    let goals = request.business_context.goals.as_deref().unwrap_or_default();

    let objectives: Vec<Objective> = goals
        .iter()
        .enumerate()
        .map(|(index, goal)| Objective {
            id: format!("obj-{}", index + 1),
            title: goal.clone(),
            rationale: String::new(),
            owner_role: None,
            priority: "medium".to_string(),
        })
        .collect();

    let kpis: Vec<Kpi> = objectives
        .iter()
        .enumerate()
        .map(|(index, objective)| Kpi {
            id: format!("kpi-{}", index + 1),
            objective_id: objective.id.clone(),
            name: format!("Progress toward {}", objective.title),
            definition: String::new(),
            formula: None,
            baseline: None,
            target: String::new(),
            frequency: String::new(),
            data_source: None,
            leading_or_lagging: String::new(),
        })
        .collect();

    let links: Vec<ImplicitLink> = kpis
        .iter()
        .enumerate()
        .map(|(index, kpi)| ImplicitLink {
            id: format!("link-{}", index + 1),
            source_id: kpi.objective_id.clone(),
            target_id: kpi.id.clone(),
            link_type: "objective_to_kpi".to_string(),
        })
        .collect();

    let plan = ImplicitPlan {
        plan: PlanMeta {
            name: "Business Case Plan".to_string(),
            horizon: String::new(),
            scope: String::new(),
            themes: Vec::new(),
            created_at: Some(Utc::now()),
            version: PLAN_VERSION.to_string(),
        },
        objectives,
        kpis,
        initiatives: request.flags.include_initiatives.then(Vec::new),
        capabilities: request.flags.include_capabilities.then(Vec::new),
        outputs: request.flags.include_outputs.then(Vec::new),
        links,
        assumptions_and_gaps: vec![Gap {
            item: "Measurement metadata".to_string(),
            needed: "Baseline values, data sources, owners, and target dates.".to_string(),
            impact: "KPIs remain unquantified until confirmed.".to_string(),
        }],
    };

    DraftOutcome::Plan(Box::new(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BusinessContext;
    use plandraft_core::Flags;
    use plandraft_validate::validate_implicit;

    fn request() -> GeneratePlanRequest {
        GeneratePlanRequest {
            business_context: BusinessContext {
                summary: Some("Support operations are falling behind.".to_string()),
                goals: Some(vec![
                    "Cut onboarding time in half".to_string(),
                    "Raise trial conversion".to_string(),
                ]),
                ..BusinessContext::default()
            },
            ..GeneratePlanRequest::default()
        }
    }

    #[test]
    fn draft_plan_passes_implicit_validation() {
        let req = request();
        let DraftOutcome::Plan(plan) = draft_plan(&req) else {
            panic!("expected a plan");
        };
        assert_eq!(plan.objectives.len(), 2);
        assert_eq!(plan.kpis.len(), 2);
        assert!(validate_implicit(&plan, &req.flags).is_empty());
    }

    #[test]
    fn missing_summary_and_goals_yield_both_questions() {
        let mut req = request();
        req.business_context.summary = None;
        req.business_context.goals = Some(Vec::new());
        let DraftOutcome::Questions(questions) = draft_plan(&req) else {
            panic!("expected questions");
        };
        assert_eq!(questions.clarifying_questions.len(), 2);
    }
}
