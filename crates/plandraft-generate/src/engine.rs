use plandraft_core::{Gap, Kpi, Objective, PLAN_VERSION, PlanGraph, PlanMeta, TypedLink, TypedPlan};
use plandraft_validate::{objective_to_kpi_link, validate_typed};

use crate::model::{
    BusinessContext, ClarifyingQuestions, GeneratePlanRequest, GenerationRejection, PlanOutcome,
};

const REQUIRED_CONTEXT_FIELDS: [fn(&BusinessContext) -> Option<&String>; 4] = [
    |c| c.scope.as_ref(),
    |c| c.time_horizon.as_ref(),
    |c| c.problem_statement.as_ref(),
    |c| c.success_definition.as_ref(),
];

const MAX_QUESTIONS: usize = 7;

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.is_empty())
}

fn missing_context(context: &BusinessContext) -> bool {
    REQUIRED_CONTEXT_FIELDS
        .iter()
        .any(|get| is_blank(get(context)))
}

fn build_clarifying_questions(context: &BusinessContext) -> Vec<String> {
    let mut questions = Vec::new();
    if is_blank(context.scope.as_ref()) {
        questions
            .push("What is the scope (business unit, region, or product line) for this plan?".to_string());
    }
    if is_blank(context.time_horizon.as_ref()) {
        questions.push("What is the time horizon for achieving the desired outcomes?".to_string());
    }
    if is_blank(context.problem_statement.as_ref()) {
        questions.push("What is the core problem statement to address?".to_string());
    }
    if is_blank(context.success_definition.as_ref()) {
        questions.push("How will success be defined or measured for this effort?".to_string());
    }

    if questions.len() < 3 {
        questions.extend([
            "What constraints or guardrails should the plan respect?".to_string(),
            "Which stakeholders or teams must be involved in delivering the outcomes?".to_string(),
            "Are there existing metrics that matter most for this business context?".to_string(),
        ]);
    }

    questions.truncate(MAX_QUESTIONS);
    questions
}

fn objective_priority(index: usize) -> &'static str {
    if index == 0 { "high" } else { "medium" }
}

fn build_objectives(
    problem_statement: &str,
    success_definition: &str,
    scope: &str,
) -> Vec<Objective> {
    let templates = [
        (
            format!("Resolve {problem_statement}"),
            format!("Directly addresses the stated problem: {problem_statement}."),
        ),
        (
            format!("Achieve {success_definition}"),
            format!("Aligns outcomes to the stated success definition: {success_definition}."),
        ),
        (
            format!("Sustain improvements across {scope}"),
            format!("Ensures gains are maintained within the defined scope: {scope}."),
        ),
    ];

    templates
        .into_iter()
        .enumerate()
        .map(|(index, (title, rationale))| Objective {
            id: format!("obj-{}", index + 1),
            title,
            rationale,
            owner_role: None,
            priority: objective_priority(index).to_string(),
        })
        .collect()
}

fn build_kpis(objectives: &[Objective], success_definition: &str) -> Vec<Kpi> {
    let mut kpis = Vec::with_capacity(objectives.len() * 2);
    for (obj_index, objective) in objectives.iter().enumerate() {
        for kpi_index in 0..2 {
            let definition = if kpi_index == 0 {
                format!("Measures advancement toward objective '{}'.", objective.title)
            } else {
                format!("Tracks leading indicators for '{}'.", objective.title)
            };
            kpis.push(Kpi {
                id: format!("kpi-{}-{}", obj_index + 1, kpi_index + 1),
                objective_id: objective.id.clone(),
                name: format!("Progress on {}", objective.title),
                definition,
                formula: None,
                baseline: None,
                target: format!("Aligned to success definition: {success_definition}"),
                frequency: "monthly".to_string(),
                data_source: None,
                leading_or_lagging: if kpi_index == 0 { "lagging" } else { "leading" }.to_string(),
            });
        }
    }
    kpis
}

fn build_links(kpis: &[Kpi], allowed_relationships: &[String]) -> Vec<TypedLink> {
    let link_type = if allowed_relationships.iter().any(|r| r == "objective_to_kpi") {
        "objective_to_kpi"
    } else if let Some(first) = allowed_relationships.first() {
        first.as_str()
    } else {
        "objective_to_kpi"
    };

    kpis.iter()
        .map(|kpi| {
            let mut link = objective_to_kpi_link(&kpi.objective_id, &kpi.id);
            link.link_type = link_type.to_string();
            link
        })
        .collect()
}

fn build_gaps() -> Vec<Gap> {
    vec![
        Gap {
            item: "KPI baselines".to_string(),
            needed: "Baseline values for each KPI.".to_string(),
            impact: "Cannot quantify improvement without starting measurements.".to_string(),
        },
        Gap {
            item: "KPI data sources".to_string(),
            needed: "Authoritative data sources for KPI reporting.".to_string(),
            impact: "Risk of inconsistent measurement across teams.".to_string(),
        },
        Gap {
            item: "Objective ownership".to_string(),
            needed: "Owner roles for each objective.".to_string(),
            impact: "Accountability is unclear without designated owners.".to_string(),
        },
        Gap {
            item: "Target dates".to_string(),
            needed: "Target dates for KPI achievement.".to_string(),
            impact: "Unable to sequence delivery without timelines.".to_string(),
        },
    ]
}

/// Generate a typed business plan from the request context, or return
/// clarifying questions when any required context field is missing.
///
/// Template filling is deterministic: the same request always yields the
/// same plan. The generated plan is self-validated in typed mode before
/// being returned.
pub fn generate_plan(request: &GeneratePlanRequest) -> PlanOutcome {
    let context = &request.business_context;
    if missing_context(context) {
        return PlanOutcome::Questions(ClarifyingQuestions {
            clarifying_questions: build_clarifying_questions(context),
        });
    }

    let scope = context.scope.as_deref().unwrap_or_default();
    let success_definition = context.success_definition.as_deref().unwrap_or_default();
    let objectives = build_objectives(
        context.problem_statement.as_deref().unwrap_or_default(),
        success_definition,
        scope,
    );
    let kpis = build_kpis(&objectives, success_definition);
    let links = build_links(&kpis, &request.allowed_relationships);

    let plan: TypedPlan = PlanGraph {
        plan: PlanMeta {
            name: context
                .plan_name
                .clone()
                .unwrap_or_else(|| format!("{scope} Business Plan")),
            horizon: context.time_horizon.clone().unwrap_or_default(),
            scope: scope.to_string(),
            themes: vec![
                "Problem resolution".to_string(),
                "Success definition alignment".to_string(),
            ],
            created_at: None,
            version: PLAN_VERSION.to_string(),
        },
        objectives,
        kpis,
        initiatives: request.flags.include_initiatives.then(Vec::new),
        capabilities: request.flags.include_capabilities.then(Vec::new),
        outputs: request.flags.include_outputs.then(Vec::new),
        links,
        assumptions_and_gaps: build_gaps(),
    };

    let report = validate_typed(&plan, &request.flags);
    if !report.is_ok() {
        return PlanOutcome::Rejected(GenerationRejection {
            errors: report.errors,
            required_user_inputs: vec![
                "Provide missing relationships or required fields highlighted in errors."
                    .to_string(),
            ],
        });
    }

    PlanOutcome::Plan(Box::new(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plandraft_core::Flags;

    fn complete_context() -> BusinessContext {
        BusinessContext {
            scope: Some("Customer Support".to_string()),
            time_horizon: Some("12 months".to_string()),
            problem_statement: Some("rising first-response times".to_string()),
            success_definition: Some("90% CSAT".to_string()),
            plan_name: None,
            summary: None,
            goals: None,
            current_state: None,
        }
    }

    fn request() -> GeneratePlanRequest {
        GeneratePlanRequest {
            business_context: complete_context(),
            constraints: None,
            flags: Flags::default(),
            allowed_relationships: vec!["objective_to_kpi".to_string()],
            generation_controls: None,
        }
    }

    #[test]
    fn complete_context_yields_valid_plan() {
        let PlanOutcome::Plan(plan) = generate_plan(&request()) else {
            panic!("expected a plan");
        };
        assert_eq!(plan.objectives.len(), 3);
        assert_eq!(plan.kpis.len(), 6);
        assert_eq!(plan.links.len(), 6);
        assert_eq!(plan.plan.name, "Customer Support Business Plan");
        assert!(plan.initiatives.is_none());
        let report = validate_typed(&plan, &Flags::default());
        assert!(report.is_ok());
    }

    #[test]
    fn missing_fields_yield_targeted_questions() {
        let mut req = request();
        req.business_context.problem_statement = None;
        req.business_context.success_definition = Some(String::new());
        let PlanOutcome::Questions(questions) = generate_plan(&req) else {
            panic!("expected clarifying questions");
        };
        let qs = questions.clarifying_questions;
        assert!(qs.iter().any(|q| q.contains("problem statement")));
        assert!(qs.iter().any(|q| q.contains("success")));
        assert!(qs.len() <= 7);
    }

    #[test]
    fn single_missing_field_pads_with_generic_questions() {
        let mut req = request();
        req.business_context.scope = None;
        let PlanOutcome::Questions(questions) = generate_plan(&req) else {
            panic!("expected clarifying questions");
        };
        let qs = questions.clarifying_questions;
        // One targeted question, padded with the three generic ones.
        assert_eq!(qs.len(), 4);
        assert!(qs[0].contains("scope"));
        assert!(qs[1].contains("constraints or guardrails"));
    }

    #[test]
    fn first_allowed_relationship_is_used_when_canonical_is_absent() {
        let mut req = request();
        req.allowed_relationships = vec!["objective_supports_kpi".to_string()];
        let PlanOutcome::Plan(plan) = generate_plan(&req) else {
            panic!("expected a plan");
        };
        assert!(plan
            .links
            .iter()
            .all(|link| link.link_type == "objective_supports_kpi"));
    }

    #[test]
    fn enabled_sections_are_present_and_empty() {
        let mut req = request();
        req.flags = Flags {
            include_outputs: true,
            ..Flags::default()
        };
        let PlanOutcome::Plan(plan) = generate_plan(&req) else {
            panic!("expected a plan");
        };
        assert_eq!(plan.outputs.as_ref().map(Vec::len), Some(0));
        assert!(plan.capabilities.is_none());
    }

    #[test]
    fn generation_is_deterministic() {
        let req = request();
        let first = serde_json::to_value(generate_plan(&req)).expect("serialize");
        let second = serde_json::to_value(generate_plan(&req)).expect("serialize");
        assert_eq!(first, second);
    }
}
