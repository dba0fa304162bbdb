use std::collections::{HashMap, HashSet};

use plandraft_core::{EntityKind, Flags, Section, TypedLink, TypedPlan};

use crate::errors::{ValidationIssue, ValidationReport};

/// Validate a plan graph with typed links (Mode B).
///
/// Checks run in a fixed order and accumulate into a structured report; the
/// input is never mutated. A disabled optional section counts as present
/// whenever the field is non-null, including an empty list (the same
/// semantics as the implicit mode).
pub fn validate_typed(plan: &TypedPlan, flags: &Flags) -> ValidationReport {
    let mut errors = Vec::new();

    if plan.objectives.is_empty() {
        errors.push(
            ValidationIssue::new(
                "objectives_required",
                "objectives",
                "At least one objective is required.",
            )
            .with_hint("add at least one objective"),
        );
    }

    if plan.kpis.is_empty() {
        errors.push(
            ValidationIssue::new("kpis_required", "kpis", "At least one KPI is required.")
                .with_hint("add at least one KPI"),
        );
    }

    let objective_ids: HashSet<&str> = plan
        .objectives
        .iter()
        .map(|objective| objective.id.as_str())
        .collect();

    let mut kpis_by_objective: HashMap<&str, Vec<&str>> = plan
        .objectives
        .iter()
        .map(|objective| (objective.id.as_str(), Vec::new()))
        .collect();
    for (index, kpi) in plan.kpis.iter().enumerate() {
        if !objective_ids.contains(kpi.objective_id.as_str()) {
            errors.push(ValidationIssue::new(
                "kpi_unknown_objective",
                format!("kpis[{index}].objective_id"),
                format!(
                    "KPI '{}' references unknown objective '{}'.",
                    kpi.id, kpi.objective_id
                ),
            ));
        } else if let Some(registered) = kpis_by_objective.get_mut(kpi.objective_id.as_str()) {
            registered.push(kpi.id.as_str());
        }
    }

    for (index, objective) in plan.objectives.iter().enumerate() {
        let has_kpi = kpis_by_objective
            .get(objective.id.as_str())
            .is_some_and(|registered| !registered.is_empty());
        if !has_kpi {
            errors.push(ValidationIssue::new(
                "objective_missing_kpi",
                format!("objectives[{index}].id"),
                format!("Objective '{}' must have at least one KPI.", objective.id),
            ));
        }
    }

    for section in Section::ALL {
        if !flags.is_enabled(section) && plan.section(section).is_some() {
            errors.push(
                ValidationIssue::new(
                    format!("{}_disabled", section.as_str()),
                    section.as_str(),
                    format!(
                        "{} are present but disabled by flags.",
                        section.display_name()
                    ),
                )
                .with_hint("enable the flag or remove the section"),
            );
        }
    }

    let registry = IdRegistry::build(plan);
    for (index, link) in plan.links.iter().enumerate() {
        validate_endpoint(
            &registry,
            index,
            "from",
            &link.from_type,
            &link.from_id,
            &mut errors,
        );
        validate_endpoint(
            &registry,
            index,
            "to",
            &link.to_type,
            &link.to_id,
            &mut errors,
        );
    }

    ValidationReport::from_errors(errors)
}

fn validate_endpoint(
    registry: &IdRegistry<'_>,
    index: usize,
    role: &str,
    type_name: &str,
    id: &str,
    errors: &mut Vec<ValidationIssue>,
) {
    match EntityKind::from_name(type_name) {
        None => {
            errors.push(ValidationIssue::new(
                "link_unknown_type",
                format!("links[{index}].{role}_type"),
                format!("Link {role}_type '{type_name}' is not recognized."),
            ));
        }
        Some(kind) => {
            if !registry.contains(kind, id) {
                errors.push(ValidationIssue::new(
                    "link_unknown_id",
                    format!("links[{index}].{role}_id"),
                    format!("Link {role}_id '{id}' not found for type '{type_name}'."),
                ));
            }
        }
    }
}

/// Live ids per entity kind; absent optional sections contribute empty sets.
struct IdRegistry<'a> {
    ids: HashMap<EntityKind, HashSet<&'a str>>,
}

impl<'a> IdRegistry<'a> {
    fn build(plan: &'a TypedPlan) -> Self {
        let mut ids: HashMap<EntityKind, HashSet<&'a str>> = HashMap::new();
        ids.insert(
            EntityKind::Objective,
            plan.objectives.iter().map(|o| o.id.as_str()).collect(),
        );
        ids.insert(
            EntityKind::Kpi,
            plan.kpis.iter().map(|k| k.id.as_str()).collect(),
        );
        for (kind, section) in [
            (EntityKind::Initiative, Section::Initiatives),
            (EntityKind::Capability, Section::Capabilities),
            (EntityKind::Output, Section::Outputs),
        ] {
            ids.insert(
                kind,
                plan.section(section)
                    .unwrap_or_default()
                    .iter()
                    .map(|item| item.id.as_str())
                    .collect(),
            );
        }
        Self { ids }
    }

    fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.ids
            .get(&kind)
            .is_some_and(|entries| entries.contains(id))
    }
}

/// Shorthand for a valid objective→KPI typed link.
pub fn objective_to_kpi_link(objective_id: &str, kpi_id: &str) -> TypedLink {
    TypedLink {
        from_type: EntityKind::Objective.as_str().to_string(),
        from_id: objective_id.to_string(),
        to_type: EntityKind::Kpi.as_str().to_string(),
        to_id: kpi_id.to_string(),
        link_type: "objective_to_kpi".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plandraft_core::{Kpi, Objective, PlanGraph, PlanMeta, SectionItem};

    fn meta() -> PlanMeta {
        PlanMeta {
            name: "Support Business Plan".to_string(),
            horizon: "2 quarters".to_string(),
            scope: "Support".to_string(),
            themes: vec!["Problem resolution".to_string()],
            created_at: None,
            version: "v1".to_string(),
        }
    }

    fn objective(id: &str) -> Objective {
        Objective {
            id: id.to_string(),
            title: format!("Objective {id}"),
            rationale: "Addresses the stated problem.".to_string(),
            owner_role: None,
            priority: "high".to_string(),
        }
    }

    fn kpi(id: &str, objective_id: &str) -> Kpi {
        Kpi {
            id: id.to_string(),
            objective_id: objective_id.to_string(),
            name: format!("KPI {id}"),
            definition: "Measures progress.".to_string(),
            formula: None,
            baseline: None,
            target: "Aligned to success definition".to_string(),
            frequency: "monthly".to_string(),
            data_source: None,
            leading_or_lagging: "lagging".to_string(),
        }
    }

    fn golden_plan() -> TypedPlan {
        PlanGraph::new(
            meta(),
            vec![objective("obj-1")],
            vec![kpi("kpi-1", "obj-1")],
            vec![objective_to_kpi_link("obj-1", "kpi-1")],
        )
        .expect("golden plan has valid shape")
    }

    #[test]
    fn golden_plan_is_valid() {
        let report = validate_typed(&golden_plan(), &Flags::default());
        assert!(report.is_ok());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn empty_objectives_reports_objectives_required() {
        let mut plan = golden_plan();
        plan.objectives.clear();
        let report = validate_typed(&plan, &Flags::default());
        assert!(!report.ok);
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "objectives_required")
            .expect("objectives_required reported");
        assert_eq!(issue.path, "objectives");
    }

    #[test]
    fn unknown_objective_reference_is_one_error() {
        let mut plan = golden_plan();
        plan.kpis[0].objective_id = "missing-objective".to_string();
        // Drop the link so only the dangling reference and the now-orphaned
        // objective are reported.
        plan.links.clear();
        let report = validate_typed(&plan, &Flags::default());
        assert!(!report.ok);
        let unknown: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.code == "kpi_unknown_objective")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].path, "kpis[0].objective_id");
        assert!(unknown[0].message.contains("missing-objective"));
    }

    #[test]
    fn objective_without_kpi_is_reported_by_index() {
        let mut plan = golden_plan();
        plan.objectives.push(objective("obj-2"));
        let report = validate_typed(&plan, &Flags::default());
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "objective_missing_kpi")
            .expect("objective_missing_kpi reported");
        assert_eq!(issue.path, "objectives[1].id");
        assert!(issue.message.contains("obj-2"));
    }

    #[test]
    fn empty_disabled_outputs_are_flagged() {
        let mut plan = golden_plan();
        plan.outputs = Some(Vec::new());
        let report = validate_typed(&plan, &Flags::default());
        assert!(!report.ok);
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "outputs_disabled")
            .expect("outputs_disabled reported");
        assert_eq!(issue.path, "outputs");
    }

    #[test]
    fn disabled_section_is_one_error_not_one_per_item() {
        let mut plan = golden_plan();
        plan.capabilities = Some(vec![
            SectionItem {
                id: "cap-1".to_string(),
                name: "Reporting".to_string(),
                description: None,
            },
            SectionItem {
                id: "cap-2".to_string(),
                name: "Forecasting".to_string(),
                description: None,
            },
        ]);
        let report = validate_typed(&plan, &Flags::default());
        let disabled: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.code == "capabilities_disabled")
            .collect();
        assert_eq!(disabled.len(), 1);
    }

    #[test]
    fn unknown_link_type_is_reported_not_dropped() {
        let mut plan = golden_plan();
        plan.links[0].from_type = "milestone".to_string();
        let report = validate_typed(&plan, &Flags::default());
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "link_unknown_type")
            .expect("link_unknown_type reported");
        assert_eq!(issue.path, "links[0].from_type");
        assert!(issue.message.contains("milestone"));
    }

    #[test]
    fn unknown_link_id_is_checked_per_declared_type() {
        let mut plan = golden_plan();
        plan.links
            .push(objective_to_kpi_link("obj-1", "kpi-ghost"));
        let report = validate_typed(&plan, &Flags::default());
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "link_unknown_id")
            .expect("link_unknown_id reported");
        assert_eq!(issue.path, "links[1].to_id");
        assert!(issue.message.contains("kpi-ghost"));
    }

    #[test]
    fn link_into_enabled_section_resolves_against_its_id_set() {
        let mut plan = golden_plan();
        plan.initiatives = Some(vec![SectionItem {
            id: "init-1".to_string(),
            name: "Triage rota".to_string(),
            description: None,
        }]);
        plan.links.push(TypedLink {
            from_type: "objective".to_string(),
            from_id: "obj-1".to_string(),
            to_type: "initiative".to_string(),
            to_id: "init-1".to_string(),
            link_type: "objective_to_initiative".to_string(),
        });
        let flags = Flags {
            include_initiatives: true,
            ..Flags::default()
        };
        let report = validate_typed(&plan, &flags);
        assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn link_into_absent_section_reports_unknown_id() {
        let mut plan = golden_plan();
        plan.links.push(TypedLink {
            from_type: "objective".to_string(),
            from_id: "obj-1".to_string(),
            to_type: "output".to_string(),
            to_id: "out-1".to_string(),
            link_type: "objective_to_output".to_string(),
        });
        let report = validate_typed(&plan, &Flags::default());
        let issue = report
            .errors
            .iter()
            .find(|e| e.code == "link_unknown_id")
            .expect("absent section yields an empty id set");
        assert_eq!(issue.path, "links[1].to_id");
    }

    #[test]
    fn validation_is_idempotent() {
        let mut plan = golden_plan();
        plan.kpis[0].objective_id = "missing-objective".to_string();
        plan.outputs = Some(Vec::new());
        let first = validate_typed(&plan, &Flags::default());
        let second = validate_typed(&plan, &Flags::default());
        assert_eq!(first, second);
    }
}
