use std::collections::HashSet;
use std::fmt;

use plandraft_core::{Flags, ImplicitPlan, Section};

/// Discriminable kinds of implicit-mode rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    MissingObjectives,
    MissingKpis,
    DanglingKpiReference,
    MissingObjectiveToKpiLink,
    DisabledSectionPresent,
}

/// A single implicit-mode rule violation.
///
/// Call sites that only want the historical list-of-strings shape can use
/// [`messages`]; tests discriminate on `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanViolation {
    pub kind: ViolationKind,
    pub message: String,
}

impl PlanViolation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lower violations to their human-readable messages.
pub fn messages(violations: &[PlanViolation]) -> Vec<String> {
    violations.iter().map(|v| v.message.clone()).collect()
}

/// Validate a plan graph with implicit links (Mode A).
///
/// Checks run in a fixed order and accumulate; the result is empty iff the
/// graph is valid. A disabled optional section counts as present whenever
/// the field is non-null, including an empty list.
pub fn validate_implicit(plan: &ImplicitPlan, flags: &Flags) -> Vec<PlanViolation> {
    let mut violations = Vec::new();

    if plan.objectives.is_empty() {
        violations.push(PlanViolation::new(
            ViolationKind::MissingObjectives,
            "At least one objective is required.",
        ));
    }

    if plan.kpis.is_empty() {
        violations.push(PlanViolation::new(
            ViolationKind::MissingKpis,
            "At least one KPI is required.",
        ));
    }

    let objective_ids: HashSet<&str> = plan
        .objectives
        .iter()
        .map(|objective| objective.id.as_str())
        .collect();
    for kpi in &plan.kpis {
        if !objective_ids.contains(kpi.objective_id.as_str()) {
            violations.push(PlanViolation::new(
                ViolationKind::DanglingKpiReference,
                format!(
                    "KPI '{}' references missing objective '{}'.",
                    kpi.id, kpi.objective_id
                ),
            ));
        }
    }

    let link_pairs: HashSet<(&str, &str)> = plan
        .links
        .iter()
        .map(|link| (link.source_id.as_str(), link.target_id.as_str()))
        .collect();
    for kpi in &plan.kpis {
        if !link_pairs.contains(&(kpi.objective_id.as_str(), kpi.id.as_str())) {
            violations.push(PlanViolation::new(
                ViolationKind::MissingObjectiveToKpiLink,
                format!(
                    "Missing link from objective '{}' to KPI '{}'.",
                    kpi.objective_id, kpi.id
                ),
            ));
        }
    }

    for section in Section::ALL {
        if !flags.is_enabled(section) && plan.section(section).is_some() {
            violations.push(PlanViolation::new(
                ViolationKind::DisabledSectionPresent,
                format!(
                    "{} are present but disabled by flags.",
                    section.display_name()
                ),
            ));
        }
    }

    violations
}
