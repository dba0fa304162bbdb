//! Plan-graph validation for Plandraft.
//!
//! One validator, two operating modes sharing the entity vocabulary of
//! `plandraft-core`:
//!
//! - **implicit** — graphs whose links carry bare source/target ids with
//!   the endpoint roles implied (objective→KPI). Violations come back as
//!   tagged, human-readable messages.
//! - **typed** — graphs whose links declare endpoint types checked against
//!   the entity-kind registry. Violations come back as structured
//!   `{code, message, path}` records in a `ValidationReport`.
//!
//! Both modes are pure and accumulate every violation instead of stopping
//! at the first; rule violations are data, never `Err`. In both modes a
//! disabled optional section is considered present whenever its field is
//! non-null, empty list included.

pub mod document;
pub mod errors;
pub mod implicit;
pub mod typed;

pub use document::{validate_plan, validate_plan_json};
pub use errors::{PlanError, Result, ValidationIssue, ValidationReport};
pub use implicit::{PlanViolation, ViolationKind, messages, validate_implicit};
pub use typed::{objective_to_kpi_link, validate_typed};
