//! Deterministic plan generation for Plandraft.
//!
//! Turns a business context into a plan graph by template filling, or into
//! clarifying questions when required context fields are missing. Generated
//! typed plans are self-validated with `plandraft-validate` before they are
//! returned.

pub mod draft;
pub mod engine;
pub mod model;

pub use draft::draft_plan;
pub use engine::generate_plan;
pub use model::{
    BusinessContext, ClarifyingQuestions, DraftOutcome, GeneratePlanRequest, GenerationRejection,
    PlanOutcome,
};
