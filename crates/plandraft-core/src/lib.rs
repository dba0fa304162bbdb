//! Core contracts for Plandraft.
//!
//! This crate defines the plan-graph entity types, the shape-level
//! constraints enforced at construction time, and the JSON Schema emission
//! for plan documents. Cross-reference validation lives in
//! `plandraft-validate`.

pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result, ShapeError};
pub use model::{
    EntityKind, Flags, Gap, ImplicitLink, ImplicitPlan, Kpi, Objective, PlanGraph, PlanMeta,
    Section, SectionItem, TypedLink, TypedPlan,
};
pub use schema::plan_json_schema;

/// Current contract version for plan documents.
pub const PLAN_VERSION: &str = "v1";
