use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use plandraft_core::{Flags, ImplicitPlan, TypedPlan};
use plandraft_validate::ValidationIssue;

/// Input context a plan is generated from. All fields are optional; missing
/// required ones turn into clarifying questions instead of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BusinessContext {
    /// Scope (business unit, region, or product line).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Time horizon for achieving the desired outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_horizon: Option<String>,
    /// Core problem statement to address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    /// How success will be defined or measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_definition: Option<String>,
    /// Explicit plan name; derived from scope when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// Concise context summary (used by the draft generator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Primary business goals (used by the draft generator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    /// Description of the current state, carried but not templated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
}

/// Request payload for plan generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub business_context: BusinessContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default)]
    pub flags: Flags,
    /// Authoritative list of allowed relationship types.
    #[serde(default)]
    pub allowed_relationships: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_controls: Option<BTreeMap<String, String>>,
}

/// Clarifying questions returned when essential context is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClarifyingQuestions {
    pub clarifying_questions: Vec<String>,
}

/// Validation errors returned when a generated plan is invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRejection {
    pub errors: Vec<ValidationIssue>,
    pub required_user_inputs: Vec<String>,
}

/// Result of typed-mode plan generation. Serializes untagged so callers
/// receive either a plan, questions, or a rejection body.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PlanOutcome {
    Plan(Box<TypedPlan>),
    Questions(ClarifyingQuestions),
    Rejected(GenerationRejection),
}

/// Result of implicit-mode drafting.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DraftOutcome {
    Plan(Box<ImplicitPlan>),
    Questions(ClarifyingQuestions),
}
