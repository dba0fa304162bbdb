use jsonschema::JSONSchema;
use serde_json::Value;

use plandraft_core::{Flags, TypedPlan};

use crate::errors::{PlanError, ValidationIssue, ValidationReport};
use crate::typed::validate_typed;

/// Validate a raw plan document against the plan JSON Schema.
///
/// Structural violations are reported as `schema_violation` issues with
/// JSON-pointer paths; schema compilation failure is a `PlanError`.
pub fn validate_plan_json(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidationReport, PlanError> {
    let compiled =
        JSONSchema::compile(plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut errors = Vec::new();
    if let Err(violations) = compiled.validate(plan_json) {
        for violation in violations {
            let path = normalized_json_pointer(&violation.instance_path.to_string());
            errors.push(ValidationIssue::new(
                "schema_violation",
                path,
                violation.to_string(),
            ));
        }
    }

    Ok(ValidationReport::from_errors(errors))
}

/// Validate a typed plan document end to end: structural pass, typed
/// deserialization, then the Mode B graph rules.
///
/// Errors batch within each stage; the first failing stage's report is
/// returned so the caller can fix all problems it surfaced in one pass.
pub fn validate_plan(
    plan_json: &Value,
    plan_schema: &Value,
    flags: &Flags,
) -> Result<TypedPlan, ValidationReport> {
    let structural = match validate_plan_json(plan_json, plan_schema) {
        Ok(report) => report,
        Err(err) => {
            return Err(ValidationReport::from_errors(vec![ValidationIssue::new(
                "schema_validation_error",
                "/",
                err.to_string(),
            )]));
        }
    };
    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: TypedPlan = match serde_json::from_value(plan_json.clone()) {
        Ok(plan) => plan,
        Err(err) => {
            return Err(ValidationReport::from_errors(vec![ValidationIssue::new(
                "invalid_plan_json",
                "/",
                err.to_string(),
            )]));
        }
    };

    let report = validate_typed(&plan, flags);
    if !report.is_ok() {
        return Err(report);
    }

    Ok(plan)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
