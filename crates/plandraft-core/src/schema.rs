use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::TypedPlan;

/// Emit the JSON Schema for typed plan documents.
pub fn plan_json_schema() -> RootSchema {
    schema_for!(TypedPlan)
}
