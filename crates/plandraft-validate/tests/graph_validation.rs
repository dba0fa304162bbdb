use std::fs;
use std::path::Path;

use plandraft_core::{Flags, ImplicitPlan, TypedPlan, plan_json_schema};
use plandraft_validate::{
    ViolationKind, messages, validate_implicit, validate_plan, validate_typed,
};

fn load_json(name: &str) -> serde_json::Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn golden_typed() -> TypedPlan {
    TypedPlan::from_json(&load_json("golden_plan.typed.json")).expect("parse typed golden plan")
}

fn golden_implicit() -> ImplicitPlan {
    ImplicitPlan::from_json(&load_json("golden_plan.implicit.json"))
        .expect("parse implicit golden plan")
}

#[test]
fn typed_golden_plan_is_valid_with_all_sections_enabled() {
    let report = validate_typed(&golden_typed(), &Flags::all(true));
    assert!(report.ok, "unexpected errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[test]
fn typed_golden_plan_fails_with_flags_all_false() {
    let report = validate_typed(&golden_typed(), &Flags::default());
    let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(
        codes,
        vec![
            "initiatives_disabled",
            "capabilities_disabled",
            "outputs_disabled"
        ]
    );
}

#[test]
fn typed_golden_plan_passes_full_pipeline() {
    let schema = serde_json::to_value(plan_json_schema()).expect("serialize schema");
    let plan = validate_plan(&load_json("golden_plan.typed.json"), &schema, &Flags::all(true))
        .expect("pipeline accepts golden plan");
    assert_eq!(plan.kpis.len(), 2);
}

#[test]
fn typed_dangling_kpi_reference_is_reported() {
    let mut document = load_json("golden_plan.typed.json");
    document["kpis"][0]["objective_id"] = serde_json::json!("missing-objective");
    let plan = TypedPlan::from_json(&document).expect("parse");
    let report = validate_typed(&plan, &Flags::all(true));
    assert!(!report.ok);
    assert!(report
        .errors
        .iter()
        .any(|e| e.code == "kpi_unknown_objective"));
}

#[test]
fn implicit_golden_plan_is_valid() {
    let violations = validate_implicit(&golden_implicit(), &Flags::default());
    assert!(violations.is_empty(), "unexpected: {violations:?}");
}

#[test]
fn implicit_dangling_reference_message_names_both_ids() {
    let mut plan = golden_implicit();
    plan.kpis[0].objective_id = "missing-obj".to_string();
    let violations = validate_implicit(&plan, &Flags::default());
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationKind::DanglingKpiReference
            && v.message.contains("kpi-1")
            && v.message.contains("missing-obj")));
}

#[test]
fn implicit_disabled_outputs_match_legacy_message() {
    let mut plan = golden_implicit();
    plan.outputs = Some(Vec::new());
    let violations = validate_implicit(&plan, &Flags::default());
    assert!(messages(&violations).contains(&"Outputs are present but disabled by flags.".to_string()));
}

#[test]
fn both_modes_agree_on_empty_disabled_sections() {
    // Resolved open question: Some(vec![]) is "present" in both modes.
    let mut typed = golden_typed();
    typed.initiatives = Some(Vec::new());
    typed.capabilities = None;
    typed.outputs = None;
    let typed_report = validate_typed(&typed, &Flags::default());
    assert!(typed_report
        .errors
        .iter()
        .any(|e| e.code == "initiatives_disabled"));

    let mut implicit = golden_implicit();
    implicit.initiatives = Some(Vec::new());
    let violations = validate_implicit(&implicit, &Flags::default());
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationKind::DisabledSectionPresent));
}
