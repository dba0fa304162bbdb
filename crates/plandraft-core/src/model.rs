use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::ShapeError;

/// Top-level plan metadata. Carried verbatim, never cross-validated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanMeta {
    /// Display name of the plan.
    #[serde(alias = "title")]
    pub name: String,
    /// Time horizon for achieving the plan outcomes.
    #[serde(default)]
    pub horizon: String,
    /// Scope of the plan (business unit, region, product line).
    #[serde(default)]
    pub scope: String,
    /// High-level themes the plan is organized around.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
    /// Timestamp of plan creation when one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Contract version of the plan document.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    crate::PLAN_VERSION.to_string()
}

/// Business objective the plan intends to achieve.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Objective {
    pub id: String,
    /// Statement of the objective.
    #[serde(alias = "name")]
    pub title: String,
    /// Why this objective matters.
    #[serde(default)]
    pub rationale: String,
    /// Role accountable for the objective, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_role: Option<String>,
    /// Priority tag (ex.: high, medium).
    #[serde(default)]
    pub priority: String,
}

/// Key performance indicator measuring objective progress.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Kpi {
    pub id: String,
    /// Must reference an `Objective::id`; enforced by the validator.
    pub objective_id: String,
    pub name: String,
    /// What the KPI measures.
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
    /// Target the KPI should reach.
    #[serde(default)]
    pub target: String,
    /// Measurement cadence (ex.: monthly).
    #[serde(default)]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    /// Whether the KPI is a leading or lagging indicator.
    #[serde(default)]
    pub leading_or_lagging: String,
}

/// Uniform shape shared by the optional Initiatives, Capabilities and
/// Outputs sections.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SectionItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Assumption or data gap captured for later follow-up. Free text, never
/// cross-referenced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Gap {
    /// Short description of the missing item.
    pub item: String,
    /// What is needed to close the gap.
    pub needed: String,
    /// Impact of leaving the gap open.
    pub impact: String,
}

/// Directed edge with implicit endpoint roles: the source is always an
/// objective and the target a KPI.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImplicitLink {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    /// Relationship label (ex.: `objective_to_kpi`).
    #[serde(rename = "type")]
    pub link_type: String,
}

/// Directed edge with explicit endpoint types.
///
/// The type fields stay free strings on the wire so unknown entity-type
/// names surface as validation errors rather than parse failures.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypedLink {
    pub from_type: String,
    pub from_id: String,
    pub to_type: String,
    pub to_id: String,
    /// Relationship label (ex.: `objective_to_kpi`).
    #[serde(rename = "type")]
    pub link_type: String,
}

/// Feature flags gating the optional entity sections.
///
/// The canonical field names are `include_*`; the legacy `enable_*`
/// spelling is accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Flags {
    #[serde(default, alias = "enable_initiatives")]
    pub include_initiatives: bool,
    #[serde(default, alias = "enable_capabilities")]
    pub include_capabilities: bool,
    #[serde(default, alias = "enable_outputs")]
    pub include_outputs: bool,
}

impl Flags {
    /// All sections enabled or disabled.
    pub fn all(value: bool) -> Self {
        Self {
            include_initiatives: value,
            include_capabilities: value,
            include_outputs: value,
        }
    }

    /// Whether the given optional section is enabled.
    pub fn is_enabled(&self, section: Section) -> bool {
        match section {
            Section::Initiatives => self.include_initiatives,
            Section::Capabilities => self.include_capabilities,
            Section::Outputs => self.include_outputs,
        }
    }
}

/// The closed set of optional, flag-gated sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Initiatives,
    Capabilities,
    Outputs,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Initiatives, Section::Capabilities, Section::Outputs];

    /// Wire-format field name of the section.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Initiatives => "initiatives",
            Section::Capabilities => "capabilities",
            Section::Outputs => "outputs",
        }
    }

    /// Capitalized name used in human-readable messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Section::Initiatives => "Initiatives",
            Section::Capabilities => "Capabilities",
            Section::Outputs => "Outputs",
        }
    }
}

/// The fixed registry of entity-type names that may appear as typed-link
/// endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Objective,
    Kpi,
    Initiative,
    Capability,
    Output,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Objective,
        EntityKind::Kpi,
        EntityKind::Initiative,
        EntityKind::Capability,
        EntityKind::Output,
    ];

    /// Wire-format name of the entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Objective => "objective",
            EntityKind::Kpi => "kpi",
            EntityKind::Initiative => "initiative",
            EntityKind::Capability => "capability",
            EntityKind::Output => "output",
        }
    }

    /// Resolve a wire-format type name against the registry.
    pub fn from_name(name: &str) -> Option<EntityKind> {
        match name {
            "objective" => Some(EntityKind::Objective),
            "kpi" => Some(EntityKind::Kpi),
            "initiative" => Some(EntityKind::Initiative),
            "capability" => Some(EntityKind::Capability),
            "output" => Some(EntityKind::Output),
            _ => None,
        }
    }
}

/// The business plan graph, generic over the link representation.
///
/// Graphs are constructed once per request, validated once and discarded;
/// there are no update-in-place semantics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(bound(deserialize = "L: Deserialize<'de>"))]
pub struct PlanGraph<L> {
    /// Plan metadata. Accepts the legacy `metadata` field name.
    #[serde(alias = "metadata")]
    pub plan: PlanMeta,
    pub objectives: Vec<Objective>,
    pub kpis: Vec<Kpi>,
    /// Optional section; omit unless enabled by flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiatives: Option<Vec<SectionItem>>,
    /// Optional section; omit unless enabled by flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<SectionItem>>,
    /// Optional section; omit unless enabled by flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<SectionItem>>,
    #[serde(default)]
    pub links: Vec<L>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assumptions_and_gaps: Vec<Gap>,
}

/// Plan graph with implicit (objective→KPI) links.
pub type ImplicitPlan = PlanGraph<ImplicitLink>;

/// Plan graph with explicitly typed links.
pub type TypedPlan = PlanGraph<TypedLink>;

impl<L> PlanGraph<L> {
    /// Construct a graph with no optional sections and no recorded gaps,
    /// enforcing the minimum cardinalities.
    pub fn new(
        plan: PlanMeta,
        objectives: Vec<Objective>,
        kpis: Vec<Kpi>,
        links: Vec<L>,
    ) -> std::result::Result<Self, ShapeError> {
        let graph = Self {
            plan,
            objectives,
            kpis,
            initiatives: None,
            capabilities: None,
            outputs: None,
            links,
            assumptions_and_gaps: Vec::new(),
        };
        graph.check_shape()?;
        Ok(graph)
    }

    /// Re-check the construction-time shape constraints, for graphs that
    /// arrived through deserialization.
    pub fn check_shape(&self) -> std::result::Result<(), ShapeError> {
        if self.objectives.is_empty() {
            return Err(ShapeError::MissingObjectives);
        }
        if self.kpis.is_empty() {
            return Err(ShapeError::MissingKpis);
        }
        Ok(())
    }

    /// Contents of the given optional section, `None` when absent.
    pub fn section(&self, section: Section) -> Option<&[SectionItem]> {
        match section {
            Section::Initiatives => self.initiatives.as_deref(),
            Section::Capabilities => self.capabilities.as_deref(),
            Section::Outputs => self.outputs.as_deref(),
        }
    }
}

impl<L: DeserializeOwned> PlanGraph<L> {
    /// Parse a plan document, then re-check shape constraints.
    pub fn from_json(value: &serde_json::Value) -> crate::Result<Self> {
        let graph: Self = serde_json::from_value(value.clone())?;
        graph.check_shape()?;
        Ok(graph)
    }
}
