use serde::{Deserialize, Serialize};

/// Per-file quality attributes reported by the analysis backend. Every field
/// is optional on the wire; older backends omit the whole object.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeMetrics {
    #[serde(default)]
    pub quality_gate: Option<String>,
    #[serde(default)]
    pub bugs: Option<u32>,
    #[serde(default)]
    pub code_smells: Option<u32>,
    #[serde(default)]
    pub vulnerabilities: Option<u32>,
    #[serde(default)]
    pub security_hotspots: Option<u32>,
    #[serde(default)]
    pub coverage: Option<f32>,
    #[serde(default)]
    pub duplications: Option<f32>,
}

impl NodeMetrics {
    pub fn gate_passed(&self) -> Option<bool> {
        self.quality_gate
            .as_deref()
            .map(|gate| matches!(gate, "PASSED" | "OK"))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "sonar_health")]
    pub metrics: Option<NodeMetrics>,
    #[serde(default)]
    pub layer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relation: String,
}

/// One analyzed repository snapshot. Replaced wholesale on rescan; there is
/// no incremental patching.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawGraph {
    pub project_name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub health_score: f32,
    #[serde(default)]
    pub project_root: String,
}

impl RawGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
