use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node in the content graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One node of the content graph as stored in the graph document.
///
/// The document is a rooted tree (`children`); after flattening, `children`
/// is empty and `parent_id` points at the parent instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(
        default,
        alias = "parentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<NodeDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GraphNode>,
}

fn default_color() -> String {
    "#8a8a8a".to_string()
}

fn default_size() -> f32 {
    0.3
}

fn default_kind() -> String {
    "node".to_string()
}

/// Node types that can be opened in the info panel before the graph is exploded
pub const SELECTABLE_KINDS: &[&str] = &["project", "repository", "blog"];

impl GraphNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Is this node's type one of the always-selectable kinds?
    pub fn is_selectable_kind(&self) -> bool {
        SELECTABLE_KINDS
            .iter()
            .any(|kind| kind.eq_ignore_ascii_case(&self.kind))
    }
}

// ============================================================================
// Structured metadata shown in the info panel
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDetails {
    pub description: Option<Description>,
    pub architecture: Option<Architecture>,
    pub technical_details: Option<TechnicalDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub summary: Option<String>,
    pub problem_solved: Option<String>,
    pub impact: Option<String>,
    pub relevance: Option<String>,
    pub technologies: Vec<String>,
    pub role: Option<String>,
    pub challenges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Architecture {
    pub overview: Option<String>,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalDetails {
    pub design_decisions: Vec<DesignDecision>,
    pub performance_optimizations: Vec<PerformanceOptimization>,
    pub lessons_learned: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignDecision {
    pub decision: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceOptimization {
    pub optimization: String,
    pub impact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults_and_type_rename() {
        let node: GraphNode = serde_json::from_str(
            r#"{ "id": "a", "name": "A", "position": [1, 2, 3], "type": "Project" }"#,
        )
        .unwrap();

        assert_eq!(node.id, NodeId::new("a"));
        assert_eq!(node.kind, "Project");
        assert_eq!(node.size, 0.3);
        assert!(node.children.is_empty());
        assert!(node.is_root());
        assert!(node.is_selectable_kind());
    }

    #[test]
    fn test_details_are_all_optional() {
        let node: GraphNode = serde_json::from_str(
            r#"{
                "id": "a", "name": "A", "position": [0, 0, 0],
                "details": { "description": { "summary": "hello" } }
            }"#,
        )
        .unwrap();

        let details = node.details.unwrap();
        let description = details.description.unwrap();
        assert_eq!(description.summary.as_deref(), Some("hello"));
        assert!(description.technologies.is_empty());
        assert!(details.architecture.is_none());
    }

    #[test]
    fn test_parent_id_alias() {
        let node: GraphNode = serde_json::from_str(
            r#"{ "id": "b", "name": "B", "position": [0, 0, 0], "parentId": "a" }"#,
        )
        .unwrap();

        assert_eq!(node.parent_id, Some(NodeId::new("a")));
        assert!(!node.is_root());
    }
}
