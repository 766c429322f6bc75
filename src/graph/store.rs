use bevy::prelude::Resource;
use serde::Deserialize;
use std::collections::HashMap;

use super::edge::Edge;
use super::node::{GraphNode, NodeId};

const GRAPH_JSON: &str = include_str!("../../assets/data/graph.json");

/// Why the graph document could not be turned into a graph
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("graph document has no `root` node")]
    MissingRoot,
    #[error("graph document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level shape of the graph document: `{ "root": GraphNode }`
#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    root: Option<GraphNode>,
}

/// Loads the content graph from its fixed resource
pub struct GraphStore;

impl GraphStore {
    /// Load the graph shipped with the binary
    pub fn load() -> Result<FlattenedGraph, LoadError> {
        Self::from_json(GRAPH_JSON)
    }

    /// Parse a graph document and flatten it
    pub fn from_json(json: &str) -> Result<FlattenedGraph, LoadError> {
        let document: GraphDocument = serde_json::from_str(json)?;
        let root = document.root.ok_or(LoadError::MissingRoot)?;
        Ok(flatten(root))
    }
}

/// Flat node/edge form of the content tree.
///
/// `nodes` are in pre-order with `parent_id` filled in and `children` emptied;
/// `edges` hold exactly one `parent → child` link per non-root node, in the
/// same order.
#[derive(Debug, Clone, Default, PartialEq, Resource)]
pub struct FlattenedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

/// Flatten a rooted tree with a pre-order traversal
pub fn flatten(root: GraphNode) -> FlattenedGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    // (node, parent) pairs; children are pushed in reverse so they pop in order
    let mut stack: Vec<(GraphNode, Option<NodeId>)> = vec![(root, None)];

    while let Some((mut node, parent)) = stack.pop() {
        let children = std::mem::take(&mut node.children);
        node.parent_id = parent.clone();

        if let Some(parent) = parent {
            edges.push(Edge::new(parent, node.id.clone()));
        }

        for child in children.into_iter().rev() {
            stack.push((child, Some(node.id.clone())));
        }

        nodes.push(node);
    }

    FlattenedGraph { nodes, edges }
}

impl FlattenedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The single node without a parent
    #[cfg(test)]
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Re-derive `child → parent` from the edge list
    #[allow(dead_code)]
    pub fn parent_map(&self) -> HashMap<NodeId, NodeId> {
        self.edges
            .iter()
            .map(|edge| (edge.to.clone(), edge.from.clone()))
            .collect()
    }

    /// Path from the root down to `id` (root first).
    ///
    /// Returns an empty path for unknown ids. Broken parent links end the
    /// walk early, so the path then starts at the last reachable ancestor.
    pub fn breadcrumb(&self, id: &NodeId) -> Vec<&GraphNode> {
        let mut path = Vec::new();
        let mut current = self.node(id);

        while let Some(node) = current {
            path.push(node);
            // A tree never has a path longer than its node count
            if path.len() > self.nodes.len() {
                break;
            }
            current = node.parent_id.as_ref().and_then(|parent| self.node(parent));
        }

        path.reverse();
        path
    }
}
