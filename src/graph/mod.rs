mod edge;
mod node;
mod store;

pub use node::{GraphNode, NodeDetails, NodeId};
pub use store::{FlattenedGraph, GraphStore};
