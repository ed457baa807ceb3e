use peerscope_core::{EdgeState, NodeState};
use std::collections::HashMap;

/// Seam to the rendering/layout engine. The client only issues upsert and
/// remove operations; visual layout belongs entirely to the implementor.
pub trait GraphSurface {
    /// Create the node or overwrite its fields. Renderer-internal state for
    /// an existing id (screen position and the like) must survive.
    fn upsert_node(&mut self, node: &NodeState);

    fn upsert_edge(&mut self, id: &str, edge: &EdgeState);

    fn remove_edge(&mut self, id: &str);

    fn node_ids(&self) -> Vec<String>;

    fn edge_ids(&self) -> Vec<String>;
}

/// Rendered node as the in-memory surface tracks it. `position` stands in
/// for layout state the client does not own and must not clobber.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub state: NodeState,
    pub position: Option<(f64, f64)>,
}

/// Headless rendering surface. Backs the binary when no layout engine is
/// attached and gives the tests something concrete to assert against.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: HashMap<String, RenderedNode>,
    edges: HashMap<String, EdgeState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&RenderedNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeState> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Simulates the layout engine assigning a screen position.
    pub fn set_position(&mut self, id: &str, position: (f64, f64)) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.position = Some(position);
        }
    }
}

impl GraphSurface for MemorySurface {
    fn upsert_node(&mut self, node: &NodeState) {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => existing.state = node.clone(),
            None => {
                self.nodes.insert(
                    node.id.clone(),
                    RenderedNode {
                        state: node.clone(),
                        position: None,
                    },
                );
            }
        }
    }

    fn upsert_edge(&mut self, id: &str, edge: &EdgeState) {
        self.edges.insert(id.to_string(), edge.clone());
    }

    fn remove_edge(&mut self, id: &str) {
        self.edges.remove(id);
    }

    fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn edge_ids(&self) -> Vec<String> {
        self.edges.keys().cloned().collect()
    }
}
