use crate::surface::GraphSurface;
use peerscope_core::NetworkSnapshot;
use std::collections::HashSet;
use tracing::debug;

/// Diffs each incoming snapshot against the surface's current node and edge
/// sets instead of clearing and rebuilding, so unaffected elements keep
/// their layout between snapshots.
#[derive(Debug, Default)]
pub struct StateReconciler;

impl StateReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Applies one snapshot. Nodes are upserted and never removed — peers
    /// that drop out of later snapshots stay rendered. Edges are fully
    /// reconciled: anything not in the snapshot's derived id set is removed,
    /// everything in it is upserted by id (last entry wins for duplicate
    /// `(from, to)` pairs).
    pub fn apply(&self, surface: &mut dyn GraphSurface, snapshot: &NetworkSnapshot) {
        for node in &snapshot.nodes {
            surface.upsert_node(node);
        }

        let incoming: HashSet<String> = snapshot.edges.iter().map(|edge| edge.key()).collect();
        let mut removed = 0usize;
        for id in surface.edge_ids() {
            if !incoming.contains(&id) {
                surface.remove_edge(&id);
                removed += 1;
            }
        }
        for edge in &snapshot.edges {
            surface.upsert_edge(&edge.key(), edge);
        }

        debug!(
            tick = snapshot.tick,
            nodes = snapshot.nodes.len(),
            edges = incoming.len(),
            removed_edges = removed,
            "snapshot applied"
        );
    }
}
