use peerscope_core::{PeerDetail, PeerId};
use std::collections::HashMap;
use std::fmt::Write as _;

const HASH_PREVIEW_LEN: usize = 12;

/// Latest per-peer detail mapping, swapped wholesale on every snapshot. A
/// peer absent from the newest `peers_info` becomes unresolvable even while
/// its ghost node stays rendered.
#[derive(Debug, Default)]
pub struct PeerInspectionCache {
    peers: HashMap<PeerId, PeerDetail>,
}

impl PeerInspectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, peers_info: HashMap<PeerId, PeerDetail>) {
        self.peers = peers_info;
    }

    pub fn lookup(&self, peer_id: &str) -> Option<&PeerDetail> {
        self.peers.get(peer_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Inspection panel text for a selected peer. A miss is not an error;
    /// it renders a fallback line instead.
    pub fn describe(&self, peer_id: &str) -> String {
        let Some(detail) = self.lookup(peer_id) else {
            return format!("No details available for peer {peer_id}.");
        };

        let mut out = String::new();
        let _ = writeln!(out, "Peer ID: {peer_id}");
        let status = if detail.is_online { "Online" } else { "Offline" };
        let _ = writeln!(out, "Status: {status}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Stored records:");
        if detail.storage.is_empty() {
            let _ = write!(out, "  (no records stored)");
            return out;
        }
        for record in &detail.storage {
            let _ = writeln!(out, "  - Node hash:    {}", preview(&record.node_hash));
            let _ = writeln!(out, "    Content hash: {}", preview(&record.content_hash));
            let _ = writeln!(out, "    Owner:        {}", preview(&record.owner_id));
            let _ = writeln!(out, "    Depth:        {}", record.depth);
        }
        out.truncate(out.trim_end().len());
        out
    }
}

fn preview(hash: &str) -> String {
    match hash.get(..HASH_PREVIEW_LEN) {
        Some(prefix) if hash.len() > HASH_PREVIEW_LEN => format!("{prefix}..."),
        _ => hash.to_string(),
    }
}
