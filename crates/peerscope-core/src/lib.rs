use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub type PeerId = String;

/// Separator for derived edge ids. Peer ids are hex digests, so the
/// separator cannot occur inside either half of the pair.
pub const EDGE_KEY_SEPARATOR: char = '-';

/// Deterministic edge identity for an ordered `(from, to)` pair.
pub fn edge_key(from: &str, to: &str) -> String {
    format!("{from}{EDGE_KEY_SEPARATOR}{to}")
}

/// One full simulation state pushed by the server. Each snapshot logically
/// supersedes the previous one; nothing here is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkSnapshot {
    #[serde(default)]
    pub tick: u64,
    #[serde(default)]
    pub nodes: Vec<NodeState>,
    #[serde(default)]
    pub edges: Vec<EdgeState>,
    #[serde(default)]
    pub peers_info: HashMap<PeerId, PeerDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeState {
    pub id: PeerId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    pub group: NodeGroup,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Online,
    Offline,
}

/// A rendered link between two peers. Identity is the ordered `(from, to)`
/// pair; `arrows` is an opaque renderer directive (the server emits either a
/// bare string or an object) and is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeState {
    pub from: PeerId,
    pub to: PeerId,
    #[serde(default)]
    pub arrows: Value,
    #[serde(default)]
    pub label: String,
}

impl EdgeState {
    pub fn key(&self) -> String {
        edge_key(&self.from, &self.to)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeerDetail {
    pub is_online: bool,
    #[serde(default)]
    pub storage: Vec<StoredRecord>,
}

/// An immutable content-addressed record a peer claims to hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRecord {
    pub node_hash: String,
    pub content_hash: String,
    pub owner_id: PeerId,
    #[serde(default)]
    pub parent_hash: Option<String>,
    #[serde(default)]
    pub children_hashes: Vec<String>,
    pub depth: u32,
}

/// Outbound playback command. Fire-and-forget, no acknowledgement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StepForward,
    Reset,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::StepForward => "step_forward",
            Command::Reset => "reset",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandFrame {
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("snapshot decode failed: {0}")]
    Decode(String),
    #[error("command encode failed: {0}")]
    Encode(String),
}

/// Decode one inbound message into a snapshot. A failure here means the
/// whole message is dropped by the caller; nothing is partially applied.
pub fn decode_snapshot(text: &str) -> Result<NetworkSnapshot, WireError> {
    serde_json::from_str(text).map_err(|err| WireError::Decode(err.to_string()))
}

pub fn encode_command(command: Command) -> Result<String, WireError> {
    serde_json::to_string(&CommandFrame { command })
        .map_err(|err| WireError::Encode(err.to_string()))
}
