//! The materialized graph model: nodes, links and summary metadata.
//!
//! The serialized shape matches what render layers consume, so field names
//! follow the wire convention (`type` on nodes, camelCase metadata keys).

use serde::{Deserialize, Serialize};

/// Longest node label kept for display; the full string stays in `id`.
pub const NODE_LABEL_MAX: usize = 30;
/// Longest link label kept for display.
pub const LINK_LABEL_MAX: usize = 15;
/// Visible-node budget reported for synchronously built graphs.
pub const DEFAULT_MAX_VISIBLE_NODES: usize = 50;
/// Visible-node budget for the chunked builder's initial reveal.
pub const CHUNKED_MAX_VISIBLE_NODES: usize = 50_000;

/// The role a string was first seen in. Never retroactively changed: a node
/// first met as an object stays an object node even if it later appears as a
/// subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Subject,
    Object,
}

/// A unique subject or object string rendered as a graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub role: NodeRole,
    pub expanded: bool,
    pub visible: bool,
    pub index: usize,
}

/// One retained triple rendered as a graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub total_nodes: usize,
    pub total_links: usize,
    pub visible_nodes: usize,
    pub max_visible_nodes: usize,
    pub has_more: bool,
    pub processed_triples: usize,
    pub filtered_out_triples: usize,
}

/// The complete materialized graph handed to render and export layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub metadata: GraphMetadata,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn visible_node_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.visible).count()
    }
}

/// Truncates display text to `max` characters, the ellipsis included.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
