//! Summary figures for a built graph.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::model::{GraphData, NodeRole};

/// Aggregate counts shown alongside a rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub subject_nodes: usize,
    pub object_nodes: usize,
    pub total_relationships: usize,
    pub unique_relationship_types: usize,
    /// Link count per relationship label.
    pub relationship_distribution: HashMap<String, usize>,
}

impl GraphStatistics {
    pub fn from_graph(graph: &GraphData) -> Self {
        let subject_nodes =
            graph.nodes.iter().filter(|node| node.role == NodeRole::Subject).count();
        let mut relationship_distribution: HashMap<String, usize> = HashMap::new();
        for link in &graph.links {
            *relationship_distribution.entry(link.label.clone()).or_insert(0) += 1;
        }

        Self {
            total_nodes: graph.nodes.len(),
            subject_nodes,
            object_nodes: graph.nodes.len() - subject_nodes,
            total_relationships: graph.links.len(),
            unique_relationship_types: relationship_distribution.len(),
            relationship_distribution,
        }
    }
}
