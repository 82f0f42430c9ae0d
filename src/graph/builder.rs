//! Graph construction from filtered triples.
//!
//! Small inputs are materialized synchronously in a single pass. Once the
//! filtered triple count reaches the chunk threshold, construction moves to
//! the chunked executor so the calling thread only orchestrates batches.

use std::collections::HashMap;

use crate::core::Triple;
use crate::graph::chunked;
use crate::graph::filter::filter_triples;
use crate::graph::model::{
    truncate_label, GraphData, GraphMetadata, Link, Node, NodeRole, DEFAULT_MAX_VISIBLE_NODES,
    LINK_LABEL_MAX, NODE_LABEL_MAX,
};

/// How much of a freshly built graph starts visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Only the root and its one-hop neighborhood; the rest is revealed by
    /// expansion. Used for the bundled sample flow.
    Progressive,
    /// Everything visible up front. Uploaded graphs are assumed curated and
    /// small enough to view whole.
    Full,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub visibility: VisibilityMode,
    /// Visible-node budget reported in metadata for synchronous builds.
    pub max_visible_nodes: usize,
    /// Filtered-triple count at which construction goes chunked.
    pub chunk_threshold: usize,
    /// Triples handed to the worker per batch.
    pub batch_size: usize,
    /// Cap on root neighbors revealed during the chunked build's first batch.
    pub chunk_max_visible: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            visibility: VisibilityMode::Full,
            max_visible_nodes: DEFAULT_MAX_VISIBLE_NODES,
            chunk_threshold: 10_000,
            batch_size: chunked::BATCH_SIZE,
            chunk_max_visible: crate::graph::model::CHUNKED_MAX_VISIBLE_NODES,
        }
    }
}

/// Progress snapshot surfaced while the chunked path runs.
#[derive(Debug, Clone)]
pub struct BuildProgress {
    pub processed_triples: usize,
    pub total_triples: usize,
    pub unique_nodes: usize,
}

pub struct GraphBuilder {
    options: BuildOptions,
    on_progress: Option<Box<dyn Fn(&BuildProgress)>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { options: BuildOptions::default(), on_progress: None }
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options, on_progress: None }
    }

    /// Registers a callback invoked on the chunked path's progress cadence.
    pub fn on_progress(mut self, callback: impl Fn(&BuildProgress) + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Filters the triples and materializes the graph. Empty input is an
    /// error; input where filtering removed everything still yields a graph
    /// anchored on the root so the caller is never left without one.
    pub fn build(&self, triples: &[Triple]) -> crate::Result<GraphData> {
        if triples.is_empty() {
            return Err(crate::Error::NoTriples);
        }

        let filtered = filter_triples(triples);
        let filtered_out = triples.len() - filtered.len();
        let root = filtered.first().unwrap_or(&triples[0]).subject.clone();

        if filtered.is_empty() {
            return Ok(self.lone_root_graph(&root, filtered_out));
        }
        if filtered.len() >= self.options.chunk_threshold {
            return chunked::build_chunked(
                &filtered,
                &root,
                &self.options,
                self.on_progress.as_deref(),
                filtered_out,
            );
        }
        Ok(self.build_sync(&filtered, &root, filtered_out))
    }

    fn build_sync(&self, filtered: &[Triple], root: &str, filtered_out: usize) -> GraphData {
        let bulk = self.options.visibility == VisibilityMode::Full;
        let mut nodes: Vec<Node> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for triple in filtered {
            if !seen.contains_key(triple.subject.as_str()) {
                let index = nodes.len();
                seen.insert(triple.subject.clone(), index);
                nodes.push(Node {
                    id: triple.subject.clone(),
                    label: truncate_label(&triple.subject, NODE_LABEL_MAX),
                    role: NodeRole::Subject,
                    expanded: triple.subject == root,
                    visible: bulk || triple.subject == root,
                    index,
                });
            }
            let object = triple.object.value();
            if !seen.contains_key(object) {
                let index = nodes.len();
                seen.insert(object.to_string(), index);
                nodes.push(Node {
                    id: object.to_string(),
                    label: truncate_label(object, NODE_LABEL_MAX),
                    role: NodeRole::Object,
                    expanded: false,
                    visible: bulk,
                    index,
                });
            }
        }

        // Progressive start: reveal the root's immediate neighborhood only
        if !bulk {
            let mut revealed = 0;
            for triple in filtered.iter().filter(|t| t.subject == root) {
                if revealed >= self.options.max_visible_nodes {
                    break;
                }
                if let Some(&index) = seen.get(triple.object.value()) {
                    nodes[index].visible = true;
                }
                revealed += 1;
            }
        }

        let links: Vec<Link> = filtered
            .iter()
            .map(|triple| Link {
                source: triple.subject.clone(),
                target: triple.object.value().to_string(),
                label: truncate_label(&triple.predicate, LINK_LABEL_MAX),
                visible: bulk || triple.subject == root,
            })
            .collect();

        let total_nodes = nodes.len();
        let total_links = links.len();
        let visible_nodes = nodes.iter().filter(|node| node.visible).count();
        let has_more = if bulk {
            total_nodes > self.options.max_visible_nodes
        } else {
            filtered.iter().filter(|t| t.subject == root).count() > self.options.max_visible_nodes
        };

        GraphData {
            nodes,
            links,
            metadata: GraphMetadata {
                total_nodes,
                total_links,
                visible_nodes,
                max_visible_nodes: self.options.max_visible_nodes,
                has_more,
                processed_triples: filtered.len(),
                filtered_out_triples: filtered_out,
            },
        }
    }

    /// Everything the user supplied was annotation-like; the root alone still
    /// anchors the view instead of returning an empty graph.
    fn lone_root_graph(&self, root: &str, filtered_out: usize) -> GraphData {
        let node = Node {
            id: root.to_string(),
            label: truncate_label(root, NODE_LABEL_MAX),
            role: NodeRole::Subject,
            expanded: true,
            visible: true,
            index: 0,
        };
        GraphData {
            nodes: vec![node],
            links: vec![],
            metadata: GraphMetadata {
                total_nodes: 1,
                total_links: 0,
                visible_nodes: 1,
                max_visible_nodes: self.options.max_visible_nodes,
                has_more: false,
                processed_triples: 0,
                filtered_out_triples: filtered_out,
            },
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
