//! Bundled sample dataset.
//!
//! When no user file is supplied the playground still needs something to
//! show, so a small JSON-LD dataset ships inside the binary. Should that
//! ever fail to load, four hardcoded triples stand in, so the caller is
//! never left without a graph.

use crate::core::{Term, Triple};
use crate::graph::builder::{BuildOptions, GraphBuilder, VisibilityMode};
use crate::graph::model::{GraphData, GraphMetadata, DEFAULT_MAX_VISIBLE_NODES};

const SAMPLE_JSONLD: &str = include_str!("../data/sample_graph.jsonld");

fn fallback_triples() -> Vec<Triple> {
    vec![
        Triple::new("Albert Einstein", "developed", Term::literal("Theory of Relativity")),
        Triple::new("Theory of Relativity", "describes", Term::literal("Spacetime")),
        Triple::new("Albert Einstein", "won", Term::literal("Nobel Prize")),
        Triple::new("Nobel Prize", "awarded in", Term::literal("1921")),
    ]
}

/// Parses and builds the bundled dataset in progressive mode: the root and
/// its immediate neighborhood start visible, everything else is revealed by
/// expansion clicks.
pub fn sample_graph() -> GraphData {
    let options =
        BuildOptions { visibility: VisibilityMode::Progressive, ..BuildOptions::default() };
    let builder = GraphBuilder::with_options(options.clone());

    let bundled = crate::parsing::parse_document(SAMPLE_JSONLD)
        .and_then(|triples| builder.build(&triples));
    match bundled {
        Ok(graph) => graph,
        Err(err) => {
            log::warn!("bundled sample failed to load ({}), falling back", err);
            GraphBuilder::with_options(options)
                .build(&fallback_triples())
                .unwrap_or_else(|_| empty_graph())
        }
    }
}

// Terminal fallback; the hardcoded triples cannot actually fail to build.
fn empty_graph() -> GraphData {
    GraphData {
        nodes: Vec::new(),
        links: Vec::new(),
        metadata: GraphMetadata {
            total_nodes: 0,
            total_links: 0,
            visible_nodes: 0,
            max_visible_nodes: DEFAULT_MAX_VISIBLE_NODES,
            has_more: false,
            processed_triples: 0,
            filtered_out_triples: 0,
        },
    }
}
