//! Annotation filtering ahead of graph construction.
//!
//! RDF documents routinely carry human-readable annotations as triples.
//! Rendered as edges they flood the graph, so prose-like triples are dropped
//! before node and link construction instead of merely being hidden.

use crate::core::Triple;

/// Longest predicate treated as a structural relation.
const MAX_PREDICATE_LEN: usize = 100;
/// Longest object value treated as an edge endpoint rather than prose.
const MAX_OBJECT_LEN: usize = 100;

/// Predicates containing any of these read as human-facing annotations.
const DESCRIPTIVE_KEYWORDS: [&str; 9] = [
    "comment",
    "description",
    "label",
    "title",
    "abstract",
    "note",
    "definition",
    "example",
    "documentation",
];

/// Whether a triple is a structural relation worth rendering as an edge.
pub fn is_structural(triple: &Triple) -> bool {
    let predicate = triple.predicate.as_str();
    if predicate.starts_with('#') || predicate.starts_with("//") {
        return false;
    }
    if predicate.chars().count() > MAX_PREDICATE_LEN {
        return false;
    }
    let lowered = predicate.to_lowercase();
    if DESCRIPTIVE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return false;
    }
    if triple.object.value().chars().count() > MAX_OBJECT_LEN {
        return false;
    }
    true
}

/// Drops annotation-like triples, keeping input order. A pure filter with no
/// failure modes.
pub fn filter_triples(triples: &[Triple]) -> Vec<Triple> {
    triples.iter().filter(|triple| is_structural(triple)).cloned().collect()
}
