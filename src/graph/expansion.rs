//! Progressive disclosure over a built graph.
//!
//! `toggle_node` is the single entry point. It returns a new snapshot with
//! the clicked node's expanded flag flipped and visibility settled, leaving
//! the input untouched so every intermediate state can be inspected and
//! compared on its own.

use std::collections::HashSet;

use crate::graph::model::GraphData;

/// Flips a node between expanded and collapsed and returns the resulting
/// snapshot. Unknown ids return an unchanged copy; a stale click against a
/// graph that has since been replaced must never fail.
pub fn toggle_node(graph: &GraphData, node_id: &str) -> GraphData {
    let mut next = graph.clone();
    let position = match next.nodes.iter().position(|node| node.id == node_id) {
        Some(position) => position,
        None => return next,
    };

    let now_expanded = !next.nodes[position].expanded;
    next.nodes[position].expanded = now_expanded;

    if now_expanded {
        reveal_neighborhood(&mut next, node_id);
    } else {
        settle_visibility(&mut next);
    }

    next.metadata.visible_nodes = next.nodes.iter().filter(|node| node.visible).count();
    next
}

/// Targets one outgoing hop away from `from`. The visited set keeps cyclic
/// graphs (self-loops included) from re-entering the start node.
fn one_hop_targets(graph: &GraphData, from: &str) -> HashSet<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(from);
    let mut targets = HashSet::new();
    for link in graph.links.iter().filter(|link| link.source == from) {
        if visited.insert(link.target.as_str()) {
            targets.insert(link.target.clone());
        }
    }
    targets
}

fn reveal_neighborhood(graph: &mut GraphData, node_id: &str) {
    let targets = one_hop_targets(graph, node_id);
    for node in graph.nodes.iter_mut() {
        if targets.contains(&node.id) {
            node.visible = true;
        }
    }
    for link in graph.links.iter_mut() {
        if link.source == node_id {
            link.visible = true;
        }
    }
}

/// Re-derives visibility from the expanded set: a node stays visible iff it
/// is the root or one hop away from some expanded node. A node dropping out
/// also loses its expanded flag, which can strand its own neighborhood in
/// turn, so the derivation loops until stable.
fn settle_visibility(graph: &mut GraphData) {
    let root = match graph.nodes.first() {
        Some(node) => node.id.clone(),
        None => return,
    };

    loop {
        let mut needed: HashSet<String> = HashSet::new();
        needed.insert(root.clone());
        let expanded: Vec<String> = graph
            .nodes
            .iter()
            .filter(|node| node.expanded)
            .map(|node| node.id.clone())
            .collect();
        for id in &expanded {
            needed.extend(one_hop_targets(graph, id));
        }

        let mut changed = false;
        for node in graph.nodes.iter_mut() {
            let keep = needed.contains(&node.id);
            if node.visible != keep {
                node.visible = keep;
                changed = true;
            }
            if !keep && node.expanded {
                node.expanded = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let expanded: HashSet<&str> = graph
        .nodes
        .iter()
        .filter(|node| node.expanded)
        .map(|node| node.id.as_str())
        .collect();
    for link in graph.links.iter_mut() {
        link.visible = expanded.contains(link.source.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Term, Triple};
    use crate::graph::builder::{BuildOptions, GraphBuilder, VisibilityMode};

    fn progressive_graph(triples: &[(&str, &str, &str)]) -> GraphData {
        let triples: Vec<Triple> = triples
            .iter()
            .map(|(s, p, o)| Triple::new(s, p, Term::literal(o)))
            .collect();
        let options =
            BuildOptions { visibility: VisibilityMode::Progressive, ..BuildOptions::default() };
        GraphBuilder::with_options(options).build(&triples).unwrap()
    }

    fn chain() -> GraphData {
        progressive_graph(&[("A", "knows", "B"), ("B", "knows", "C"), ("C", "knows", "D")])
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let graph = chain();
        let next = toggle_node(&graph, "does-not-exist");
        assert_eq!(next, graph);
    }

    #[test]
    fn test_expand_reveals_one_hop_only() {
        let graph = chain();
        assert!(!graph.node("C").unwrap().visible);

        let next = toggle_node(&graph, "B");
        assert!(next.node("B").unwrap().expanded);
        assert!(next.node("C").unwrap().visible, "one hop from B");
        assert!(!next.node("D").unwrap().visible, "two hops from B stays hidden");
        assert!(next.links.iter().find(|l| l.source == "B").unwrap().visible);
        assert_eq!(next.metadata.visible_nodes, 3);

        // the input snapshot is untouched
        assert!(!graph.node("B").unwrap().expanded);
        assert!(!graph.node("C").unwrap().visible);
    }

    #[test]
    fn test_expand_then_collapse_restores_visibility() {
        let graph = chain();
        let expanded = toggle_node(&graph, "B");
        let collapsed = toggle_node(&expanded, "B");

        for (before, after) in graph.nodes.iter().zip(&collapsed.nodes) {
            assert_eq!(before.visible, after.visible, "node {}", before.id);
        }
        for (before, after) in graph.links.iter().zip(&collapsed.links) {
            assert_eq!(before.visible, after.visible, "link {} -> {}", before.source, before.target);
        }
        assert_eq!(collapsed.metadata.visible_nodes, graph.metadata.visible_nodes);
    }

    #[test]
    fn test_collapse_cascades_through_stranded_expansions() {
        let graph = chain();
        let step1 = toggle_node(&graph, "B");
        let step2 = toggle_node(&step1, "C");
        assert!(step2.node("D").unwrap().visible);

        // collapsing B strands C, whose expansion must unwind too
        let step3 = toggle_node(&step2, "B");
        assert!(!step3.node("C").unwrap().visible);
        assert!(!step3.node("C").unwrap().expanded, "stranded node loses its expanded flag");
        assert!(!step3.node("D").unwrap().visible, "cascade hides C's neighborhood");
        assert_eq!(step3.metadata.visible_nodes, 2);
    }

    #[test]
    fn test_node_shared_by_another_expansion_stays_visible() {
        // B and D both point at E; collapsing B must not hide E while D is
        // still expanded.
        let graph = progressive_graph(&[
            ("A", "p", "B"),
            ("A", "p", "D"),
            ("B", "p", "E"),
            ("D", "p", "E"),
        ]);
        let step1 = toggle_node(&graph, "B");
        let step2 = toggle_node(&step1, "D");
        assert!(step2.node("E").unwrap().visible);

        let step3 = toggle_node(&step2, "B");
        assert!(step3.node("E").unwrap().visible, "still reachable through D");

        let step4 = toggle_node(&step3, "D");
        assert!(!step4.node("E").unwrap().visible);
    }

    #[test]
    fn test_self_loop_does_not_hang_the_traversal() {
        let graph = progressive_graph(&[("A", "p", "A"), ("A", "p", "B")]);
        let collapsed = toggle_node(&graph, "A");
        let expanded = toggle_node(&collapsed, "A");

        assert!(expanded.node("A").unwrap().visible);
        assert!(expanded.node("B").unwrap().visible);
    }

    #[test]
    fn test_collapsing_the_root_keeps_it_visible() {
        let graph = chain();
        let next = toggle_node(&graph, "A");

        assert!(!next.node("A").unwrap().expanded);
        assert!(next.node("A").unwrap().visible, "the root is always visible");
        assert!(!next.node("B").unwrap().visible);
        assert_eq!(next.metadata.visible_nodes, 1);
    }
}
