//! Chunked construction for large triple sets.
//!
//! A single worker thread receives one batch of triples at a time and sends
//! back progress notifications followed by a completion payload. The
//! orchestrating side dispatches the next batch only after merging the
//! previous completion, so batches are strictly sequential and every batch
//! knows the node-index offset to start from. Indices therefore stay unique
//! and monotonically increasing across the whole build.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crate::core::Triple;
use crate::graph::builder::{BuildOptions, BuildProgress};
use crate::graph::model::{
    truncate_label, GraphData, GraphMetadata, Link, Node, NodeRole, LINK_LABEL_MAX, NODE_LABEL_MAX,
};

/// Triples handed to the worker per batch.
pub(crate) const BATCH_SIZE: usize = 50_000;
/// The worker yields and reports after each slice of this many triples.
const SUB_CHUNK_SIZE: usize = 10_000;
/// Completed-batch cadence for surfacing progress to the caller.
const PROGRESS_EVERY_BATCHES: usize = 10;

struct BatchRequest {
    triples: Vec<Triple>,
    /// Global node index assigned to the first node this batch creates.
    start_index: usize,
    batch_number: usize,
}

enum BatchReply {
    Progress { processed_triples: usize, unique_nodes: usize },
    Complete { nodes: Vec<Node>, links: Vec<Link>, nodes_created: usize },
}

pub(crate) fn build_chunked(
    filtered: &[Triple],
    root: &str,
    options: &BuildOptions,
    on_progress: Option<&dyn Fn(&BuildProgress)>,
    filtered_out: usize,
) -> crate::Result<GraphData> {
    let total = filtered.len();
    let batch_size = options.batch_size.max(1);

    let (request_tx, request_rx) = mpsc::channel::<BatchRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<BatchReply>();

    let worker_root = root.to_string();
    let reveal_cap = options.chunk_max_visible;
    let handle =
        thread::spawn(move || worker_loop(&request_rx, &reply_tx, &worker_root, reveal_cap));

    let mut merged_nodes: Vec<Node> = Vec::new();
    let mut merged_index: HashMap<String, usize> = HashMap::new();
    let mut merged_links: Vec<Link> = Vec::new();

    let mut triple_offset = 0usize;
    let mut start_index = 0usize;
    let mut batch_number = 0usize;

    let first_len = batch_size.min(total);
    request_tx
        .send(BatchRequest {
            triples: filtered[..first_len].to_vec(),
            start_index,
            batch_number,
        })
        .map_err(|_| crate::Error::Build("worker exited before the first batch".to_string()))?;

    loop {
        let reply = reply_rx
            .recv()
            .map_err(|_| crate::Error::Build("worker disconnected mid-build".to_string()))?;
        match reply {
            BatchReply::Progress { processed_triples, unique_nodes } => {
                log::trace!(
                    "batch {}: {} of {} triples, {} nodes in batch",
                    batch_number,
                    triple_offset + processed_triples,
                    total,
                    unique_nodes
                );
            }
            BatchReply::Complete { nodes, links, nodes_created } => {
                for node in nodes {
                    // First occurrence keeps its index and flags
                    if !merged_index.contains_key(&node.id) {
                        merged_index.insert(node.id.clone(), merged_nodes.len());
                        merged_nodes.push(node);
                    }
                }
                merged_links.extend(links);

                triple_offset += batch_size.min(total - triple_offset);
                start_index += nodes_created;
                batch_number += 1;

                let done = triple_offset >= total;
                if let Some(callback) = on_progress {
                    if done || batch_number % PROGRESS_EVERY_BATCHES == 0 {
                        callback(&BuildProgress {
                            processed_triples: triple_offset,
                            total_triples: total,
                            unique_nodes: merged_nodes.len(),
                        });
                    }
                }
                if done {
                    break;
                }

                let next_len = batch_size.min(total - triple_offset);
                request_tx
                    .send(BatchRequest {
                        triples: filtered[triple_offset..triple_offset + next_len].to_vec(),
                        start_index,
                        batch_number,
                    })
                    .map_err(|_| {
                        crate::Error::Build("worker exited between batches".to_string())
                    })?;
            }
        }
    }

    drop(request_tx);
    if handle.join().is_err() {
        return Err(crate::Error::Build("worker thread panicked".to_string()));
    }

    let total_nodes = merged_nodes.len();
    let total_links = merged_links.len();
    let visible_nodes = merged_nodes.iter().filter(|node| node.visible).count();
    Ok(GraphData {
        nodes: merged_nodes,
        links: merged_links,
        metadata: GraphMetadata {
            total_nodes,
            total_links,
            visible_nodes,
            max_visible_nodes: options.chunk_max_visible,
            has_more: true,
            processed_triples: total,
            filtered_out_triples: filtered_out,
        },
    })
}

fn worker_loop(
    requests: &mpsc::Receiver<BatchRequest>,
    replies: &mpsc::Sender<BatchReply>,
    root: &str,
    reveal_cap: usize,
) {
    for request in requests {
        let first_batch = request.batch_number == 0;
        let mut nodes: Vec<Node> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut links: Vec<Link> = Vec::new();
        let mut processed = 0usize;

        for slice in request.triples.chunks(SUB_CHUNK_SIZE) {
            for triple in slice {
                if !seen.contains_key(triple.subject.as_str()) {
                    let at_root = first_batch && triple.subject == root;
                    seen.insert(triple.subject.clone(), nodes.len());
                    nodes.push(Node {
                        id: triple.subject.clone(),
                        label: truncate_label(&triple.subject, NODE_LABEL_MAX),
                        role: NodeRole::Subject,
                        expanded: at_root,
                        visible: at_root,
                        index: request.start_index + nodes.len(),
                    });
                }
                let object = triple.object.value();
                if !seen.contains_key(object) {
                    seen.insert(object.to_string(), nodes.len());
                    nodes.push(Node {
                        id: object.to_string(),
                        label: truncate_label(object, NODE_LABEL_MAX),
                        role: NodeRole::Object,
                        expanded: false,
                        visible: false,
                        index: request.start_index + nodes.len(),
                    });
                }
                links.push(Link {
                    source: triple.subject.clone(),
                    target: object.to_string(),
                    label: truncate_label(&triple.predicate, LINK_LABEL_MAX),
                    visible: first_batch && triple.subject == root,
                });
            }

            processed += slice.len();
            if replies
                .send(BatchReply::Progress {
                    processed_triples: processed,
                    unique_nodes: nodes.len(),
                })
                .is_err()
            {
                return;
            }
            thread::yield_now();
        }

        // The root's one-hop neighborhood is revealed from the first batch
        // only; later batches never touch visibility.
        if first_batch {
            let mut revealed = 0usize;
            for triple in &request.triples {
                if revealed >= reveal_cap {
                    break;
                }
                if triple.subject == root {
                    if let Some(&position) = seen.get(triple.object.value()) {
                        nodes[position].visible = true;
                    }
                    revealed += 1;
                }
            }
        }

        let nodes_created = nodes.len();
        if replies.send(BatchReply::Complete { nodes, links, nodes_created }).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Term;

    fn spawn_worker(
        root: &str,
    ) -> (mpsc::Sender<BatchRequest>, mpsc::Receiver<BatchReply>, thread::JoinHandle<()>) {
        let (request_tx, request_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let root = root.to_string();
        let handle = thread::spawn(move || worker_loop(&request_rx, &reply_tx, &root, 50_000));
        (request_tx, reply_rx, handle)
    }

    fn wait_for_complete(replies: &mpsc::Receiver<BatchReply>) -> (Vec<Node>, Vec<Link>, usize) {
        loop {
            match replies.recv().unwrap() {
                BatchReply::Progress { .. } => continue,
                BatchReply::Complete { nodes, links, nodes_created } => {
                    return (nodes, links, nodes_created)
                }
            }
        }
    }

    #[test]
    fn test_first_batch_reveals_root_neighborhood() {
        let (request_tx, reply_rx, handle) = spawn_worker("A");
        request_tx
            .send(BatchRequest {
                triples: vec![
                    Triple::new("A", "knows", Term::literal("B")),
                    Triple::new("B", "knows", Term::literal("C")),
                ],
                start_index: 100,
                batch_number: 0,
            })
            .unwrap();

        let (nodes, links, nodes_created) = wait_for_complete(&reply_rx);
        drop(request_tx);
        handle.join().unwrap();

        assert_eq!(nodes_created, 3);
        assert_eq!(nodes[0].index, 100);
        assert_eq!(nodes[2].index, 102);
        assert!(nodes[0].visible && nodes[0].expanded, "root is shown expanded");
        assert!(nodes[1].visible, "one hop from the root");
        assert!(!nodes[2].visible, "two hops away stays hidden");
        assert_eq!(links.len(), 2);
        assert!(links[0].visible);
        assert!(!links[1].visible);
    }

    #[test]
    fn test_later_batches_create_everything_hidden() {
        let (request_tx, reply_rx, handle) = spawn_worker("A");
        request_tx
            .send(BatchRequest {
                triples: vec![Triple::new("A", "knows", Term::literal("B"))],
                start_index: 7,
                batch_number: 3,
            })
            .unwrap();

        let (nodes, links, _) = wait_for_complete(&reply_rx);
        drop(request_tx);
        handle.join().unwrap();

        assert!(nodes.iter().all(|n| !n.visible && !n.expanded));
        assert!(links.iter().all(|l| !l.visible));
    }
}
