//! Export surfaces for a built graph.
//!
//! These serialize the current view, so link predicates appear as their
//! display labels rather than the original full IRIs.

use serde_json::{json, Map, Value};

use crate::graph::model::{GraphData, NodeRole};

/// Serializes the graph to a JSON-LD document: one `@graph` entry per node,
/// with outgoing links grouped under their predicate label. Repeated
/// predicates coalesce into an array.
pub fn graph_to_jsonld(graph: &GraphData) -> crate::Result<String> {
    let entries: Vec<Value> = graph
        .nodes
        .iter()
        .map(|node| {
            let mut entry = Map::new();
            entry.insert("@id".to_string(), Value::String(node.id.clone()));
            let type_name = match node.role {
                NodeRole::Subject => "Subject",
                NodeRole::Object => "Object",
            };
            entry.insert("@type".to_string(), Value::String(type_name.to_string()));

            for link in graph.links.iter().filter(|link| link.source == node.id) {
                let reference = json!({ "@id": link.target });
                if let Some(existing) = entry.get_mut(&link.label) {
                    if let Value::Array(values) = existing {
                        values.push(reference);
                    } else {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, reference]);
                    }
                } else {
                    entry.insert(link.label.clone(), reference);
                }
            }
            Value::Object(entry)
        })
        .collect();

    let document = json!({
        "@context": {
            "@vocab": "http://example.org/",
            "Subject": "http://example.org/Subject",
            "Object": "http://example.org/Object"
        },
        "@graph": entries
    });
    serde_json::to_string_pretty(&document)
        .map_err(|e| crate::Error::Serialize(format!("JSON-LD export failed: {}", e)))
}

/// Serializes the full `GraphData` structure as pretty-printed JSON.
pub fn graph_to_json(graph: &GraphData) -> crate::Result<String> {
    serde_json::to_string_pretty(graph)
        .map_err(|e| crate::Error::Serialize(format!("JSON export failed: {}", e)))
}

/// One `Subject,Predicate,Object` row per link.
pub fn graph_to_csv(graph: &GraphData) -> String {
    let mut out = String::from("Subject,Predicate,Object\n");
    for link in &graph.links {
        out.push_str(&csv_field(&link.source));
        out.push(',');
        out.push_str(&csv_field(&link.label));
        out.push(',');
        out.push_str(&csv_field(&link.target));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Term, Triple};
    use crate::graph::builder::GraphBuilder;

    fn sample() -> GraphData {
        let triples = vec![
            Triple::new("A", "knows", Term::literal("B")),
            Triple::new("A", "knows", Term::literal("C")),
            Triple::new("B", "likes", Term::literal("C")),
        ];
        GraphBuilder::new().build(&triples).unwrap()
    }

    #[test]
    fn test_jsonld_export_groups_predicates() {
        let text = graph_to_jsonld(&sample()).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(doc["@context"]["@vocab"], "http://example.org/");
        let entries = doc["@graph"].as_array().unwrap();
        assert_eq!(entries.len(), 3);

        let a = entries.iter().find(|e| e["@id"] == "A").unwrap();
        assert_eq!(a["@type"], "Subject");
        let knows = a["knows"].as_array().expect("repeated predicate becomes an array");
        assert_eq!(knows.len(), 2);
        assert_eq!(knows[0]["@id"], "B");

        let b = entries.iter().find(|e| e["@id"] == "B").unwrap();
        assert_eq!(b["@type"], "Object");
        assert_eq!(b["likes"]["@id"], "C", "single predicate stays an object");
    }

    #[test]
    fn test_json_export_round_trips() {
        let graph = sample();
        let text = graph_to_json(&graph).unwrap();
        let back: GraphData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_csv_export_escapes_fields() {
        let triples = vec![Triple::new("A, Inc", "says", Term::literal("she said \"hi\""))];
        let graph = GraphBuilder::new().build(&triples).unwrap();
        let csv = graph_to_csv(&graph);

        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Subject,Predicate,Object");
        assert_eq!(lines.next().unwrap(), "\"A, Inc\",says,\"she said \"\"hi\"\"\"");
    }
}
