//! JSON-LD parsing: standards-compliant expansion first, then a permissive
//! document walker for data that only looks like JSON-LD.

use oxigraph::io::{JsonLdProfileSet, RdfFormat};
use serde_json::Value;

use crate::core::{Term, Triple};
use crate::parsing::format_detector::TripleFormat;
use crate::parsing::parse_error::ParseError;
use crate::parsing::rdf_io;

pub struct JsonLdParser;

impl JsonLdParser {
    pub fn new() -> Self {
        Self
    }

    /// Expands the document through oxigraph's JSON-LD reader. Files without
    /// resolvable IRIs (plain `id` keys, unmapped terms) expand to nothing,
    /// so on failure or zero quads the walker takes over.
    pub fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let format = RdfFormat::JsonLd { profile: JsonLdProfileSet::empty() };
        match rdf_io::parse_with_oxigraph(content, format) {
            Ok(triples) if !triples.is_empty() => return Ok(triples),
            Ok(_) => log::debug!("JSON-LD expansion produced no quads, using document walker"),
            Err(err) => log::debug!("JSON-LD expansion failed ({}), using document walker", err),
        }
        walk_document(content)
    }
}

/// Treats the document as a plain JSON tree: `@graph` entries (or the array /
/// single object itself) become subjects keyed by `@id`/`id`, their scalar
/// and object values become triples.
fn walk_document(content: &str) -> Result<Vec<Triple>, ParseError> {
    let document: Value = serde_json::from_str(content).map_err(|e| {
        ParseError::new(TripleFormat::JsonLd, format!("Invalid JSON-LD format: {}", e))
            .with_line(e.line())
            .with_hint("Check for trailing commas, missing quotes or truncated content")
            .enrich(content)
    })?;

    let mut triples = Vec::new();
    match &document {
        Value::Object(obj) if obj.contains_key("@graph") => {
            if let Some(items) = obj.get("@graph").and_then(Value::as_array) {
                for item in items {
                    walk_item(item, &mut triples);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_item(item, &mut triples);
            }
        }
        single => walk_item(single, &mut triples),
    }

    Ok(triples)
}

fn walk_item(item: &Value, triples: &mut Vec<Triple>) {
    let obj = match item.as_object() {
        Some(obj) => obj,
        None => return,
    };
    let subject = obj
        .get("@id")
        .and_then(Value::as_str)
        .or_else(|| obj.get("id").and_then(Value::as_str));
    // Items without an identity contribute nothing
    let subject = match subject {
        Some(subject) => subject,
        None => return,
    };

    if let Some(types) = obj.get("@type") {
        for declared in as_values(types) {
            if let Some(name) = declared.as_str() {
                triples.push(Triple::new(subject, "type", Term::Iri(name.to_string())));
            }
        }
    }

    for (key, value) in obj {
        if key.starts_with('@') || key == "id" || value.is_null() {
            continue;
        }
        for entry in as_values(value) {
            triples.push(Triple::new(subject, key, object_term(entry)));
        }
    }
}

/// One value or each element of an array value.
fn as_values(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn object_term(value: &Value) -> Term {
    match value {
        Value::Object(obj) => {
            if let Some(literal) = obj.get("@value") {
                Term::Literal {
                    value: scalar_string(literal),
                    datatype: obj.get("@type").and_then(Value::as_str).map(str::to_string),
                    language: obj.get("@language").and_then(Value::as_str).map(str::to_string),
                }
            } else if let Some(id) = obj
                .get("@id")
                .and_then(Value::as_str)
                .or_else(|| obj.get("id").and_then(Value::as_str))
            {
                Term::Iri(id.to_string())
            } else {
                // No identity and no @value: keep the raw JSON as a literal
                Term::literal(&value.to_string())
            }
        }
        other => Term::from_token(&scalar_string(other)),
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_document_goes_through_oxigraph() {
        let content = r#"[
            {"@id": "http://example.org/alice",
             "http://example.org/knows": [{"@id": "http://example.org/bob"}]}
        ]"#;
        let triples = JsonLdParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "http://example.org/alice");
        assert_eq!(triples[0].predicate, "http://example.org/knows");
        assert_eq!(triples[0].object, Term::Iri("http://example.org/bob".to_string()));
    }

    #[test]
    fn test_walker_handles_plain_id_graphs() {
        // Plain "id" keys and unmapped terms expand to zero quads, so the
        // walker path produces the triples.
        let content = r#"{"@graph": [
            {"id": "node1", "connectsTo": "node2"},
            {"id": "node2", "connectsTo": {"id": "node3"}}
        ]}"#;
        let triples = JsonLdParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, "node1");
        assert_eq!(triples[0].object, Term::literal("node2"));
        // A nested object identified by a plain "id" key is a reference
        assert_eq!(triples[1].object, Term::Iri("node3".to_string()));
    }

    #[test]
    fn test_walker_type_and_value_objects() {
        let content = r#"{"@graph": [
            {"id": "n1",
             "@type": ["Person", "Agent"],
             "age": {"@value": 42, "@type": "http://www.w3.org/2001/XMLSchema#integer"},
             "friend": {"@id": "n2"}}
        ]}"#;
        let triples = JsonLdParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 4);
        assert_eq!(triples[0].predicate, "type");
        assert_eq!(triples[0].object, Term::Iri("Person".to_string()));
        assert_eq!(triples[1].object, Term::Iri("Agent".to_string()));
        assert_eq!(
            triples[2].object,
            Term::typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer")
        );
        assert_eq!(triples[3].object, Term::Iri("n2".to_string()));
    }

    #[test]
    fn test_invalid_json_is_rejected_with_line() {
        let err = JsonLdParser::new().parse("{\n  \"@graph\": [\n").unwrap_err();

        assert!(err.message.contains("Invalid JSON-LD format"), "got: {}", err.message);
        assert!(err.line.is_some());
    }

    #[test]
    fn test_items_without_identity_are_skipped() {
        let content = r#"[{"name": "no id here"}, 42, {"id": "n1", "p": "o"}]"#;
        let triples = JsonLdParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "n1");
    }
}
