//! Streaming RDF/XML parsing built on quick-xml events.
//!
//! Elements carrying `rdf:about`/`rdf:ID`/`rdf:nodeID` open a subject scope;
//! their direct children are read as predicates whose object comes from
//! `rdf:resource`, `rdf:nodeID` or collected text content. Nested resource
//! descriptions open subject scopes of their own.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::{Term, Triple};
use crate::parsing::format_detector::TripleFormat;
use crate::parsing::parse_error::ParseError;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// What an open element contributes while its subtree is being read.
enum Frame {
    /// A resource description: direct children are predicates of this subject.
    Subject(String),
    /// A predicate element: collects its object until the closing tag.
    Property { predicate: String, datatype: Option<String>, buffer: String, emitted: bool },
    /// Wrapper elements such as `rdf:RDF`, or elements with no subject identity.
    Neutral,
}

pub struct RdfXmlParser;

impl RdfXmlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut triples = Vec::new();
        let mut base_uri = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let frame = open_element(&e, &stack, &mut base_uri, &mut triples);
                    stack.push(frame);
                }
                Ok(Event::Empty(e)) => {
                    // Self-closing element: open and close in one step
                    let frame = open_element(&e, &stack, &mut base_uri, &mut triples);
                    close_frame(frame, &stack, &mut triples);
                }
                Ok(Event::Text(e)) => {
                    if let Some(Frame::Property { buffer, .. }) = stack.last_mut() {
                        match e.unescape() {
                            Ok(text) => buffer.push_str(&text),
                            Err(_) => buffer.push_str(&String::from_utf8_lossy(e.as_ref())),
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(Frame::Property { buffer, .. }) = stack.last_mut() {
                        buffer.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(frame) = stack.pop() {
                        close_frame(frame, &stack, &mut triples);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    let position =
                        usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
                    let line = content[..position.min(content.len())].matches('\n').count() + 1;
                    return Err(ParseError::new(
                        TripleFormat::RdfXml,
                        format!("Invalid RDF/XML format: {}", e),
                    )
                    .with_line(line)
                    .with_hint("Check that tags are balanced and attribute values are quoted")
                    .enrich(content));
                }
            }
            buf.clear();
        }

        Ok(triples)
    }
}

/// Classifies an opening element by its position and attributes, emitting any
/// triples that are complete at the opening tag (attribute triples, type
/// declarations, `rdf:resource` objects).
fn open_element(
    e: &BytesStart<'_>,
    stack: &[Frame],
    base_uri: &mut String,
    triples: &mut Vec<Triple>,
) -> Frame {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let attrs = collect_attrs(e);

    // The document element only contributes the base URI
    if stack.is_empty() {
        if let Some(base) = attr_value(&attrs, "xml:base") {
            *base_uri = base;
        }
        return Frame::Neutral;
    }

    // Directly under a subject the element is a predicate
    if let Some(Frame::Subject(subject)) = stack.last() {
        let predicate = expand_qname(&name);
        let datatype = attr_value(&attrs, "rdf:datatype").map(|dt| expand_qname(&dt));
        let mut emitted = false;
        if let Some(resource) = attr_value(&attrs, "rdf:resource") {
            triples.push(Triple::new(subject, &predicate, Term::iri(&resource)));
            emitted = true;
        } else if let Some(label) = attr_value(&attrs, "rdf:nodeID") {
            triples.push(Triple::new(subject, &predicate, Term::blank(&label)));
            emitted = true;
        }
        return Frame::Property { predicate, datatype, buffer: String::new(), emitted };
    }

    // Anywhere else the element is a subject candidate
    let about = attr_value(&attrs, "rdf:about")
        .or_else(|| attr_value(&attrs, "rdf:ID"))
        .filter(|v| !v.is_empty());
    let subject = match about {
        Some(about) if about.starts_with('#') && !base_uri.is_empty() => {
            format!("{}{}", base_uri, about)
        }
        Some(about) => about,
        None => match attr_value(&attrs, "rdf:nodeID") {
            Some(label) => format!("_:{}", label),
            None => return Frame::Neutral,
        },
    };

    if let Some(declared) = attr_value(&attrs, "rdf:type") {
        triples.push(Triple::new(&subject, RDF_TYPE, Term::iri(&expand_qname(&declared))));
    }
    for (key, value) in &attrs {
        if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("rdf:") {
            continue;
        }
        triples.push(Triple::new(&subject, &expand_qname(key), Term::literal(value)));
    }

    Frame::Subject(subject)
}

/// Emits the buffered text object of a predicate element, if no resource or
/// blank node object was already emitted at the opening tag.
fn close_frame(frame: Frame, stack: &[Frame], triples: &mut Vec<Triple>) {
    let (predicate, datatype, buffer, emitted) = match frame {
        Frame::Property { predicate, datatype, buffer, emitted } => {
            (predicate, datatype, buffer, emitted)
        }
        _ => return,
    };
    if emitted {
        return;
    }
    let text = buffer.trim();
    if text.is_empty() {
        return;
    }
    if let Some(Frame::Subject(subject)) = stack.last() {
        let object = match datatype.as_deref() {
            Some(XSD_STRING) | None => Term::literal(text),
            Some(dt) => Term::typed_literal(text, dt),
        };
        triples.push(Triple::new(subject, &predicate, object));
    }
}

fn collect_attrs(e: &BytesStart<'_>) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attrs.push((key, value));
    }
    attrs
}

fn attr_value(attrs: &[(String, String)], name: &str) -> Option<String> {
    attrs.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
}

/// Expands `rdf:`, `rdfs:` and `owl:` qualified names to full IRIs; any other
/// name, prefixed or not, passes through unchanged.
fn expand_qname(qname: &str) -> String {
    match qname.split_once(':') {
        Some(("rdf", local)) => format!("{}{}", RDF_NS, local),
        Some(("rdfs", local)) => format!("{}{}", RDFS_NS, local),
        Some(("owl", local)) => format!("{}{}", OWL_NS, local),
        _ => qname.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_with_resource_and_literal_objects() {
        let content = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/" xml:base="http://example.org/physics">
  <rdf:Description rdf:about="#einstein">
    <ex:developed rdf:resource="http://example.org/relativity"/>
    <ex:born rdf:datatype="http://www.w3.org/2001/XMLSchema#gYear">1879</ex:born>
  </rdf:Description>
</rdf:RDF>"##;
        let triples = RdfXmlParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, "http://example.org/physics#einstein");
        assert_eq!(triples[0].predicate, "ex:developed");
        assert_eq!(triples[0].object, Term::Iri("http://example.org/relativity".to_string()));
        assert_eq!(
            triples[1].object,
            Term::typed_literal("1879", "http://www.w3.org/2001/XMLSchema#gYear")
        );
    }

    #[test]
    fn test_qname_expansion_for_known_vocabularies() {
        let content = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="http://example.org/a">
    <rdfs:label>Thing A</rdfs:label>
    <owl:sameAs rdf:resource="http://example.org/b"/>
  </rdf:Description>
</rdf:RDF>"#;
        let triples = RdfXmlParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].predicate, "http://www.w3.org/2000/01/rdf-schema#label");
        assert_eq!(triples[0].object, Term::literal("Thing A"));
        assert_eq!(triples[1].predicate, "http://www.w3.org/2002/07/owl#sameAs");
    }

    #[test]
    fn test_type_attribute_and_plain_attributes_become_triples() {
        let content = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/a" rdf:type="owl:Class" ex:code="A1"/>
</rdf:RDF>"#;
        let triples = RdfXmlParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].predicate, RDF_TYPE);
        assert_eq!(
            triples[0].object,
            Term::Iri("http://www.w3.org/2002/07/owl#Class".to_string())
        );
        assert_eq!(triples[1].predicate, "ex:code");
        assert_eq!(triples[1].object, Term::literal("A1"));
    }

    #[test]
    fn test_nested_descriptions_open_their_own_subjects() {
        let content = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/a">
    <ex:knows>
      <rdf:Description rdf:about="http://example.org/b">
        <ex:name>Bob</ex:name>
      </rdf:Description>
    </ex:knows>
  </rdf:Description>
</rdf:RDF>"#;
        let triples = RdfXmlParser::new().parse(content).unwrap();

        // The inner description yields its own triple; the enclosing property
        // collects only whitespace and produces nothing.
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "http://example.org/b");
        assert_eq!(triples[0].object, Term::literal("Bob"));
    }

    #[test]
    fn test_blank_node_subjects_and_objects() {
        let content = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:ex="http://example.org/">
  <rdf:Description rdf:nodeID="b0">
    <ex:linkedTo rdf:nodeID="b1"/>
  </rdf:Description>
</rdf:RDF>"#;
        let triples = RdfXmlParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "_:b0");
        assert_eq!(triples[0].object, Term::Blank("_:b1".to_string()));
    }

    #[test]
    fn test_malformed_xml_reports_line() {
        let content = "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n<rdf:Description rdf:about=\"http://example.org/a\">\n</wrong>\n</rdf:RDF>";
        let err = RdfXmlParser::new().parse(content).unwrap_err();

        assert!(err.message.contains("Invalid RDF/XML format"), "got: {}", err.message);
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn test_xml_without_rdf_yields_no_triples() {
        let triples = RdfXmlParser::new()
            .parse("<catalog><item>one</item><item>two</item></catalog>")
            .unwrap();
        assert!(triples.is_empty());
    }
}
