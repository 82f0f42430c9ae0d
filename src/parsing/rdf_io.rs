//! Shared oxigraph reader surface for the standards-compliant parse paths.

use oxigraph::io::{RdfFormat, RdfParser};

use crate::core::{Term, Triple};

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Runs oxigraph's parser for the given format over the whole document and
/// converts the produced quads into pipeline triples. The error is the
/// underlying parser's message, which usually carries a line position.
pub(crate) fn parse_with_oxigraph(content: &str, format: RdfFormat) -> Result<Vec<Triple>, String> {
    let parser = RdfParser::from_format(format);
    let mut triples = Vec::new();

    for quad in parser.for_slice(content.as_bytes()) {
        let quad = quad.map_err(|e| e.to_string())?;
        triples.push(Triple {
            subject: strip_angle_brackets(quad.subject.to_string()),
            predicate: quad.predicate.into_string(),
            object: convert_object(quad.object),
        });
    }

    Ok(triples)
}

/// Named nodes render as `<iri>`, blank nodes as `_:label`; only the former
/// need unwrapping.
fn strip_angle_brackets(rendered: String) -> String {
    if rendered.starts_with('<') && rendered.ends_with('>') && rendered.len() >= 2 {
        rendered[1..rendered.len() - 1].to_string()
    } else {
        rendered
    }
}

fn convert_object(term: oxigraph::model::Term) -> Term {
    use oxigraph::model::Term as OxTerm;

    match term {
        OxTerm::NamedNode(node) => Term::Iri(node.into_string()),
        OxTerm::BlankNode(node) => Term::Blank(format!("_:{}", node.as_str())),
        OxTerm::Literal(literal) => {
            let language = literal.language().map(|lang| lang.to_string());
            let datatype = if language.is_some() || literal.datatype().as_str() == XSD_STRING {
                None
            } else {
                Some(literal.datatype().as_str().to_string())
            };
            Term::Literal { value: literal.value().to_string(), datatype, language }
        }
        other => Term::literal(&other.to_string()),
    }
}
