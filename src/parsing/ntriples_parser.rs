//! Line-oriented N-Triples parsing.
//!
//! Strict per line, forgiving per document: a line either scans as a complete
//! `<s> <p> o .` statement or is skipped silently. Partial extraction from a
//! line never happens.

use crate::core::{Term, Triple};
use crate::parsing::parse_error::ParseError;

pub struct NTriplesParser;

impl NTriplesParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses the content line by line, skipping blank lines, `#` comments
    /// and any line that does not scan as a full statement.
    pub fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let mut triples = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Ok(triple) = parse_triple_line(trimmed) {
                triples.push(triple);
            }
        }
        Ok(triples)
    }
}

/// Scans one line into a triple. The line must consist of exactly a subject
/// URI, a predicate URI, an object term and a closing period.
fn parse_triple_line(line: &str) -> Result<Triple, String> {
    let (subject, remaining) = parse_uri(line, "subject")?;
    let (predicate, remaining) = parse_uri(remaining, "predicate")?;
    let (object, remaining) = parse_object(remaining)?;

    if remaining.trim() != "." {
        return Err(format!("Expected terminating '.', got: {}", remaining));
    }

    Ok(Triple { subject, predicate, object })
}

/// Parse a URI enclosed in angle brackets
fn parse_uri<'a>(input: &'a str, field_name: &str) -> Result<(String, &'a str), String> {
    let input = input.trim_start();

    if !input.starts_with('<') {
        return Err(format!("Expected '<' for {} URI, got: {}", field_name, input));
    }

    let end_idx = input
        .find('>')
        .ok_or_else(|| format!("Missing closing '>' for {} URI", field_name))?;

    let uri = input[1..end_idx].to_string();
    let remaining = input[end_idx + 1..].trim_start();

    Ok((uri, remaining))
}

/// Parse an object term which can be:
/// - URI: <http://example.org/resource>
/// - Blank node: _:b0
/// - Plain literal: "some text"
/// - Typed literal: "23.5"^^<http://www.w3.org/2001/XMLSchema#decimal>
/// - Language-tagged literal: "hello"@en
fn parse_object(input: &str) -> Result<(Term, &str), String> {
    let input = input.trim_start();

    if input.starts_with('<') {
        let (uri, remaining) = parse_uri(input, "object")?;
        return Ok((Term::Iri(uri), remaining));
    }

    if input.starts_with("_:") {
        let end = input.find(char::is_whitespace).unwrap_or(input.len());
        let label = &input[..end];
        if label.len() == 2 {
            return Err("Empty blank node label".to_string());
        }
        return Ok((Term::Blank(label.to_string()), input[end..].trim_start()));
    }

    if input.starts_with('"') {
        return parse_literal(input);
    }

    Err(format!("Invalid object format: {}", input))
}

/// Parse a literal with optional datatype or language tag
fn parse_literal(input: &str) -> Result<(Term, &str), String> {
    let bytes = input.as_bytes();

    // Find the closing quote, handling escaped quotes. Scanning bytes keeps
    // the indices valid for slicing even with multi-byte literal content.
    let mut end_idx = 1;
    while end_idx < bytes.len() {
        if bytes[end_idx] == b'"' && bytes[end_idx - 1] != b'\\' {
            break;
        }
        end_idx += 1;
    }

    if end_idx >= bytes.len() {
        return Err("Missing closing quote for literal".to_string());
    }

    let value = input[1..end_idx].to_string();
    let after_quote = input[end_idx + 1..].trim_start();

    if let Some(after_caret) = after_quote.strip_prefix("^^") {
        let (datatype, remaining) = parse_uri(after_caret, "datatype")?;
        // xsd:string is the implicit default; keep those literals plain
        let term = if datatype == "http://www.w3.org/2001/XMLSchema#string" {
            Term::literal(&value)
        } else {
            Term::Literal { value, datatype: Some(datatype), language: None }
        };
        return Ok((term, remaining));
    }

    if let Some(after_at) = after_quote.strip_prefix('@') {
        let lang_end = after_at
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .unwrap_or(after_at.len());
        if lang_end == 0 {
            return Err("Empty language tag".to_string());
        }
        let term = Term::Literal {
            value,
            datatype: None,
            language: Some(after_at[..lang_end].to_string()),
        };
        return Ok((term, after_at[lang_end..].trim_start()));
    }

    Ok((Term::literal(&value), after_quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uri_object() {
        let content = "<http://example.org/a> <http://example.org/knows> <http://example.org/b> .";
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "http://example.org/a");
        assert_eq!(triples[0].predicate, "http://example.org/knows");
        assert_eq!(triples[0].object, Term::Iri("http://example.org/b".to_string()));
    }

    #[test]
    fn test_parse_typed_literal() {
        let content = r#"<http://example.org/sensor1> <http://example.org/temperature> "23.5"^^<http://www.w3.org/2001/XMLSchema#decimal> ."#;
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(
            triples[0].object,
            Term::typed_literal("23.5", "http://www.w3.org/2001/XMLSchema#decimal")
        );
    }

    #[test]
    fn test_parse_language_literal() {
        let content = r#"<http://example.org/a> <http://example.org/name> "Anna"@de ."#;
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples[0].object, Term::lang_literal("Anna", "de"));
    }

    #[test]
    fn test_parse_blank_node_object() {
        let content = "<http://example.org/a> <http://example.org/p> _:b0 .";
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples[0].object, Term::Blank("_:b0".to_string()));
    }

    #[test]
    fn test_escaped_quote_inside_literal() {
        let content = r#"<http://example.org/a> <http://example.org/says> "a \"quoted\" word" ."#;
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples[0].object.value(), r#"a \"quoted\" word"#);
    }

    #[test]
    fn test_skips_comments_blank_and_malformed_lines() {
        let content = "\
# a comment line

<http://example.org/a> <http://example.org/p> <http://example.org/b> .
this line does not scan
<http://example.org/c> <http://example.org/p> <http://example.org/d>
<http://example.org/e> <http://example.org/p> \"ok\" .";
        let triples = NTriplesParser::new().parse(content).unwrap();

        // The unterminated line (no '.') and the free text line are skipped whole
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, "http://example.org/a");
        assert_eq!(triples[1].subject, "http://example.org/e");
    }

    #[test]
    fn test_xsd_string_datatype_is_normalized_to_plain() {
        let content = r#"<http://example.org/a> <http://example.org/p> "text"^^<http://www.w3.org/2001/XMLSchema#string> ."#;
        let triples = NTriplesParser::new().parse(content).unwrap();

        assert_eq!(triples[0].object, Term::literal("text"));
    }
}
