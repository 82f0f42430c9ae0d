//! Turtle parsing with an injected strategy and a degradation ladder.
//!
//! The primary strategy delegates to oxigraph's standards-compliant parser.
//! The fallback strategy is a deliberately naive regex parser for files the
//! real parser rejects: it degrades through three levels, each tried only
//! when the previous one extracts nothing, so a later level never overrides
//! statements an earlier level already found.

use std::collections::HashMap;

use oxigraph::io::RdfFormat;
use regex::Regex;

use crate::core::{Term, Triple};
use crate::parsing::format_detector::TripleFormat;
use crate::parsing::parse_error::ParseError;
use crate::parsing::rdf_io;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A way of turning Turtle text into triples. Selected at construction time.
pub trait TurtleStrategy {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError>;
}

/// Standards-compliant strategy backed by oxigraph.
pub struct OxigraphTurtle;

impl TurtleStrategy for OxigraphTurtle {
    fn name(&self) -> &'static str {
        "oxigraph"
    }

    fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        rdf_io::parse_with_oxigraph(content, RdfFormat::Turtle).map_err(|message| {
            ParseError::new(TripleFormat::Turtle, message)
                .with_hint("Check that all prefixes are declared and each statement ends with a period (.)")
                .enrich(content)
        })
    }
}

/// Naive regex strategy for malformed Turtle.
pub struct RegexTurtle {
    prefix_decl: Regex,
    statement: Regex,
    literal_object: Regex,
}

impl RegexTurtle {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            prefix_decl: Regex::new(r"@prefix\s+([A-Za-z][\w-]*)?:\s*<([^>]*)>")?,
            statement: Regex::new(
                r"(?m)^\s*(<[^>]+>|[A-Za-z][\w.-]*:[\w.-]+|_:[\w-]+)\s+(a|<[^>]+>|[A-Za-z][\w.-]*:[\w.-]+)\s+(.+?)\s*\.\s*$",
            )?,
            literal_object: Regex::new(r#"^"((?:[^"\\]|\\.)*)"(?:@([A-Za-z][A-Za-z0-9-]*)|\^\^(\S+))?$"#)?,
        })
    }

    /// Level 1: statement regex with prefix expansion.
    fn parse_statements(&self, content: &str, prefixes: &HashMap<String, String>) -> Vec<Triple> {
        let mut triples = Vec::new();
        for captures in self.statement.captures_iter(content) {
            let (subject, predicate, object) =
                match (captures.get(1), captures.get(2), captures.get(3)) {
                    (Some(s), Some(p), Some(o)) => (s, p, o),
                    _ => continue,
                };

            let subject = expand_token(subject.as_str(), prefixes);
            let predicate = if predicate.as_str() == "a" {
                RDF_TYPE.to_string()
            } else {
                expand_token(predicate.as_str(), prefixes)
            };
            let object = self.parse_object(object.as_str(), prefixes);
            triples.push(Triple { subject, predicate, object });
        }
        triples
    }

    fn parse_object(&self, token: &str, prefixes: &HashMap<String, String>) -> Term {
        if let Some(captures) = self.literal_object.captures(token) {
            let value = captures.get(1).map_or("", |m| m.as_str());
            if let Some(lang) = captures.get(2) {
                return Term::lang_literal(value, lang.as_str());
            }
            if let Some(datatype) = captures.get(3) {
                let datatype = expand_token(datatype.as_str(), prefixes);
                return Term::typed_literal(value, &datatype);
            }
            return Term::literal(value);
        }
        if token.starts_with("_:") {
            return Term::Blank(token.to_string());
        }
        let expanded = expand_token(token, prefixes);
        if expanded != token || token.starts_with('<') {
            return Term::Iri(expanded);
        }
        Term::from_token(token)
    }

    /// Level 2: whitespace-split each period-delimited statement into 3 fields.
    fn split_statements(content: &str) -> Vec<Triple> {
        content.split('.').filter_map(naive_triple).collect()
    }

    /// Level 3: per-line 3-word splitting, the last resort.
    fn split_lines(content: &str) -> Vec<Triple> {
        content
            .lines()
            .filter_map(|line| naive_triple(line.trim_end_matches('.')))
            .collect()
    }
}

impl TurtleStrategy for RegexTurtle {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let cleaned = strip_comments(content);
        let mut prefixes = default_prefixes();
        for captures in self.prefix_decl.captures_iter(&cleaned) {
            let name = captures.get(1).map_or("", |m| m.as_str()).to_string();
            if let Some(iri) = captures.get(2) {
                prefixes.insert(name, iri.as_str().to_string());
            }
        }

        let without_decls: String = cleaned
            .lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                !trimmed.starts_with("@prefix") && !trimmed.starts_with("@base")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let triples = self.parse_statements(&without_decls, &prefixes);
        if !triples.is_empty() {
            return Ok(triples);
        }

        log::debug!("turtle statement regex found nothing, degrading to period splitting");
        let triples = Self::split_statements(&without_decls);
        if !triples.is_empty() {
            return Ok(triples);
        }

        log::debug!("period splitting found nothing, degrading to per-line splitting");
        let triples = Self::split_lines(&without_decls);
        if !triples.is_empty() {
            return Ok(triples);
        }

        Err(ParseError::new(
            TripleFormat::Turtle,
            "No statements could be extracted from the Turtle content",
        )
        .with_hint("Make sure each statement has a subject, predicate and object and ends with a period (.)"))
    }
}

/// Turtle parser with construction-time strategy selection: the default pairs
/// the oxigraph strategy with the regex fallback, engaged when the primary
/// fails or produces nothing.
pub struct TurtleParser {
    strategies: Vec<Box<dyn TurtleStrategy>>,
}

impl TurtleParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self { strategies: vec![Box::new(OxigraphTurtle), Box::new(RegexTurtle::new()?)] })
    }

    /// Regex-only parser, for environments where the full parser is unwanted.
    pub fn minimal() -> Result<Self, regex::Error> {
        Ok(Self { strategies: vec![Box::new(RegexTurtle::new()?)] })
    }

    /// Single caller-provided strategy.
    pub fn with_strategy(strategy: Box<dyn TurtleStrategy>) -> Self {
        Self { strategies: vec![strategy] }
    }

    pub fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let mut first_error: Option<ParseError> = None;

        for strategy in &self.strategies {
            match strategy.parse(content) {
                Ok(triples) if !triples.is_empty() => return Ok(triples),
                Ok(_) => {
                    log::debug!("turtle strategy '{}' found no triples, trying next", strategy.name());
                }
                Err(err) => {
                    log::debug!("turtle strategy '{}' failed: {}", strategy.name(), err.message);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            ParseError::new(TripleFormat::Turtle, "No statements could be extracted from the Turtle content")
                .with_hint("Make sure each statement ends with a period (.)")
        }))
    }
}

/// The well-known prefixes assumed even without declarations.
fn default_prefixes() -> HashMap<String, String> {
    HashMap::from([
        ("rdf".to_string(), "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_string()),
        ("rdfs".to_string(), "http://www.w3.org/2000/01/rdf-schema#".to_string()),
        ("owl".to_string(), "http://www.w3.org/2002/07/owl#".to_string()),
        ("xsd".to_string(), "http://www.w3.org/2001/XMLSchema#".to_string()),
    ])
}

/// Expands `prefix:local` through the table, strips angle brackets from IRIs,
/// and leaves anything else untouched.
fn expand_token(token: &str, prefixes: &HashMap<String, String>) -> String {
    if token.starts_with('<') && token.ends_with('>') && token.len() >= 2 {
        return token[1..token.len() - 1].to_string();
    }
    if let Some((prefix, local)) = token.split_once(':') {
        if let Some(base) = prefixes.get(prefix) {
            return format!("{}{}", base, local);
        }
    }
    token.to_string()
}

/// Cuts `#` comments while leaving fragment IRIs and quoted text alone.
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut in_iri = false;
            let mut in_quote = false;
            for (i, ch) in line.char_indices() {
                match ch {
                    '<' if !in_quote => in_iri = true,
                    '>' if !in_quote => in_iri = false,
                    '"' if !in_iri => in_quote = !in_quote,
                    '#' if !in_iri && !in_quote => return &line[..i],
                    _ => {}
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First two whitespace tokens plus the joined remainder, or None.
fn naive_triple(text: &str) -> Option<Triple> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return None;
    }
    let object = words[2..].join(" ");
    Some(Triple {
        subject: bare_token(words[0]),
        predicate: bare_token(words[1]),
        object: Term::from_token(&object),
    })
}

fn bare_token(token: &str) -> String {
    if token.starts_with('<') && token.ends_with('>') && token.len() >= 2 {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
