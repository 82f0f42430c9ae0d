//! Content sniffing across the supported triple serializations.
//!
//! Detection is heuristic and non-exclusive: several formats can match the
//! same content. The first match in precedence order is dispatched first and
//! the ingestion pipeline falls through to the remaining formats if a parser
//! rejects the input, so a wrong guess here costs one failed attempt, not
//! the whole ingestion.

use std::fmt;

use regex::Regex;

/// The serializations the pipeline understands, in detection precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripleFormat {
    JsonLd,
    RdfXml,
    Turtle,
    NTriples,
    Csv,
}

impl TripleFormat {
    /// All formats in precedence order.
    pub const ALL: [TripleFormat; 5] = [
        TripleFormat::JsonLd,
        TripleFormat::RdfXml,
        TripleFormat::Turtle,
        TripleFormat::NTriples,
        TripleFormat::Csv,
    ];
}

impl fmt::Display for TripleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TripleFormat::JsonLd => "JSON-LD",
            TripleFormat::RdfXml => "RDF/XML",
            TripleFormat::Turtle => "Turtle",
            TripleFormat::NTriples => "N-Triples",
            TripleFormat::Csv => "CSV",
        };
        write!(f, "{}", name)
    }
}

/// Compiled detection heuristics.
pub struct FormatDetector {
    /// Turtle: a prefixed-name subject followed by a prefixed-name predicate
    /// at the start of the content, e.g. `ex:alice foaf:knows ...`.
    turtle_qname: Regex,
    /// Turtle: an IRI subject with `a` or an IRI predicate ending in a period.
    turtle_statement: Regex,
    /// N-Triples: a whole line of three angle-bracketed URIs and a period.
    ntriples_line: Regex,
}

impl FormatDetector {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            turtle_qname: Regex::new(r"^(?:[a-zA-Z][\w-]*:)?[a-zA-Z][\w-]*\s+[a-zA-Z][\w-]*:")?,
            turtle_statement: Regex::new(r"<[^>]+>\s+(?:a|<[^>]+>)\s+[^.]+\s*\.")?,
            ntriples_line: Regex::new(r"(?m)^<[^>]+>\s+<[^>]+>\s+<[^>]+>\s*\.")?,
        })
    }

    /// Whether one format's heuristic matches the content.
    pub fn matches(&self, format: TripleFormat, content: &str) -> bool {
        let trimmed = content.trim_start();
        match format {
            TripleFormat::JsonLd => trimmed.starts_with('{') || trimmed.starts_with('['),
            TripleFormat::RdfXml => {
                content.contains("<?xml")
                    || content.contains("<rdf:RDF")
                    || content.contains("xmlns:rdf=")
            }
            TripleFormat::Turtle => {
                content.contains("@prefix")
                    || content.contains("@base")
                    || self.turtle_qname.is_match(trimmed)
                    || self.turtle_statement.is_match(content)
            }
            TripleFormat::NTriples => self.ntriples_line.is_match(content),
            TripleFormat::Csv => content.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#') && line.split(',').count() == 3
            }),
        }
    }

    /// The most likely format, if any heuristic matches at all.
    pub fn detect(&self, content: &str) -> Option<TripleFormat> {
        TripleFormat::ALL.iter().copied().find(|f| self.matches(*f, content))
    }

    /// Every format ordered for a fallthrough attempt: matched heuristics
    /// first (in precedence order), then the rest (in precedence order), so
    /// each parser is tried at most once and the likeliest go first.
    pub fn candidates(&self, content: &str) -> Vec<TripleFormat> {
        let mut ordered: Vec<TripleFormat> =
            TripleFormat::ALL.iter().copied().filter(|f| self.matches(*f, content)).collect();
        for format in TripleFormat::ALL {
            if !ordered.contains(&format) {
                ordered.push(format);
            }
        }
        ordered
    }
}
