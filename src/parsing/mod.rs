//! Multi-format triple ingestion.
//!
//! A detector ranks candidate serializations with cheap syntactic heuristics;
//! the pipeline then tries the candidates in order, falling through to the
//! next format whenever a parser rejects the input or extracts nothing. Only
//! when every format has failed is a single error surfaced, chosen as the
//! most informative one collected along the way.

pub mod csv_parser;
pub mod format_detector;
pub mod jsonld_parser;
pub mod ntriples_parser;
pub mod parse_error;
pub(crate) mod rdf_io;
pub mod rdfxml_parser;
pub mod turtle_parser;

pub use format_detector::{FormatDetector, TripleFormat};
pub use parse_error::ParseError;

use crate::core::Triple;
use crate::parsing::csv_parser::CsvParser;
use crate::parsing::jsonld_parser::JsonLdParser;
use crate::parsing::ntriples_parser::NTriplesParser;
use crate::parsing::rdfxml_parser::RdfXmlParser;
use crate::parsing::turtle_parser::{TurtleParser, TurtleStrategy};

/// The detector plus one parser per supported serialization.
pub struct IngestionPipeline {
    detector: FormatDetector,
    jsonld: JsonLdParser,
    rdfxml: RdfXmlParser,
    turtle: TurtleParser,
    ntriples: NTriplesParser,
    csv: CsvParser,
}

impl IngestionPipeline {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            detector: FormatDetector::new()?,
            jsonld: JsonLdParser::new(),
            rdfxml: RdfXmlParser::new(),
            turtle: TurtleParser::new()?,
            ntriples: NTriplesParser::new(),
            csv: CsvParser::new(),
        })
    }

    /// Swaps the Turtle strategy chain; every other parser stays as built.
    pub fn with_turtle_strategy(mut self, strategy: Box<dyn TurtleStrategy>) -> Self {
        self.turtle = TurtleParser::with_strategy(strategy);
        self
    }

    /// Parses the content, most plausible format first. A parser that throws
    /// or extracts zero triples fails that format and control falls through
    /// to the next candidate.
    pub fn parse(&self, content: &str) -> crate::Result<Vec<Triple>> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::NoTriples);
        }

        let mut failures: Vec<ParseError> = Vec::new();
        for format in self.detector.candidates(trimmed) {
            match self.parse_as(format, content) {
                Ok(triples) if !triples.is_empty() => {
                    log::debug!("parsed {} triples as {}", triples.len(), format);
                    return Ok(triples);
                }
                Ok(_) => {
                    log::debug!("{} parser extracted nothing, falling through", format);
                    failures.push(ParseError::new(format, "no valid triples found"));
                }
                Err(err) => {
                    log::debug!("{} parser failed: {}", format, err.message);
                    failures.push(err);
                }
            }
        }

        Err(self.most_informative(failures, trimmed))
    }

    fn parse_as(&self, format: TripleFormat, content: &str) -> Result<Vec<Triple>, ParseError> {
        match format {
            TripleFormat::JsonLd => self.jsonld.parse(content),
            TripleFormat::RdfXml => self.rdfxml.parse(content),
            TripleFormat::Turtle => self.turtle.parse(content),
            TripleFormat::NTriples => self.ntriples.parse(content),
            TripleFormat::Csv => self.csv.parse(content),
        }
    }

    /// Ranks collected failures: line-anchored errors outrank hint-only ones,
    /// which outrank undecorated ones; errors from formats whose heuristic
    /// actually matched get a small boost. Ties go to the longer message,
    /// then to the earlier candidate.
    fn most_informative(&self, failures: Vec<ParseError>, content: &str) -> crate::Error {
        let mut best: Option<(usize, ParseError)> = None;
        for err in failures {
            let mut score = 0;
            if err.line.is_some() {
                score += 4;
            }
            if err.hint.is_some() {
                score += 2;
            }
            if self.detector.matches(err.format, content) {
                score += 1;
            }
            let better = best.as_ref().map_or(true, |(top, held)| {
                score > *top || (score == *top && err.message.len() > held.message.len())
            });
            if better {
                best = Some((score, err));
            }
        }
        match best {
            Some((_, err)) => crate::Error::Parse(err),
            None => crate::Error::NoTriples,
        }
    }
}

/// One-call convenience over a freshly constructed pipeline.
pub fn parse_document(content: &str) -> crate::Result<Vec<Triple>> {
    IngestionPipeline::new()?.parse(content)
}
