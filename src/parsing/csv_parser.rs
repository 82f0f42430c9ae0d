//! CSV as a triple table: one `subject,predicate,object` row per line.

use crate::core::{Term, Triple};
use crate::parsing::format_detector::TripleFormat;
use crate::parsing::parse_error::ParseError;

pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses one triple per non-empty line. A line whose first three
    /// comma-separated fields are not all non-empty fails the whole parse;
    /// fields beyond the third are ignored.
    pub fn parse(&self, content: &str) -> Result<Vec<Triple>, ParseError> {
        let mut triples = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let subject = fields.first().copied().unwrap_or("");
            let predicate = fields.get(1).copied().unwrap_or("");
            let object = fields.get(2).copied().unwrap_or("");

            if subject.is_empty() || predicate.is_empty() || object.is_empty() {
                let line_number = idx + 1;
                return Err(ParseError::new(
                    TripleFormat::Csv,
                    format!("Invalid triple format on line {}", line_number),
                )
                .with_line(line_number)
                .with_hint("Each line needs three comma-separated values: subject,predicate,object")
                .enrich(content));
            }

            triples.push(Triple::new(subject, predicate, Term::from_token(object)));
        }

        Ok(triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_and_classifies_objects() {
        let content = "Albert Einstein,developed,Theory of Relativity\nAlbert Einstein,link,http://example.org/einstein";
        let triples = CsvParser::new().parse(content).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, "Albert Einstein");
        assert_eq!(triples[0].object, Term::literal("Theory of Relativity"));
        assert_eq!(triples[1].object, Term::Iri("http://example.org/einstein".to_string()));
    }

    #[test]
    fn test_short_row_fails_whole_parse() {
        let err = CsvParser::new().parse("s1,p1,o1\ns2,p2\n").unwrap_err();

        assert!(err.message.contains("Invalid triple format"), "got: {}", err.message);
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let triples = CsvParser::new().parse("a,b,c,ignored,also ignored").unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object, Term::literal("c"));
    }

    #[test]
    fn test_blank_lines_are_skipped_but_comment_lines_are_not() {
        let ok = CsvParser::new().parse("a,b,c\n\n d , e , f ").unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].subject, "d");

        // A comment line has a single field, which is a malformed row here
        assert!(CsvParser::new().parse("# header\na,b,c").is_err());
    }
}
