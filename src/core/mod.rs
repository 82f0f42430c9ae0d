//! Core data structures shared by every stage of the ingestion pipeline.

use std::fmt;

/// An RDF object term carried as a tagged value instead of a raw string,
/// so downstream stages never have to re-sniff `_:` prefixes or quote syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// An IRI without surrounding angle brackets.
    Iri(String),
    /// A blank node label, including the `_:` prefix.
    Blank(String),
    /// A literal with its lexical value and optional datatype IRI or language tag.
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    /// Creates an IRI term, stripping one layer of angle brackets if present.
    pub fn iri(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with('<') && trimmed.ends_with('>') && trimmed.len() >= 2 {
            Term::Iri(trimmed[1..trimmed.len() - 1].to_string())
        } else {
            Term::Iri(trimmed.to_string())
        }
    }

    /// Creates a blank node term, normalizing the label to carry the `_:` prefix.
    pub fn blank(label: &str) -> Self {
        if label.starts_with("_:") {
            Term::Blank(label.to_string())
        } else {
            Term::Blank(format!("_:{}", label))
        }
    }

    /// Creates a plain literal term.
    pub fn literal(value: &str) -> Self {
        Term::Literal { value: value.to_string(), datatype: None, language: None }
    }

    /// Creates a literal term with a datatype IRI.
    pub fn typed_literal(value: &str, datatype: &str) -> Self {
        Term::Literal {
            value: value.to_string(),
            datatype: Some(datatype.to_string()),
            language: None,
        }
    }

    /// Creates a language-tagged literal term.
    pub fn lang_literal(value: &str, language: &str) -> Self {
        Term::Literal {
            value: value.to_string(),
            datatype: None,
            language: Some(language.to_string()),
        }
    }

    /// Classifies a bare token from a naive parser into a term.
    /// Angle-bracketed or `http(s)://` tokens become IRIs, `_:` tokens blank
    /// nodes, quoted or plain text a literal.
    pub fn from_token(token: &str) -> Self {
        let trimmed = token.trim();
        if trimmed.starts_with('<') && trimmed.ends_with('>') && trimmed.len() >= 2 {
            return Term::iri(trimmed);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Term::Iri(trimmed.to_string());
        }
        if trimmed.starts_with("_:") {
            return Term::Blank(trimmed.to_string());
        }
        let unquoted = trimmed.trim_matches('"');
        Term::literal(unquoted)
    }

    /// The lexical value used for node identity: the IRI, the blank label
    /// (with prefix), or the literal's value without any embedded syntax.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal { value, .. } => value,
        }
    }

    /// True for literal terms.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "{}", label),
            Term::Literal { value, datatype: Some(dt), .. } => {
                write!(f, "\"{}\"^^<{}>", value, dt)
            }
            Term::Literal { value, language: Some(lang), .. } => {
                write!(f, "\"{}\"@{}", value, lang)
            }
            Term::Literal { value, .. } => write!(f, "\"{}\"", value),
        }
    }
}

/// A single (subject, predicate, object) statement, the atomic unit of input.
/// Immutable once produced by a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: &str, predicate: &str, object: Term) -> Self {
        Self { subject: subject.to_string(), predicate: predicate.to_string(), object }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {} .", self.subject, self.predicate, self.object)
    }
}
