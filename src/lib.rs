//! # GraphLoom
//!
//! GraphLoom ingests RDF-like triple data in several serializations and
//! materializes it into an explorable node/link graph model.
//!
//! The name comes from weaving: flat (subject, predicate, object) statements
//! are the threads, and the loom interlaces them into a connected fabric that
//! a user can explore one neighborhood at a time instead of all at once.
//!
//! ## Features
//!
//! - Content sniffing across JSON-LD, RDF/XML, Turtle, N-Triples and CSV,
//!   with parser fallthrough for mislabeled or slightly malformed files
//! - Annotation filtering so prose-like triples never flood the graph
//! - Synchronous graph building for small inputs and a chunked,
//!   worker-offloaded path for large ones
//! - Progressive disclosure: click-driven expansion and cascading collapse
//!
//! ## Example
//!
//! ```rust
//! use graphloom::{parse_document, GraphBuilder};
//!
//! fn example() -> graphloom::Result<()> {
//!     let triples = parse_document("<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .")?;
//!     let graph = GraphBuilder::new().build(&triples)?;
//!     assert_eq!(graph.metadata.total_nodes, 2);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::if_not_else)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Core data structures shared by every pipeline stage
pub mod core;

/// Format sniffing and the five serialization parsers
pub mod parsing;

/// Graph materialization: filter, builders, expansion, statistics
pub mod graph;

/// Bundled sample dataset bootstrap
pub mod bootstrap;

/// Graph export surfaces (JSON, JSON-LD, CSV table)
pub mod export;

pub mod error {
    //! Error types and result definitions

    use std::fmt;

    use crate::parsing::ParseError;

    /// Result type alias for GraphLoom operations
    pub type Result<T> = std::result::Result<T, Error>;

    /// Main error type for GraphLoom
    #[derive(Debug)]
    pub enum Error {
        /// A parser rejected the input
        Parse(ParseError),
        /// Parsing succeeded but produced no triples
        NoTriples,
        /// The chunked graph build aborted
        Build(String),
        /// A built-in detection or parsing pattern failed to compile
        Pattern(regex::Error),
        /// Exporting a graph failed to serialize
        Serialize(String),
        /// IO error
        Io(std::io::Error),
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::Parse(err) => write!(f, "{}", err),
                Error::NoTriples => write!(f, "No valid triples found in the input"),
                Error::Build(msg) => write!(f, "Graph build error: {}", msg),
                Error::Pattern(err) => write!(f, "Pattern error: {}", err),
                Error::Serialize(msg) => write!(f, "Serialization error: {}", msg),
                Error::Io(err) => write!(f, "IO error: {}", err),
            }
        }
    }

    impl std::error::Error for Error {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Error::Parse(err) => Some(err),
                Error::Pattern(err) => Some(err),
                Error::Io(err) => Some(err),
                _ => None,
            }
        }
    }

    impl From<ParseError> for Error {
        fn from(err: ParseError) -> Self {
            Error::Parse(err)
        }
    }

    impl From<regex::Error> for Error {
        fn from(err: regex::Error) -> Self {
            Error::Pattern(err)
        }
    }

    impl From<std::io::Error> for Error {
        fn from(err: std::io::Error) -> Self {
            Error::Io(err)
        }
    }
}

// Re-export commonly used types
pub use crate::core::{Term, Triple};
pub use error::{Error, Result};
pub use graph::builder::{BuildOptions, BuildProgress, GraphBuilder, VisibilityMode};
pub use graph::expansion::toggle_node;
pub use graph::model::GraphData;
pub use graph::stats::GraphStatistics;
pub use parsing::parse_document;
