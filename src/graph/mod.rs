//! Graph materialization and progressive-disclosure interaction.

pub mod builder;
pub(crate) mod chunked;
pub mod expansion;
pub mod filter;
pub mod model;
pub mod stats;
