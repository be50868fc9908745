//! CLI library components for tabex.

pub mod logging;
pub mod pipeline;
