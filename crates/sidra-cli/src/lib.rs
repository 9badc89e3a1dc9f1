//! CLI library components for the SIDRA panel builder.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
