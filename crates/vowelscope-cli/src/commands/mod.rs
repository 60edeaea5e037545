//! CLI command implementations.

pub mod analyze;
pub mod config;
pub mod generate;
pub mod info;
pub mod vowels;
