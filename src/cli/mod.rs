//! Command handlers for the `nthkey` binary

pub mod commands;

pub use commands::*;
