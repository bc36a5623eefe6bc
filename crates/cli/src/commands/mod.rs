//! Subcommand implementations.
//!
//! Each command borrows the application state, does one thing and prints the
//! result to stdout. Diagnostics go to stderr through `tracing`.

pub mod access;
pub mod auth;
pub mod cart;
pub mod catalog;
