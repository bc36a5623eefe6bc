//! PlugOn Core - Shared types library.
//!
//! This crate provides the value types shared by every PlugOn component:
//! - `storefront` - Session and cart state, collaborators, services
//! - `cli` - Command-line front end over the storefront core
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
