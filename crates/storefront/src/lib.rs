//! PlugOn platform state core.
//!
//! This crate holds the client-side state of the PlugOn platform: who is
//! logged in ([`stores::SessionStore`]) and what is in the shopping cart
//! ([`stores::CartStore`]). Both persist to a [`storage::KeyValueStore`] and
//! notify subscribers after every change.
//!
//! Product lookup and login go through collaborator traits
//! ([`catalog::ProductCatalog`], [`services::auth::IdentityProvider`]) with a
//! built-in demo backing and an HTTP backing for the PlugOn API.
//! [`state::AppState`] wires everything together from [`config::PlugonConfig`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;
