//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Login, logout and session sync against an identity provider
//! - `shop` - Cart actions that require a logged-in user
//! - `guard` - Page access rules by role

pub mod auth;
pub mod guard;
pub mod shop;
