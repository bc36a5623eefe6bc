//! Session-related types.
//!
//! Types stored under the session key for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plugon_core::{Email, Role, UserId};

/// The logged-in user's profile and role.
///
/// Serialized with the camelCase field names used by the PlugOn API and by
/// previously persisted sessions (`firstName`, `companyName`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque user identifier.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Access tier.
    pub role: Role,
    /// Company the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// When the account (or demo session) was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Name as shown in the user dropdown: first name, space, last name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Storage keys for persisted client state.
pub mod keys {
    /// Default key for the logged-in identity.
    pub const SESSION: &str = "plugon-demo-user";

    /// Default key for the cart line list.
    pub const CART: &str = "plugon-cart";

    /// Default key for the API session cookies.
    pub const COOKIES: &str = "plugon-api-cookies";
}
