//! The session store: who is logged in.
//!
//! Holds at most one [`Identity`], writes it through to the key-value store on
//! every change and answers role and permission questions about it. Loading
//! never fails: a stored identity that cannot be decoded is deleted and the
//! session starts anonymous.

use std::sync::Arc;

use tracing::{debug, error, warn};

use plugon_core::{Permission, Role, RoleSet};

use crate::models::Identity;
use crate::storage::KeyValueStore;

use super::observer::{Observers, SubscriptionId};

/// Landing page for staff roles after login.
pub const DASHBOARD_PATH: &str = "/mystore/dashboard.html";

/// Site root, the landing page for everyone else.
pub const HOME_PATH: &str = "/";

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An identity was set (login or refresh from the server).
    Login(Identity),
    /// The identity was cleared.
    Logout,
}

/// Single authoritative holder of the current identity.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    identity: Option<Identity>,
    observers: Observers<SessionEvent>,
}

impl SessionStore {
    /// Create an anonymous store without reading storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            identity: None,
            observers: Observers::new(),
        }
    }

    /// Create a store and immediately [`load`](Self::load) it.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.load();
        store
    }

    /// Replace the in-memory identity with the persisted one.
    ///
    /// A document that fails to decode is removed from storage. Storage read
    /// failures leave the session anonymous. Neither case is reported to the
    /// caller, and no event is emitted.
    pub fn load(&mut self) {
        self.identity = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    debug!(user_id = %identity.id, role = %identity.role, "Loaded session");
                    Some(identity)
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Discarding corrupt stored session");
                    if let Err(e) = self.storage.remove(&self.key) {
                        error!(key = %self.key, error = %e, "Failed to remove corrupt session");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored session");
                None
            }
        };
    }

    /// Whether an identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The current identity, if any.
    #[must_use]
    pub const fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The current role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.identity.as_ref().map(|identity| &identity.role)
    }

    /// Whether the current identity's role is in `roles`.
    ///
    /// Always false when anonymous or when the stored role is unknown.
    #[must_use]
    pub fn has_role(&self, roles: impl RoleSet) -> bool {
        self.role()
            .is_some_and(|role| role.is_known() && roles.contains_role(role))
    }

    /// Whether the current identity holds `permission`.
    ///
    /// `super_admin` holds every permission. Always false when anonymous.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role()
            .is_some_and(|role| role.has_permission(permission))
    }

    /// Permission check by wire name.
    ///
    /// `super_admin` passes for any name, including ones this build does not
    /// know; every other role needs a known permission from its table.
    #[must_use]
    pub fn has_permission_named(&self, name: &str) -> bool {
        match self.role() {
            Some(Role::SuperAdmin) => true,
            Some(role) => name
                .parse::<Permission>()
                .is_ok_and(|permission| role.has_permission(permission)),
            None => false,
        }
    }

    /// Task schedule access: `super_admin`, `headquarters`, `branch`.
    #[must_use]
    pub fn has_task_access(&self) -> bool {
        self.role().is_some_and(Role::has_task_access)
    }

    /// `MyStore` back-office access: the task roles plus `district` and
    /// `salesPoint`.
    #[must_use]
    pub fn has_admin_access(&self) -> bool {
        self.role().is_some_and(Role::has_admin_access)
    }

    /// Any logged-in user may use the cart.
    #[must_use]
    pub const fn can_access_cart(&self) -> bool {
        self.is_authenticated()
    }

    /// Any logged-in user may place an order.
    #[must_use]
    pub const fn can_place_order(&self) -> bool {
        self.is_authenticated()
    }

    /// Where to send the user after login.
    #[must_use]
    pub fn dashboard_path(&self) -> &'static str {
        if self.has_admin_access() {
            DASHBOARD_PATH
        } else {
            HOME_PATH
        }
    }

    /// Replace the identity, persist it and emit [`SessionEvent::Login`].
    pub fn set_identity(&mut self, identity: Identity) {
        debug!(user_id = %identity.id, role = %identity.role, "Setting session identity");
        self.identity = Some(identity.clone());
        self.persist();
        self.observers.notify(&SessionEvent::Login(identity));
    }

    /// Clear the identity, delete the stored copy and emit
    /// [`SessionEvent::Logout`].
    pub fn clear_identity(&mut self) {
        debug!("Clearing session identity");
        self.identity = None;
        self.persist();
        self.observers.notify(&SessionEvent::Logout);
    }

    /// Register a listener for session events.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Remove a listener registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Write the in-memory state through to storage.
    ///
    /// Failures are logged; memory stays authoritative and the next mutation
    /// rewrites the document.
    fn persist(&self) {
        let result = match &self.identity {
            Some(identity) => match serde_json::to_string(identity) {
                Ok(json) => self.storage.set(&self.key, &json),
                Err(e) => {
                    error!(error = %e, "Failed to encode session");
                    return;
                }
            },
            None => self.storage.remove(&self.key),
        };

        if let Err(e) = result {
            error!(key = %self.key, error = %e, "Failed to persist session");
        }
    }
}
