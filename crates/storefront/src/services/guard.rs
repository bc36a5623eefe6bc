//! Page access rules.
//!
//! Given a request path and the current session, decide whether the page may
//! be shown and, if not, where to send the user instead.

use crate::stores::{HOME_PATH, SessionStore};

/// The login page.
pub const LOGIN_PATH: &str = "/auth/login.html";

/// Outcome of [`check_page_access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    Allowed,
    Denied {
        /// Why access was refused.
        message: &'static str,
        /// Where to send the user instead.
        redirect: String,
    },
}

impl PageAccess {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Check `path` against the session's role.
///
/// - `/mystore/` pages need admin access
/// - `/tasks/` pages need task access
/// - `/board/write` needs any login
#[must_use]
pub fn check_page_access(path: &str, session: &SessionStore) -> PageAccess {
    if path.contains("/mystore/") && !session.has_admin_access() {
        return PageAccess::Denied {
            message: "MyStore 시스템은 관리자만 접근할 수 있습니다.",
            redirect: HOME_PATH.to_string(),
        };
    }

    if path.contains("/tasks/") && !session.has_task_access() {
        return PageAccess::Denied {
            message: "업무일정은 최고관리자가 지정한 사용자만 접근할 수 있습니다.",
            redirect: HOME_PATH.to_string(),
        };
    }

    if path.contains("/board/write") && !session.is_authenticated() {
        return PageAccess::Denied {
            message: "글을 작성하려면 로그인이 필요합니다.",
            redirect: login_redirect(path),
        };
    }

    PageAccess::Allowed
}

/// Login page URL that returns to `return_url` afterwards.
#[must_use]
pub fn login_redirect(return_url: &str) -> String {
    format!("{LOGIN_PATH}?return={}", urlencoding::encode(return_url))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use plugon_core::{Email, Role, UserId};

    use super::*;
    use crate::models::{Identity, keys};
    use crate::storage::MemoryStorage;

    fn session(role: Option<Role>) -> SessionStore {
        let mut session = SessionStore::new(Arc::new(MemoryStorage::new()), keys::SESSION);
        if let Some(role) = role {
            session.set_identity(Identity {
                id: UserId::new("1"),
                email: Email::parse("staff@plugon.co.kr").unwrap(),
                first_name: "직원".to_string(),
                last_name: "김".to_string(),
                role,
                company_name: None,
                phone: None,
                created_at: None,
            });
        }
        session
    }

    #[test]
    fn test_login_redirect_encodes() {
        assert_eq!(
            login_redirect("/board/write.html?id=3"),
            "/auth/login.html?return=%2Fboard%2Fwrite.html%3Fid%3D3"
        );
    }

    #[test]
    fn test_public_pages() {
        let anonymous = session(None);
        assert!(check_page_access("/", &anonymous).is_allowed());
        assert!(check_page_access("/shop/products.html", &anonymous).is_allowed());
    }

    #[test]
    fn test_mystore_needs_admin() {
        let denied = check_page_access("/mystore/dashboard.html", &session(Some(Role::Customer)));
        assert_eq!(
            denied,
            PageAccess::Denied {
                message: "MyStore 시스템은 관리자만 접근할 수 있습니다.",
                redirect: "/".to_string(),
            }
        );

        let district = session(Some(Role::District));
        assert!(check_page_access("/mystore/dashboard.html", &district).is_allowed());
        assert!(!check_page_access("/tasks/calendar.html", &district).is_allowed());
    }

    #[test]
    fn test_tasks_need_task_access() {
        let branch = session(Some(Role::Branch));
        assert!(check_page_access("/tasks/calendar.html", &branch).is_allowed());
    }

    #[test]
    fn test_board_write_needs_login() {
        match check_page_access("/board/write.html", &session(None)) {
            PageAccess::Denied { redirect, .. } => {
                assert_eq!(redirect, "/auth/login.html?return=%2Fboard%2Fwrite.html");
            }
            PageAccess::Allowed => panic!("anonymous user may not write"),
        }

        assert!(check_page_access("/board/write.html", &session(Some(Role::Customer))).is_allowed());
    }
}
