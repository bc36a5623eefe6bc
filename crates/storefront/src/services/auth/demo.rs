//! Built-in demo accounts for running without a backend.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use plugon_core::{Email, Role, UserId};

use crate::models::Identity;

use super::{AuthError, IdentityProvider, ServerSession};

/// One demo login.
#[derive(Debug)]
pub struct DemoAccount {
    pub email: Email,
    password: SecretString,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub phone: String,
}

impl DemoAccount {
    /// Build an account; `email` must already be valid.
    #[must_use]
    pub fn new(
        email: Email,
        password: impl Into<String>,
        role: Role,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        company_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            email,
            password: SecretString::from(password.into()),
            role,
            first_name: first_name.into(),
            last_name: last_name.into(),
            company_name: company_name.into(),
            phone: phone.into(),
        }
    }

    fn matches(&self, email: &Email, password: &SecretString) -> bool {
        self.email == *email && self.password.expose_secret() == password.expose_secret()
    }

    /// Mint a fresh identity for this account.
    fn identity(&self) -> Identity {
        let now = Utc::now();
        Identity {
            id: UserId::new(now.timestamp_millis().to_string()),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
            company_name: Some(self.company_name.clone()),
            phone: Some(self.phone.clone()),
            created_at: Some(now),
        }
    }
}

/// Identity provider backed by a fixed account table.
///
/// There is no server, so `who_am_i` never contradicts local state and
/// `logout` always succeeds.
#[derive(Debug)]
pub struct DemoAccounts {
    accounts: Vec<DemoAccount>,
}

impl DemoAccounts {
    #[must_use]
    pub const fn new(accounts: Vec<DemoAccount>) -> Self {
        Self { accounts }
    }

    /// The two stock accounts: a super admin and a customer.
    #[must_use]
    pub fn builtin() -> Self {
        let mut accounts = Vec::with_capacity(2);
        for (email, password, role, first, last, company, phone) in [
            (
                "admin@plugon.co.kr",
                "admin123",
                Role::SuperAdmin,
                "관리자",
                "최고",
                "PlugOn",
                "010-1234-5678",
            ),
            (
                "user@plugon.co.kr",
                "user123",
                Role::Customer,
                "사용자",
                "일반",
                "테스트회사",
                "010-9876-5432",
            ),
        ] {
            if let Ok(email) = Email::parse(email) {
                accounts.push(DemoAccount::new(
                    email, password, role, first, last, company, phone,
                ));
            }
        }
        Self::new(accounts)
    }

    #[must_use]
    pub fn accounts(&self) -> &[DemoAccount] {
        &self.accounts
    }
}

impl Default for DemoAccounts {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IdentityProvider for DemoAccounts {
    async fn login(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|account| account.matches(email, password))
            .ok_or(AuthError::InvalidCredentials)?;

        debug!(email = %account.email, role = %account.role, "Demo login");
        Ok(account.identity())
    }

    async fn who_am_i(&self) -> Result<ServerSession, AuthError> {
        Ok(ServerSession::Unknown)
    }

    async fn logout(&self) -> Result<Option<String>, AuthError> {
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_builtin_logins() {
        let demo = DemoAccounts::builtin();
        assert_eq!(demo.accounts().len(), 2);

        let admin = demo
            .login(&Email::parse("admin@plugon.co.kr").unwrap(), &secret("admin123"))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);
        assert_eq!(admin.company_name.as_deref(), Some("PlugOn"));
        assert!(admin.created_at.is_some());
        assert!(!admin.id.is_empty());

        let user = demo
            .login(&Email::parse("user@plugon.co.kr").unwrap(), &secret("user123"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.phone.as_deref(), Some("010-9876-5432"));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let demo = DemoAccounts::builtin();
        let err = demo
            .login(&Email::parse("admin@plugon.co.kr").unwrap(), &secret("user123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_no_server_state() {
        let demo = DemoAccounts::builtin();
        assert!(matches!(demo.who_am_i().await.unwrap(), ServerSession::Unknown));
        assert_eq!(demo.logout().await.unwrap(), None);
    }

    #[test]
    fn test_password_not_in_debug() {
        let demo = DemoAccounts::builtin();
        assert!(!format!("{demo:?}").contains("admin123"));
    }
}
