//! Authentication error types.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] plugon_core::EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server refused the request and said why.
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(#[from] RemoteError),
}

impl AuthError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "올바른 이메일 주소를 입력해주세요.".to_string(),
            Self::InvalidCredentials => "이메일 또는 비밀번호가 올바르지 않습니다.".to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Unavailable(_) => "서버에 연결할 수 없습니다. 잠시 후 다시 시도해주세요.".to_string(),
        }
    }
}
