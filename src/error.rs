// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types and the user-facing message vocabulary.

use std::fmt;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Transport failure, non-2xx status or malformed payload.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(AuthErrorCode),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// The provider code, if this is an authentication failure.
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            AppError::Auth(code) => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Which account flow produced an authentication error.
///
/// Selects the generic message used when the code is outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    SignUp,
    OAuth,
    SignOut,
}

impl AuthFlow {
    fn generic_message(self) -> &'static str {
        match self {
            AuthFlow::SignIn => "Sign-in failed!",
            AuthFlow::SignUp => "Registration failed!",
            AuthFlow::OAuth => "Google sign-in failed!",
            AuthFlow::SignOut => "Could not sign out!",
        }
    }
}

/// Identity provider error codes surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    TooManyRequests,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    /// Anything outside the fixed vocabulary, kept verbatim for logs.
    Other(String),
}

impl AuthErrorCode {
    /// Parse a provider code.
    ///
    /// Accepts both the SDK form (`auth/user-not-found`) and the Identity
    /// Toolkit REST form (`EMAIL_NOT_FOUND`). REST messages may carry a
    /// human-readable suffix after ` : `, which is ignored.
    pub fn from_provider_code(raw: &str) -> Self {
        let code = raw.split(" : ").next().unwrap_or(raw).trim();

        match code {
            "auth/user-not-found" | "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => Self::UserNotFound,
            "auth/wrong-password" | "INVALID_PASSWORD" => Self::WrongPassword,
            "auth/invalid-credential" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => {
                Self::InvalidCredential
            }
            "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "auth/email-already-in-use" | "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "auth/weak-password" | "WEAK_PASSWORD" => Self::WeakPassword,
            "auth/invalid-email" | "INVALID_EMAIL" => Self::InvalidEmail,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// User-facing message for this code in the given flow.
    pub fn message(&self, flow: AuthFlow) -> &'static str {
        match self {
            Self::UserNotFound => "User not found!",
            Self::WrongPassword => "Wrong password!",
            Self::InvalidCredential => "Email or password is incorrect!",
            Self::TooManyRequests => "Too many attempts! Please wait.",
            Self::EmailAlreadyInUse => "This email is already in use!",
            Self::WeakPassword => "Password must be at least 6 characters!",
            Self::InvalidEmail => "Invalid email address!",
            Self::Other(_) => flow.generic_message(),
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::UserNotFound => "user-not-found",
            Self::WrongPassword => "wrong-password",
            Self::InvalidCredential => "invalid-credential",
            Self::TooManyRequests => "too-many-requests",
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::WeakPassword => "weak-password",
            Self::InvalidEmail => "invalid-email",
            Self::Other(raw) => raw.as_str(),
        };
        f.write_str(code)
    }
}

/// User-facing message for any error raised by an account flow.
pub fn auth_failure_message(err: &AppError, flow: AuthFlow) -> &'static str {
    match err {
        AppError::Auth(code) => code.message(flow),
        _ => flow.generic_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sdk_and_rest_vocabularies() {
        assert_eq!(
            AuthErrorCode::from_provider_code("auth/user-not-found"),
            AuthErrorCode::UserNotFound
        );
        assert_eq!(
            AuthErrorCode::from_provider_code("EMAIL_NOT_FOUND"),
            AuthErrorCode::UserNotFound
        );
        assert_eq!(
            AuthErrorCode::from_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthErrorCode::InvalidCredential
        );
        assert_eq!(
            AuthErrorCode::from_provider_code(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            AuthErrorCode::from_provider_code("auth/email-already-in-use"),
            AuthErrorCode::EmailAlreadyInUse
        );
    }

    #[test]
    fn test_unknown_code_falls_back_to_generic_message() {
        let code = AuthErrorCode::from_provider_code("auth/network-request-failed");
        assert_eq!(
            code,
            AuthErrorCode::Other("auth/network-request-failed".to_string())
        );
        assert_eq!(code.message(AuthFlow::SignIn), "Sign-in failed!");
        assert_eq!(code.message(AuthFlow::SignUp), "Registration failed!");
    }

    #[test]
    fn test_known_codes_have_fixed_messages() {
        assert_eq!(
            AuthErrorCode::WrongPassword.message(AuthFlow::SignIn),
            "Wrong password!"
        );
        assert_eq!(
            AuthErrorCode::TooManyRequests.message(AuthFlow::SignUp),
            "Too many attempts! Please wait."
        );
    }

    #[test]
    fn test_non_auth_errors_use_generic_flow_message() {
        let err = AppError::Network("connection reset".to_string());
        assert_eq!(auth_failure_message(&err, AuthFlow::OAuth), "Google sign-in failed!");

        let err = AppError::Auth(AuthErrorCode::InvalidEmail);
        assert_eq!(
            auth_failure_message(&err, AuthFlow::SignUp),
            "Invalid email address!"
        );
    }
}
