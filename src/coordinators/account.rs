// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up, sign-in and sign-out flows.
//!
//! Each flow reports its outcome as a notice. Provider error codes are mapped
//! to the fixed message set; anything else gets the flow's generic message.

use crate::error::{auth_failure_message, AppError, AuthErrorCode, AuthFlow, Result};
use crate::models::Identity;
use crate::notice::Notifier;
use crate::services::identity::{IdentityProvider, GOOGLE_PROVIDER_ID};
use std::sync::Arc;
use validator::{Validate, ValidationError};

/// Registration form, checked locally before reaching the provider.
#[derive(Debug, Clone, Validate)]
pub struct SignUpForm {
    #[validate(custom(function = "not_blank"))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl SignUpForm {
    /// Map a validation failure to the code the provider would have returned.
    fn check(&self) -> Result<()> {
        let errors = match self.validate() {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };
        let fields = errors.field_errors();

        let code = if fields.contains_key("email") {
            AuthErrorCode::InvalidEmail
        } else if fields.contains_key("password") {
            AuthErrorCode::WeakPassword
        } else {
            AuthErrorCode::Other("auth/missing-display-name".to_string())
        };
        Err(AppError::Auth(code))
    }
}

pub struct AccountCoordinator {
    provider: Arc<dyn IdentityProvider>,
    notifier: Notifier,
}

impl AccountCoordinator {
    pub fn new(provider: Arc<dyn IdentityProvider>, notifier: Notifier) -> Self {
        Self { provider, notifier }
    }

    /// Create the account, then set its display name.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Identity> {
        let result = self.register(form).await;
        self.report(result, AuthFlow::SignUp, "Registration successful! Welcome!")
    }

    async fn register(&self, form: &SignUpForm) -> Result<Identity> {
        form.check()?;
        self.provider.sign_up(&form.email, &form.password).await?;
        self.provider
            .update_display_name(form.display_name.trim())
            .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let result = self.provider.sign_in(email, password).await;
        self.report(result, AuthFlow::SignIn, "Signed in successfully!")
    }

    /// Sign in with an ID token obtained from Google.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<Identity> {
        let result = self
            .provider
            .sign_in_with_idp(GOOGLE_PROVIDER_ID, id_token)
            .await;
        self.report(result, AuthFlow::OAuth, "Signed in with Google!")
    }

    pub async fn sign_out(&self) -> Result<()> {
        let result = self.provider.sign_out().await;
        self.report(result, AuthFlow::SignOut, "Signed out")
    }

    fn report<T>(&self, result: Result<T>, flow: AuthFlow, success: &str) -> Result<T> {
        match &result {
            Ok(_) => self.notifier.success(success),
            Err(e) => {
                tracing::warn!(error = %e, ?flow, "Account flow failed");
                self.notifier.error(auth_failure_message(e, flow));
            }
        }
        result
    }
}
