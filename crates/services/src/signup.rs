//! # Signup Flow
//!
//! Age-gated account creation. The age gate runs before the Identity
//! Provider is contacted at all: an undetermined or ineligible result
//! blocks the sign-up call entirely, so an account is never silently
//! created for a user the gate could not clear.

use std::sync::Arc;

use tracing::debug;

use domains::{
    AgeGateResult, AppError, IdentityProvider, NewUser, PostsApi, Principal, Result,
};

use crate::agegate::AgeGateVerifier;

/// Deployment policy for the signup age check.
#[derive(Debug, Clone, Copy)]
pub struct AgePolicy {
    /// When set, an identity document must be supplied and must verify.
    pub require_verification: bool,
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self { require_verification: true }
    }
}

/// One account-creation attempt.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    /// URL of the uploaded identity document, when the policy requires one.
    pub id_document_url: Option<String>,
}

pub struct SignupFlow {
    identity: Arc<dyn IdentityProvider>,
    posts: Arc<dyn PostsApi>,
    age_gate: AgeGateVerifier,
    policy: AgePolicy,
}

impl SignupFlow {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        posts: Arc<dyn PostsApi>,
        age_gate: AgeGateVerifier,
        policy: AgePolicy,
    ) -> Self {
        Self { identity, posts, age_gate, policy }
    }

    /// Creates the account: validate, gate, sign up, then mirror the new
    /// identity into the backend.
    pub async fn create_account(&self, request: SignupRequest) -> Result<Principal> {
        // 1. Validate.
        if request.email.trim().is_empty()
            || request.password.trim().is_empty()
            || request.username.trim().is_empty()
        {
            return Err(AppError::Validation(
                "email, password and username are required".to_string(),
            ));
        }

        // 2. Age gate. Fails closed: a missing document counts as
        //    undetermined, not as a pass.
        if self.policy.require_verification {
            let Some(document_url) = request.id_document_url.as_deref() else {
                return Err(AppError::AgeGateUndetermined);
            };
            match self.age_gate.verify(document_url).await {
                AgeGateResult::Eligible { birth_date } => {
                    debug!(%birth_date, "age verification passed");
                }
                AgeGateResult::Ineligible { reason } => {
                    return Err(AppError::AgeGateIneligible(reason));
                }
                AgeGateResult::Undetermined => return Err(AppError::AgeGateUndetermined),
            }
        }

        // 3. Create the identity, then mirror it into the backend.
        let principal = self
            .identity
            .sign_up(&request.email, &request.password)
            .await
            .map_err(|err| AppError::Unauthorized(err.to_string()))?;

        let user = NewUser {
            user_id: principal.user_id.clone(),
            username: request.username.clone(),
            email: request.email.clone(),
        };
        self.posts
            .create_user(user)
            .await
            .map_err(AppError::from_collaborator)?;

        Ok(principal)
    }
}
