//! # auth-adapters
//!
//! Argon2-based in-process implementation of `IdentityProvider`: email and
//! password accounts with a watch-channel session stream. Stands in for a
//! hosted identity service behind the same port.

use std::collections::HashMap;
use std::sync::RwLock;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use domains::{IdentityProvider, Principal};

/// Hosted identity services refuse passwords under 6 characters; mirrored
/// here so local behavior matches production.
const MIN_PASSWORD_LEN: usize = 6;

struct StoredUser {
    user_id: String,
    password_hash: String,
}

pub struct SimpleIdentityProvider {
    /// Accounts keyed by normalized email.
    users: RwLock<HashMap<String, StoredUser>>,
    session: watch::Sender<Option<Principal>>,
}

impl SimpleIdentityProvider {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self { users: RwLock::new(HashMap::new()), session }
    }
}

impl Default for SimpleIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl IdentityProvider for SimpleIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<Principal> {
        let email = normalize(email);
        if email.is_empty() || !email.contains('@') {
            anyhow::bail!("invalid email address");
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            anyhow::bail!("password must be at least {MIN_PASSWORD_LEN} characters");
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?
            .to_string();

        let principal = Principal {
            user_id: Uuid::new_v4().to_string(),
            email: email.clone(),
        };
        {
            let mut users = self.users.write().expect("user table lock");
            if users.contains_key(&email) {
                anyhow::bail!("email already in use: {email}");
            }
            users.insert(
                email,
                StoredUser {
                    user_id: principal.user_id.clone(),
                    password_hash,
                },
            );
        }

        // Sign-up signs the new account in.
        debug!(user_id = %principal.user_id, "account created");
        let _ = self.session.send(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Principal> {
        let email = normalize(email);
        let principal = {
            let users = self.users.read().expect("user table lock");
            let Some(user) = users.get(&email) else {
                anyhow::bail!("invalid email or password");
            };
            let parsed = PasswordHash::new(&user.password_hash)
                .map_err(|err| anyhow::anyhow!("stored hash unreadable: {err}"))?;
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_err()
            {
                anyhow::bail!("invalid email or password");
            }
            Principal { user_id: user.user_id.clone(), email: email.clone() }
        };

        let _ = self.session.send(Some(principal.clone()));
        Ok(principal)
    }

    async fn sign_out(&self) {
        let _ = self.session.send(None);
    }

    fn current_user(&self) -> Option<Principal> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.session.subscribe()
    }
}
