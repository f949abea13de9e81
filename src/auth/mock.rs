use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::{AuthOutcome, IdentityProvider, User};
use crate::error::AuthError;

/// Accepts any credentials and keeps fabricated users for the process lifetime.
#[derive(Default)]
pub struct MockProvider {
    users: Mutex<HashMap<String, User>>,
    next_id: AtomicU64,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn fabricate(&self, email: &str) -> User {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        User {
            id: format!("mock-user-{n}"),
            email: Some(email.to_string()),
        }
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Operation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        require_credentials(email, password)?;
        let mut users = self
            .users
            .lock()
            .map_err(|_| AuthError::Configuration("mock user table poisoned".to_string()))?;
        let user = match users.get(email) {
            Some(user) => user.clone(),
            None => {
                let user = self.fabricate(email);
                users.insert(email.to_string(), user.clone());
                user
            }
        };
        debug!(user_id = %user.id, "Mock sign-in");
        Ok(AuthOutcome {
            user,
            session_active: true,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        require_credentials(email, password)?;
        let mut users = self
            .users
            .lock()
            .map_err(|_| AuthError::Configuration("mock user table poisoned".to_string()))?;
        if users.contains_key(email) {
            return Err(AuthError::Operation("User already registered".to_string()));
        }
        let user = self.fabricate(email);
        users.insert(email.to_string(), user.clone());
        debug!(user_id = %user.id, "Mock sign-up");
        Ok(AuthOutcome {
            user,
            session_active: true,
        })
    }

    async fn sign_out(&self) {}
}
