use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::{AuthOutcome, IdentityProvider, User};
use crate::error::AuthError;

/// The signed-in user, owned by the application root.
///
/// Components that care about sign-in changes hold a receiver from
/// [`Session::subscribe`] instead of looking the user up globally.
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<Option<User>>,
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(None);
        Self { provider, state }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let outcome = self.provider.sign_in(email, password).await?;
        self.apply(&outcome);
        Ok(outcome)
    }

    /// A sign-up that still needs confirmation leaves the session unchanged.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let outcome = self.provider.sign_up(email, password).await?;
        self.apply(&outcome);
        Ok(outcome)
    }

    pub async fn sign_out(&self) {
        self.provider.sign_out().await;
        if self.state.send_replace(None).is_some() {
            info!(provider = self.provider.name(), "Signed out");
        }
    }

    fn apply(&self, outcome: &AuthOutcome) {
        if outcome.session_active {
            info!(
                provider = self.provider.name(),
                user_id = %outcome.user.id,
                "Session started"
            );
            self.state.send_replace(Some(outcome.user.clone()));
        }
    }
}
