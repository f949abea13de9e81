//! Identity provider boundary.
//!
//! [`IdentityProvider`] is the capability the application consumes.
//! [`SupabaseProvider`] talks to a hosted GoTrue API; [`MockProvider`]
//! fabricates users in memory when no provider is configured.
//! [`Session`] owns the current user and notifies subscribers of changes.

mod mock;
mod session;
mod supabase;

pub use mock::MockProvider;
pub use session::Session;
pub use supabase::SupabaseProvider;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AuthConfig;
use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

/// Result of a successful sign-in or sign-up.
///
/// `session_active` is `false` when the provider created the account but
/// wants the address confirmed before issuing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub user: User,
    pub session_active: bool,
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError>;

    /// Best effort; failures are logged by the provider.
    async fn sign_out(&self);
}

/// Picks the real provider when configured, the mock otherwise.
pub fn select_provider(config: &AuthConfig) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    if config.is_configured() {
        info!(url = %config.url, "Using hosted identity provider");
        Ok(Arc::new(SupabaseProvider::from_config(config)?))
    } else {
        info!("Identity provider not configured, using in-memory mock");
        Ok(Arc::new(MockProvider::new()))
    }
}
