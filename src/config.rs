//! Environment-driven configuration.
//!
//! Values come from the process environment (after `.env` is loaded by the
//! binary). `from_lookup` takes any key lookup so tests can supply a map.

pub const DEFAULT_NEO_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";
pub const DEFAULT_NEO_API_KEY: &str = "DEMO_KEY";
pub const DEMO_AUTH_URL: &str = "https://demo.supabase.co";
pub const DEMO_AUTH_KEY: &str = "demo-key";

/// Where the NEO feed lives and which key to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub base_url: String,
    pub api_key: String,
}

impl FeedConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = non_empty(lookup("NEO_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_NEO_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: non_empty(lookup("NEO_API_KEY"))
                .unwrap_or_else(|| DEFAULT_NEO_API_KEY.to_string()),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Identity provider endpoint and anonymous key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(lookup("SUPABASE_URL")).unwrap_or_else(|| DEMO_AUTH_URL.to_string());
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: non_empty(lookup("SUPABASE_ANON_KEY"))
                .unwrap_or_else(|| DEMO_AUTH_KEY.to_string()),
        }
    }

    /// A real project URL on `supabase.co` and a key that is not the
    /// placeholder and longer than 20 characters.
    pub fn is_configured(&self) -> bool {
        let real_url = self.url != DEMO_AUTH_URL && self.url.contains("supabase.co");
        let real_key = self.anon_key != DEMO_AUTH_KEY && self.anon_key.len() > 20;
        real_url && real_key
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
