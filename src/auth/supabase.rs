use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use super::{AuthOutcome, IdentityProvider, User};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, json_request};

const UNREACHABLE: &str = "Could not reach the identity provider";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Email/password auth against a hosted GoTrue (`/auth/v1`) API.
///
/// The access token of the last sign-in is kept so that sign-out can
/// revoke it.
pub struct SupabaseProvider<C = BasicClient> {
    http: ApiKey<C>,
    base_url: String,
    access_token: Mutex<Option<String>>,
}

impl SupabaseProvider<BasicClient> {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        Self::new(BasicClient::new()?, config)
    }
}

impl<C: HttpClient> SupabaseProvider<C> {
    pub fn new(inner: C, config: &AuthConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: ApiKey::new(inner, "apikey", &config.anon_key)?,
            base_url: config.url.clone(),
            access_token: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Url::parse(&format!("{}/auth/v1/{}", self.base_url, path))
            .map_err(|e| AuthError::Configuration(format!("invalid provider URL: {e}")))
    }

    /// Posts credentials and returns the parsed body of a 2xx response.
    async fn post_credentials(
        &self,
        url: Url,
        email: &str,
        password: &str,
        fallback: &str,
    ) -> Result<Value, AuthError> {
        let req = json_request(Method::POST, url, &Credentials { email, password })
            .map_err(|e| AuthError::Operation(format!("{fallback}: {e}")))?;

        let response = self.http.execute(req).await.map_err(|e| {
            error!(error = %e, "Identity provider request failed");
            AuthError::Configuration(UNREACHABLE.to_string())
        })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            warn!(%status, "Identity provider rejected request");
            return Err(AuthError::Operation(
                provider_message(&body).unwrap_or_else(|| fallback.to_string()),
            ));
        }
        Ok(body)
    }

    fn remember_token(&self, body: &Value) {
        if let Ok(mut token) = self.access_token.lock() {
            *token = body["access_token"].as_str().map(str::to_string);
        }
    }
}

#[async_trait]
impl<C: HttpClient> IdentityProvider for SupabaseProvider<C> {
    fn name(&self) -> &'static str {
        "supabase"
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        const FAILED: &str = "An unexpected error occurred during sign in";

        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let body = self.post_credentials(url, email, password, FAILED).await?;
        let user = parse_user(&body).ok_or_else(|| AuthError::Operation(FAILED.to_string()))?;
        self.remember_token(&body);

        Ok(AuthOutcome {
            user,
            session_active: true,
        })
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        const FAILED: &str = "An unexpected error occurred during sign up";

        let url = self.endpoint("signup")?;
        let body = self.post_credentials(url, email, password, FAILED).await?;
        let user = parse_user(&body).ok_or_else(|| AuthError::Operation(FAILED.to_string()))?;
        let session_active = body["access_token"].is_string();
        if session_active {
            self.remember_token(&body);
        }

        Ok(AuthOutcome {
            user,
            session_active,
        })
    }

    async fn sign_out(&self) {
        let token = match self.access_token.lock() {
            Ok(mut token) => token.take(),
            Err(_) => None,
        };
        let Some(token) = token else {
            return;
        };

        let url = match self.endpoint("logout") {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Cannot build logout URL");
                return;
            }
        };
        let mut req = reqwest::Request::new(Method::POST, url);
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => {
                req.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => {
                error!(error = %e, "Access token is not a valid header value");
                return;
            }
        }

        match self.http.execute(req).await {
            Ok(resp) if !resp.status().is_success() => {
                warn!(status = %resp.status(), "Sign-out rejected by provider");
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "Sign-out request failed"),
        }
    }
}

/// The user object sits under `user` for session responses and at the top
/// level for a sign-up awaiting confirmation.
fn parse_user(body: &Value) -> Option<User> {
    let user = if body["user"].is_object() {
        &body["user"]
    } else {
        body
    };
    Some(User {
        id: user["id"].as_str()?.to_string(),
        email: user["email"].as_str().map(str::to_string),
    })
}

fn provider_message(body: &Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body[*key].as_str())
        .map(str::to_string)
}
