use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Wrappers in [`crate::fetch::auth`] compose
/// over an inner client to attach credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
