mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Result, anyhow};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Sends `req` and decodes a JSON body, treating any non-2xx status as an error.
pub async fn fetch_json<C, T>(client: &C, req: Request) -> Result<T>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    let method = req.method().clone();
    let path = req.url().path().to_string();

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(%method, path, %status, "Response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("{method} {path} returned status {status}: {body}"));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn get_request(url: Url) -> Request {
    Request::new(Method::GET, url)
}

/// Builds a request carrying `body` as JSON.
pub fn json_request<B: Serialize>(method: Method, url: Url, body: &B) -> Result<Request> {
    let mut req = Request::new(method, url);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());
    Ok(req)
}
