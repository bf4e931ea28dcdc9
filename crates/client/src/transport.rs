//! HTTP transport seam so the fetch and deploy logic is testable with
//! canned responses.

use async_trait::async_trait;
use fanboard_core::{DashboardError, Result};
use serde_json::Value;

/// The minimal HTTP surface the pipeline needs: status code plus body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: &str,
        url: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<HttpResponse>;

    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request("GET", url, None, None).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn request(
        &self,
        method: &str,
        url: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<HttpResponse> {
        (**self).request(method, url, token, body).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(
        &self,
        method: &str,
        url: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<HttpResponse> {
        (**self).request(method, url, token, body).await
    }
}

/// Production transport backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: &str,
        url: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<HttpResponse> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|e| DashboardError::FetchFailed(e.to_string()))?;
        let mut request = self
            .client
            .request(method, url)
            .header("User-Agent", "fanboard");
        if let Some(token) = token {
            request = request
                .header("Authorization", format!("Bearer {}", token))
                .header("Accept", "application/vnd.github+json");
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DashboardError::FetchFailed(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::FetchFailed(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
