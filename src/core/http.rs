//! Thin REST client for the catalog backend.
//!
//! Every response is normalized here into `Result<T, AppError>` so callers
//! never look at envelopes, pagination wrappers or HTTP status codes.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::REQUEST_ID_HEADER;
use crate::shared::types::{ErrorBody, ResponseBody};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach (or clear) the bearer token sent with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path);
        self.send(request).await?.ok_or_else(|| missing_data(path))
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send(request).await?.ok_or_else(|| missing_data(path))
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.send(request).await?.ok_or_else(|| missing_data(path))
    }

    /// DELETE ignores any payload the backend echoes back
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.request(Method::DELETE, path);
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        let request_id = Uuid::now_v7().to_string();
        tracing::debug!(%method, %url, %request_id, "Sending request");

        let request = self
            .http_client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            AppError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = ErrorBody::parse(&body).into_message(status.as_u16());
            tracing::error!("Backend error: HTTP {} - {}", status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
                StatusCode::NOT_FOUND => AppError::NotFound(message),
                _ => AppError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let parsed: ResponseBody<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse response body: {}", e);
            AppError::Serialization(e)
        })?;

        parsed.into_result(status.as_u16())
    }
}

/// Percent-encode an opaque id for use as a single path segment
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn missing_data(path: &str) -> AppError {
    AppError::Api {
        status: 200,
        message: format!("Response from '{}' did not include data", path),
    }
}
