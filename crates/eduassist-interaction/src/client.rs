//! Shared HTTP client for the EduAssist backend.
//!
//! Every call goes through [`ApiClient::execute`], which attaches the
//! bearer token for the client's [`AuthScope`] and hands failures to the
//! [`AuthGuard`] before returning them.

use crate::auth_guard::{AuthGuard, RequestKind};
use crate::error::ApiError;
use eduassist_core::config::ClientConfig;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    guard: Arc<AuthGuard>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, guard: Arc<AuthGuard>) -> Self {
        Self {
            http: Client::new(),
            config,
            guard,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    /// Starts a request against an absolute API path.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.endpoint(path))
    }

    /// Sends a request and classifies the outcome.
    ///
    /// Non-2xx responses are converted to [`ApiError`] and passed to the
    /// guard so the 401/notification policy runs exactly once per call.
    pub(crate) async fn execute(
        &self,
        builder: RequestBuilder,
        kind: RequestKind,
    ) -> Result<Response, ApiError> {
        let builder = match self.guard.bearer_token() {
            Ok(Some(token)) if kind == RequestKind::Authenticated => builder.bearer_auth(token),
            Ok(_) => builder,
            Err(e) => {
                tracing::warn!("[ApiClient] Could not read session token: {}", e);
                builder
            }
        };

        let result = match builder.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::debug!("[ApiClient] {} response: {}", status, body);
                Err(ApiError::from_response(status, &body))
            }
            Err(err) => {
                tracing::warn!("[ApiClient] Request failed: {}", err);
                Err(ApiError::from(err))
            }
        };

        if let Err(error) = &result {
            self.guard.on_failure(kind, error);
        }
        result
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        // 204s and empty bodies decode as `null`
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            let error = ApiError::Decode(e.to_string());
            self.guard.on_failure(RequestKind::Authenticated, &error);
            error
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::GET, path), RequestKind::Authenticated)
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(
                self.request(Method::GET, path).query(query),
                RequestKind::Authenticated,
            )
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        kind: RequestKind,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(self.request(method, path).json(body), kind)
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, RequestKind::Authenticated)
            .await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body, RequestKind::Authenticated)
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path), RequestKind::Authenticated)
            .await?;
        Ok(())
    }

    /// Fetches a binary body (report downloads).
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .execute(self.request(Method::GET, path), RequestKind::Authenticated)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
