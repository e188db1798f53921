//! # HTTP Retrieval
//!
//! An asynchronous JSON client around `reqwest`. Non-success responses are
//! returned, not raised, so callers decide how to classify them.

use anyhow::Context;
use reqwest::{
    header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    Method, Url,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{de::DeserializeOwned, Serialize};

/// A response plus the HTTP metadata callers need.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The deserialized body of a 2xx response.
    pub data: Option<T>,
    /// The raw body of a non-2xx response.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The headers returned by the server.
    pub headers: HeaderMap,
}

/// # API Client
///
/// Joins relative paths onto a base URL, adds an optional bearer token and
/// (de)serializes JSON bodies.
#[derive(Clone)]
pub struct ApiClient {
    inner: ClientWithMiddleware,
    base_url: Url,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Creates a client.
    ///
    /// # Arguments
    /// * `base_url` - Absolute base URL, e.g. `http://localhost:5000/`.
    /// * `auth_token` - Optional bearer token.
    /// * `max_retries` - Transient-failure retries with exponential backoff.
    ///   `0` installs no retry middleware at all.
    ///
    /// # Errors
    /// Fails if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, auth_token: Option<String>, max_retries: u32) -> anyhow::Result<Self> {
        let url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL '{}' (must be absolute)", base_url))?;

        let mut builder = ClientBuilder::new(reqwest::Client::new());
        if max_retries > 0 {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            inner: builder.build(),
            base_url: url,
            auth_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Performs one request.
    ///
    /// # Arguments
    /// * `method` - The HTTP verb.
    /// * `path` - Path relative to the base URL.
    /// * `headers` - Optional extra headers.
    /// * `body` - Optional body, sent as JSON.
    ///
    /// # Errors
    /// URL joining, network failures and undecodable 2xx bodies.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: Option<B>,
    ) -> anyhow::Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let full_url = self.base_url.join(path)?;
        log::debug!("{} {}", method, full_url);
        let mut req = self.inner.request(method, full_url);

        if let Some(h) = headers {
            req = req.headers(h);
        }

        if let Some(token) = &self.auth_token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(b) = body {
            let json_body = serde_json::to_string(&b)?;
            req = req.header(CONTENT_TYPE, "application/json").body(json_body);
        }

        let response: reqwest::Response = req.send().await?;
        let status = response.status();
        let resp_headers = response.headers().clone();
        let success = status.is_success();

        if success {
            let data = response
                .json::<T>()
                .await
                .context("Failed to decode response body")?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
                headers: resp_headers,
            })
        } else {
            let error_text = response.text().await.ok();
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
            })
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<ApiResponse<T>> {
        self.request::<T, ()>(Method::GET, path, None, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<ApiResponse<T>> {
        self.request(Method::POST, path, None, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(ApiClient::new("/api", None, 0).is_err());
        assert!(ApiClient::new("not a url", None, 0).is_err());
    }

    #[test]
    fn paths_join_onto_base() {
        let client = ApiClient::new("http://localhost:5000/", None, 2).unwrap();
        assert_eq!(
            client.base_url().join("analyze_trending").unwrap().as_str(),
            "http://localhost:5000/analyze_trending"
        );
    }
}
