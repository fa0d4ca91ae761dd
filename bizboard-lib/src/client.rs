//! Main DashboardClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::error::Error;

/// The main client for the dashboard's JSON HTTP API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use bizboard_lib::DashboardClient;
///
/// let client = DashboardClient::builder()
///     .url("http://127.0.0.1:5000")
///     .build()?;
///
/// let summary = client.summary().await?;
/// ```
#[derive(Clone)]
pub struct DashboardClient {
    inner: Arc<DashboardClientInner>,
}

struct DashboardClientInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl DashboardClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> DashboardClientBuilder<Missing> {
        DashboardClientBuilder::new()
    }

    /// Returns the base URL of the dashboard API.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolves an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()).into())
    }

    /// Starts a GET request to an endpoint, with the configured timeout
    /// applied.
    pub(crate) fn http_get(&self, path: &str) -> Result<reqwest::RequestBuilder, Error> {
        let url = self.endpoint(path)?;
        let mut request = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        Ok(request)
    }

    /// Sends a request and decodes a 2xx JSON body into `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let response = request.send().await.map_err(ApiError::from)?;

        if response.status().is_success() {
            Ok(response.json().await.map_err(ApiError::from)?)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http(status, body).into())
        }
    }

    /// Sends a request and returns a 2xx body as text.
    pub(crate) async fn send_text(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let response = request.send().await.map_err(ApiError::from)?;

        if response.status().is_success() {
            Ok(response.text().await.map_err(ApiError::from)?)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http(status, body).into())
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`DashboardClient`].
///
/// Uses the typestate pattern to ensure the base URL is set at compile
/// time.
///
/// # Example
///
/// ```ignore
/// let client = DashboardClient::builder()
///     .url("http://127.0.0.1:5000")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct DashboardClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl DashboardClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the dashboard base URL.
    pub fn url(self, url: impl Into<String>) -> DashboardClientBuilder<Set<String>> {
        DashboardClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for DashboardClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> DashboardClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl DashboardClientBuilder<Set<String>> {
    /// Builds the [`DashboardClient`].
    ///
    /// This method is only available once `url` has been set. Fails if the
    /// URL does not parse.
    pub fn build(self) -> Result<DashboardClient, Error> {
        let base_url =
            Url::parse(&self.url.0).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        Ok(DashboardClient {
            inner: Arc::new(DashboardClientInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_invalid_url() {
        let result = DashboardClient::builder().url("not a url").build();
        assert!(matches!(
            result,
            Err(Error::Api(ApiError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = DashboardClient::builder()
            .url("http://127.0.0.1:5000/")
            .build()
            .unwrap();
        let url = client.endpoint("api/table").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/table");
    }
}
