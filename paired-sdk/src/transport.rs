// ABOUTME: Transport capability consumed by the orchestrator, in async and callback forms
// ABOUTME: Provides the reqwest-backed HTTP transport and a callback adapter over any transport

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use typed_builder::TypedBuilder;
use url::Url;

use crate::completion::Completion;
use crate::constants::{timeouts, USER_AGENT};
use crate::error::{ConfigError, TransportError};
use crate::model::{Response, TransportResult};

/// Performs one request. Any status is a successful transport call; only
/// failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn fetch(&self, url: &Url) -> Result<Response, TransportError>;
}

/// Callback form of the transport: `on_complete` fires exactly once, on a
/// thread of the transport's choosing.
pub trait CallbackTransport: Send + Sync {
    fn fetch_with(&self, url: &Url, on_complete: Completion<TransportResult>);
}

/// Runs an async transport on a tokio runtime and reports through callbacks.
pub struct SpawnedCallbacks<T> {
    inner: Arc<T>,
    runtime: Handle,
}

impl<T: Transport> SpawnedCallbacks<T> {
    pub fn new(inner: Arc<T>, runtime: Handle) -> Self {
        Self { inner, runtime }
    }
}

impl<T: Transport> CallbackTransport for SpawnedCallbacks<T> {
    fn fetch_with(&self, url: &Url, on_complete: Completion<TransportResult>) {
        let inner = self.inner.clone();
        let url = url.clone();
        self.runtime.spawn(async move {
            let result = inner.fetch(&url).await;
            tracing::trace!(%url, ok = result.is_ok(), "callback transport finished");
            on_complete.complete(result.into());
        });
    }
}

#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = Result<HttpTransport, ConfigError>))]
pub struct TransportConfig {
    #[builder(default = timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,

    #[builder(default = timeouts::MAX_REDIRECTS)]
    pub max_redirects: usize,
}

impl From<TransportConfig> for Result<HttpTransport, ConfigError> {
    fn from(config: TransportConfig) -> Self {
        HttpTransport::from_config(config)
    }
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConfigError> {
        TransportConfig::builder().build()
    }

    pub fn builder() -> TransportConfigBuilder<((), (), ())> {
        TransportConfig::builder()
    }

    pub fn from_config(config: TransportConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Response, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(%url, status, bytes = body.len(), "HTTP request completed");
        Ok(Response::new(status, body.to_vec()))
    }
}
