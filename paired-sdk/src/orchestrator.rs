// ABOUTME: Paired-fetch orchestrator combining an image leg and a metadata leg
// ABOUTME: Offers sequential, parallel, nested-callback, and worker-thread strategies

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::Instrument;
use url::Url;

use crate::completion::Completion;
use crate::decode::{decode_image, decode_metadata};
use crate::endpoint::ResourceEndpoints;
use crate::error::{ConfigError, FetchError, LegFailure, TransportError};
use crate::handshake::{BlockingAdapter, HandshakeWait};
use crate::model::{
    DetailedResource, FetchOutcome, ImageMetadata, RawImage, ResourceId, Response, TransportResult,
};
use crate::sink::OutcomeSink;
use crate::transport::{CallbackTransport, SpawnedCallbacks, Transport};
use crate::worker::{BlockingPool, WorkQueue};

/// How the worker strategy lays its legs onto the work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerPolicy {
    /// The metadata leg runs in a second job dispatched by the first.
    Nested,
    /// Both legs run one after the other inside a single job.
    #[default]
    SingleTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Await the image, then await the metadata.
    #[default]
    Sequential,
    /// Await both legs concurrently.
    Parallel,
    /// Issue the metadata request from the image request's callback.
    NestedCallback,
    /// Run blocking transport calls on a background work queue.
    Worker(WorkerPolicy),
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Sequential,
        Strategy::Parallel,
        Strategy::NestedCallback,
        Strategy::Worker(WorkerPolicy::SingleTask),
        Strategy::Worker(WorkerPolicy::Nested),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel => "parallel",
            Strategy::NestedCallback => "callback",
            Strategy::Worker(WorkerPolicy::SingleTask) => "worker",
            Strategy::Worker(WorkerPolicy::Nested) => "worker-nested",
        }
    }

    /// Whether the metadata leg waits for a successful image leg.
    pub fn orders_legs(&self) -> bool {
        !matches!(self, Strategy::Parallel)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s.to_lowercase())
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "Unknown strategy '{}'. Must be one of: {}",
                    s,
                    Strategy::ALL.map(|strategy| strategy.name()).join(", ")
                ))
            })
    }
}

/// Fetches an image and its metadata for one id and combines them.
///
/// Every strategy yields the same outcome for the same server responses.
/// Nothing is cached or retried, and no state survives between fetches.
pub struct PairedFetcher<T> {
    transport: Arc<T>,
    callbacks: Arc<dyn CallbackTransport>,
    endpoints: ResourceEndpoints,
    queue: Arc<dyn WorkQueue>,
    wait: HandshakeWait,
}

impl<T: Transport> PairedFetcher<T> {
    /// Build a fetcher on the current tokio runtime.
    pub fn new(transport: T, endpoints: ResourceEndpoints) -> Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        Ok(Self::with_runtime(Arc::new(transport), endpoints, runtime))
    }

    pub fn with_runtime(transport: Arc<T>, endpoints: ResourceEndpoints, runtime: Handle) -> Self {
        let callbacks: Arc<dyn CallbackTransport> =
            Arc::new(SpawnedCallbacks::new(transport.clone(), runtime.clone()));

        Self {
            transport,
            callbacks,
            endpoints,
            queue: Arc::new(BlockingPool::new(runtime)),
            wait: HandshakeWait::Unbounded,
        }
    }

    pub fn with_queue(mut self, queue: Arc<dyn WorkQueue>) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_callbacks(mut self, callbacks: Arc<dyn CallbackTransport>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_handshake_wait(mut self, wait: HandshakeWait) -> Self {
        self.wait = wait;
        self
    }

    pub fn endpoints(&self) -> &ResourceEndpoints {
        &self.endpoints
    }

    /// Run one paired fetch with the given strategy.
    ///
    /// Dropping the returned future cancels the sequential and parallel
    /// strategies outright. Callback and worker strategies keep running in
    /// the background but their outcome is discarded.
    pub async fn fetch(&self, id: ResourceId, strategy: Strategy) -> FetchOutcome {
        let span = tracing::debug_span!("paired_fetch", %id, strategy = strategy.name());

        async move {
            let outcome = match strategy {
                Strategy::Sequential => self.fetch_sequential(id).await,
                Strategy::Parallel => self.fetch_parallel(id).await,
                Strategy::NestedCallback => {
                    let (tx, rx) = oneshot::channel();
                    self.fetch_with_callbacks(id, move |outcome| {
                        let _ = tx.send(outcome);
                    });
                    settle(rx).await
                }
                Strategy::Worker(policy) => {
                    let (tx, rx) = oneshot::channel();
                    self.fetch_on_worker(id, policy, move |outcome| {
                        let _ = tx.send(outcome);
                    });
                    settle(rx).await
                }
            };

            match &outcome {
                Ok(resource) => {
                    tracing::debug!(metadata = %resource.metadata(), "paired fetch succeeded")
                }
                Err(err) => tracing::warn!(error = %err, "paired fetch failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Run one paired fetch and hand the outcome to `sink`.
    pub async fn deliver(&self, id: ResourceId, strategy: Strategy, sink: &dyn OutcomeSink) {
        let outcome = self.fetch(id, strategy).await;
        sink.accept(id, outcome);
    }

    /// Image first; the metadata request is only sent once the image is good.
    pub async fn fetch_sequential(&self, id: ResourceId) -> FetchOutcome {
        let resource = self.resource(id);
        let image = resource.image().await?;
        let metadata = resource.metadata().await?;
        Ok(DetailedResource::new(image, metadata))
    }

    /// Both legs in flight at once. Whichever failure is observed first wins
    /// and the other leg is dropped.
    pub async fn fetch_parallel(&self, id: ResourceId) -> FetchOutcome {
        let resource = self.resource(id);
        let (image, metadata) = tokio::try_join!(resource.image(), resource.metadata())?;
        Ok(DetailedResource::new(image, metadata))
    }

    /// Handle exposing each leg as its own awaitable property.
    pub fn resource(&self, id: ResourceId) -> ResourceHandle<'_, T> {
        ResourceHandle { fetcher: self, id }
    }

    /// Nested callbacks: the image callback issues the metadata request, and
    /// the metadata callback delivers the outcome. Returns immediately.
    ///
    /// `on_complete` runs exactly once. A leg whose completion is dropped
    /// unfired reports `Cancelled` under that leg. Image decoding runs as a
    /// job on the work queue, off the transport's callback thread.
    pub fn fetch_with_callbacks<F>(&self, id: ResourceId, on_complete: F)
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        let on_complete =
            Completion::with_fallback("callback fetch", cancelled_image(), on_complete);
        let callbacks = self.callbacks.clone();
        let queue = self.queue.clone();
        let metadata_url = self.endpoints.metadata_url(id);
        let image_url = self.endpoints.image_url(id);

        let image_leg = move |result: TransportResult| {
            let response = match image_response(result.into_response()) {
                Ok(response) => response,
                Err(err) => return on_complete.complete(Err(err)),
            };

            queue.dispatch(Box::new(move || {
                let image = match decode_image(&response.body) {
                    Ok(image) => image,
                    Err(err) => return on_complete.complete(Err(FetchError::bad_image(err))),
                };

                let mut on_complete = on_complete;
                on_complete.set_fallback(cancelled_metadata());
                let metadata_leg = move |result: TransportResult| {
                    let outcome = check_metadata(result.into_response())
                        .map(|metadata| DetailedResource::new(image, metadata));
                    on_complete.complete(outcome);
                };

                tracing::debug!(%id, leg = "metadata", url = %metadata_url, "issuing request");
                callbacks.fetch_with(
                    &metadata_url,
                    Completion::with_fallback("metadata leg", cancelled_leg(), metadata_leg),
                );
            }));
        };

        tracing::debug!(%id, leg = "image", url = %image_url, "issuing request");
        self.callbacks.fetch_with(
            &image_url,
            Completion::with_fallback("image leg", cancelled_leg(), image_leg),
        );
    }

    /// Worker strategy: jobs on the work queue make blocking transport calls
    /// through the handshake. Returns immediately.
    ///
    /// The queue decides where and with what priority jobs run; inject one
    /// with `with_queue` to control that.
    pub fn fetch_on_worker<F>(&self, id: ResourceId, policy: WorkerPolicy, on_complete: F)
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        let mut on_complete =
            Completion::with_fallback("worker fetch", cancelled_image(), on_complete);
        let adapter = BlockingAdapter::new(self.callbacks.clone()).with_wait(self.wait);
        let image_url = self.endpoints.image_url(id);
        let metadata_url = self.endpoints.metadata_url(id);

        match policy {
            WorkerPolicy::SingleTask => self.queue.dispatch(Box::new(move || {
                let image = match blocking_image(&adapter, id, &image_url) {
                    Ok(image) => image,
                    Err(err) => return on_complete.complete(Err(err)),
                };
                on_complete.set_fallback(cancelled_metadata());
                let outcome = blocking_metadata(&adapter, id, &metadata_url)
                    .map(|metadata| DetailedResource::new(image, metadata));
                on_complete.complete(outcome);
            })),
            WorkerPolicy::Nested => {
                let queue = self.queue.clone();
                self.queue.dispatch(Box::new(move || {
                    let image = match blocking_image(&adapter, id, &image_url) {
                        Ok(image) => image,
                        Err(err) => return on_complete.complete(Err(err)),
                    };
                    on_complete.set_fallback(cancelled_metadata());

                    queue.dispatch(Box::new(move || {
                        let outcome = blocking_metadata(&adapter, id, &metadata_url)
                            .map(|metadata| DetailedResource::new(image, metadata));
                        on_complete.complete(outcome);
                    }));
                }));
            }
        }
    }
}

impl<T> Clone for PairedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            callbacks: self.callbacks.clone(),
            endpoints: self.endpoints.clone(),
            queue: self.queue.clone(),
            wait: self.wait,
        }
    }
}

impl<T> fmt::Debug for PairedFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairedFetcher")
            .field("endpoints", &self.endpoints)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

/// One id bound to a fetcher; each leg is fetched lazily when awaited.
pub struct ResourceHandle<'a, T> {
    fetcher: &'a PairedFetcher<T>,
    id: ResourceId,
}

impl<T: Transport> ResourceHandle<'_, T> {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Fetches the image and decodes it on the blocking pool.
    pub async fn image(&self) -> Result<RawImage, FetchError> {
        let url = self.fetcher.endpoints.image_url(self.id);
        let response = image_response(self.request("image", &url).await)?;
        tokio::task::spawn_blocking(move || decode_image(&response.body))
            .await
            .map_err(|e| {
                FetchError::bad_image(LegFailure::Undecodable(format!("decoder task failed: {e}")))
            })?
            .map_err(FetchError::bad_image)
    }

    pub async fn metadata(&self) -> Result<ImageMetadata, FetchError> {
        let url = self.fetcher.endpoints.metadata_url(self.id);
        check_metadata(self.request("metadata", &url).await)
    }

    async fn request(&self, leg: &'static str, url: &Url) -> Result<Response, LegFailure> {
        tracing::debug!(id = %self.id, leg, %url, "issuing request");
        Ok(self.fetcher.transport.fetch(url).await?)
    }
}

fn blocking_image(
    adapter: &BlockingAdapter,
    id: ResourceId,
    url: &Url,
) -> Result<RawImage, FetchError> {
    tracing::debug!(%id, leg = "image", %url, "issuing blocking request");
    check_image(adapter.blocking_fetch(url).into_response())
}

fn blocking_metadata(
    adapter: &BlockingAdapter,
    id: ResourceId,
    url: &Url,
) -> Result<ImageMetadata, FetchError> {
    tracing::debug!(%id, leg = "metadata", %url, "issuing blocking request");
    check_metadata(adapter.blocking_fetch(url).into_response())
}

fn image_response(result: Result<Response, LegFailure>) -> Result<Response, FetchError> {
    let response = result.map_err(FetchError::bad_image)?;
    if !response.is_ok() {
        return Err(FetchError::bad_image(LegFailure::Status(response.status)));
    }
    Ok(response)
}

fn check_image(result: Result<Response, LegFailure>) -> Result<RawImage, FetchError> {
    let response = image_response(result)?;
    decode_image(&response.body).map_err(FetchError::bad_image)
}

fn check_metadata(result: Result<Response, LegFailure>) -> Result<ImageMetadata, FetchError> {
    let response = result.map_err(FetchError::invalid_metadata)?;
    if !response.is_ok() {
        return Err(FetchError::invalid_metadata(LegFailure::Status(response.status)));
    }
    decode_metadata(&response.body).map_err(FetchError::invalid_metadata)
}

fn cancelled_leg() -> TransportResult {
    TransportResult::failed(TransportError::Cancelled)
}

fn cancelled_image() -> FetchOutcome {
    Err(FetchError::bad_image(TransportError::Cancelled))
}

fn cancelled_metadata() -> FetchOutcome {
    Err(FetchError::invalid_metadata(TransportError::Cancelled))
}

// Completions deliver their fallbacks, so a closed channel means the
// handler itself was lost before the image leg reported.
async fn settle(rx: oneshot::Receiver<FetchOutcome>) -> FetchOutcome {
    rx.await.unwrap_or_else(|_| cancelled_image())
}
