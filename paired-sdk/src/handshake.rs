// ABOUTME: Counting wait/signal handshake and the blocking adapter built on it
// ABOUTME: Turns a callback-completing transport call into a synchronous call

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::completion::Completion;
use crate::error::TransportError;
use crate::model::TransportResult;
use crate::transport::CallbackTransport;

/// A counting semaphore that starts at zero.
///
/// Intended for one producer and one consumer: the producer calls `signal`
/// exactly once, the consumer calls `wait` exactly once. Zero signals park
/// the consumer forever under `wait`. Extra signals leave permits behind for
/// the next waiter.
#[derive(Debug, Default)]
pub struct Handshake {
    permits: Mutex<usize>,
    ready: Condvar,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        self.ready.notify_one();
    }

    /// Block until a permit is available, with no timeout.
    pub fn wait(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.ready.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Block until a permit is available or `timeout` elapses. Returns
    /// `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut permits = self.permits.lock();
        while *permits == 0 {
            if self.ready.wait_until(&mut permits, deadline).timed_out() {
                if *permits == 0 {
                    return false;
                }
                break;
            }
        }
        *permits -= 1;
        true
    }

    pub fn permits(&self) -> usize {
        *self.permits.lock()
    }
}

/// How long a blocking fetch waits for its callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeWait {
    /// Wait forever. A transport that never calls back parks the thread
    /// permanently.
    #[default]
    Unbounded,
    /// Give up after the duration and report `TransportError::TimedOut`.
    Bounded(Duration),
}

/// Synchronous front for a callback transport.
///
/// `blocking_fetch` parks the calling thread for one round trip, so it must
/// run on a worker thread, never on the thread that drives the transport's
/// callbacks.
#[derive(Clone)]
pub struct BlockingAdapter {
    transport: Arc<dyn CallbackTransport>,
    wait: HandshakeWait,
}

impl BlockingAdapter {
    pub fn new(transport: Arc<dyn CallbackTransport>) -> Self {
        Self {
            transport,
            wait: HandshakeWait::Unbounded,
        }
    }

    pub fn with_wait(mut self, wait: HandshakeWait) -> Self {
        self.wait = wait;
        self
    }

    pub fn wait_policy(&self) -> HandshakeWait {
        self.wait
    }

    pub fn blocking_fetch(&self, url: &Url) -> TransportResult {
        let handshake = Arc::new(Handshake::new());
        let captured: Arc<Mutex<Option<TransportResult>>> = Arc::new(Mutex::new(None));

        let completion = {
            let handshake = handshake.clone();
            let captured = captured.clone();
            // A dropped completion still wakes the waiter, with `Cancelled`.
            Completion::with_fallback(
                "blocking fetch",
                TransportResult::failed(TransportError::Cancelled),
                move |result: TransportResult| {
                    *captured.lock() = Some(result);
                    // Last action: the waiter may read `captured` once woken.
                    handshake.signal();
                },
            )
        };

        tracing::debug!(%url, "starting blocking fetch");
        self.transport.fetch_with(url, completion);

        match self.wait {
            HandshakeWait::Unbounded => handshake.wait(),
            HandshakeWait::Bounded(timeout) => {
                if !handshake.wait_timeout(timeout) {
                    tracing::warn!(%url, ?timeout, "blocking fetch timed out waiting for callback");
                    return TransportResult::failed(TransportError::TimedOut);
                }
            }
        }

        let result = captured.lock().take();
        result.unwrap_or_else(|| TransportResult::failed(TransportError::Cancelled))
    }
}

impl std::fmt::Debug for BlockingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingAdapter")
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}
