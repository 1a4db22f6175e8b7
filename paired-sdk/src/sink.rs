// ABOUTME: Outcome sink capability that receives exactly one outcome per paired fetch
// ABOUTME: Includes a channel sink that marshals outcomes to the consuming task

use tokio::sync::mpsc;

use crate::model::{FetchOutcome, ResourceId};

/// Consumer of finished fetches. Marshaling onto a particular thread or
/// task is the sink's job, not the fetcher's.
pub trait OutcomeSink: Send + Sync {
    fn accept(&self, id: ResourceId, outcome: FetchOutcome);
}

impl<F> OutcomeSink for F
where
    F: Fn(ResourceId, FetchOutcome) + Send + Sync,
{
    fn accept(&self, id: ResourceId, outcome: FetchOutcome) {
        self(id, outcome)
    }
}

/// Forwards outcomes to whoever holds the receiving end.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<(ResourceId, FetchOutcome)>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ResourceId, FetchOutcome)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelSink {
    fn accept(&self, id: ResourceId, outcome: FetchOutcome) {
        if self.tx.send((id, outcome)).is_err() {
            tracing::warn!(%id, "outcome receiver closed; outcome discarded");
        }
    }
}
