// ABOUTME: Paired fetch SDK: fetch an image and its JSON metadata as one outcome
// ABOUTME: Exposes transports, decoders, the blocking adapter, and the orchestrator

pub mod completion;
pub mod constants;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod handshake;
pub mod model;
pub mod orchestrator;
pub mod sink;
pub mod test_helpers;
pub mod transport;
pub mod worker;

pub use completion::Completion;
pub use decode::{decode_image, decode_metadata};
pub use endpoint::ResourceEndpoints;
pub use error::{
    ConfigError, DecodeError, FetchError, FetchErrorKind, FormatError, LegFailure, TransportError,
};
pub use handshake::{BlockingAdapter, Handshake, HandshakeWait};
pub use model::{
    DetailedResource, FetchOutcome, ImageMetadata, RawImage, ResourceId, Response, TransportResult,
};
pub use orchestrator::{PairedFetcher, ResourceHandle, Strategy, WorkerPolicy};
pub use sink::{ChannelSink, OutcomeSink};
pub use transport::{CallbackTransport, HttpTransport, SpawnedCallbacks, Transport, TransportConfig};
pub use worker::{BlockingPool, WorkQueue};
