//! Scanner engine: detection service transport and scan orchestration.
mod engine;
mod orchestrator;
mod translate;
mod transport;
mod types;

pub use engine::{EngineError, EngineEvent, EngineHandle};
pub use orchestrator::{ChannelStateSink, ScanOrchestrator, ScanOutcome, StateSink};
pub use translate::translate;
pub use transport::{detect, DetectionClient, ReqwestDetectionClient, TransportSettings};
pub use types::{Endpoint, FailureKind, TransportError};
