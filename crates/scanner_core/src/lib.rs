//! Scanner core: input validation, response normalization and the pure scan state machine.
mod effect;
mod model;
mod msg;
mod normalize;
mod risk;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use model::{DetectedSnippet, ScanKind, ScanRequest, ScanResult, FLAGGED_INPUT_PLACEHOLDER};
pub use msg::Msg;
pub use normalize::{normalize, NormalizeError};
pub use risk::{classify, RiskLevel, UnknownRiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use state::{Notice, NoticeKind, OrchestratorState, Phase, GENERIC_FAILURE_MESSAGE};
pub use update::update;
pub use validate::{can_submit, validate, validate_text, validate_url, ValidationError};
pub use view_model::AppViewModel;
