use crate::view_model::AppViewModel;
use crate::{ScanKind, ScanResult};

/// Shown when a failure carries nothing more specific for the user.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Initial state only; never re-entered.
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// State owned by the scan orchestrator.
///
/// `last_result` and `last_error_message` are never both present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrchestratorState {
    phase: Phase,
    active_kind: Option<ScanKind>,
    last_result: Option<ScanResult>,
    last_error_message: Option<String>,
    notice: Option<Notice>,
    dirty: bool,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_kind(&self) -> Option<ScanKind> {
        self.active_kind
    }

    pub fn last_result(&self) -> Option<&ScanResult> {
        self.last_result.as_ref()
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            active_kind: self.active_kind,
            result: self.last_result.clone(),
            error_message: self.last_error_message.clone(),
            notice: self.notice.clone(),
            controls_enabled: self.phase != Phase::InFlight,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while a dispatched scan of `kind` has not resolved yet.
    pub(crate) fn is_awaiting(&self, kind: ScanKind) -> bool {
        self.phase == Phase::InFlight && self.active_kind == Some(kind)
    }

    pub(crate) fn begin_scan(&mut self, kind: ScanKind) {
        self.phase = Phase::InFlight;
        self.active_kind = Some(kind);
        self.last_result = None;
        self.last_error_message = None;
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn succeed(&mut self, kind: ScanKind, result: ScanResult) {
        self.phase = Phase::Succeeded;
        self.last_result = Some(result);
        self.last_error_message = None;
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            message: kind.completion_message().to_string(),
        });
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.phase = Phase::Failed;
        self.last_result = None;
        self.last_error_message = Some(message.clone());
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            message,
        });
        self.dirty = true;
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }
}
