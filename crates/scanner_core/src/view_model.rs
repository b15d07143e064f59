use crate::{Notice, Phase, ScanKind, ScanResult};

/// Snapshot of orchestrator state handed to the presentation layer after every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub active_kind: Option<ScanKind>,
    pub result: Option<ScanResult>,
    pub error_message: Option<String>,
    pub notice: Option<Notice>,
    /// Triggering controls (scan buttons, tab switches) accept input.
    pub controls_enabled: bool,
}

impl AppViewModel {
    /// Label for the busy control, present only while a scan is in flight.
    pub fn busy_label(&self) -> Option<&'static str> {
        match (self.phase, self.active_kind) {
            (Phase::InFlight, Some(kind)) => Some(kind.busy_label()),
            _ => None,
        }
    }
}
