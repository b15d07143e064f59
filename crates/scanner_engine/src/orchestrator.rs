use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};

use scan_logging::{scan_info, scan_warn};
use scanner_core::{update, AppViewModel, Effect, Msg, OrchestratorState, Phase, ScanKind, ScanRequest};

use crate::{detect, translate, DetectionClient, EngineEvent};

/// Receives a snapshot after every state transition.
pub trait StateSink: Send + Sync {
    fn publish(&self, view: AppViewModel);
}

pub struct ChannelStateSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelStateSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl StateSink for ChannelStateSink {
    fn publish(&self, view: AppViewModel) {
        let _ = self.tx.send(EngineEvent::StateChanged(view));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Another scan was in flight; nothing changed.
    Rejected,
    Succeeded,
    Failed,
}

/// Runs one scan at a time against a detection service.
///
/// The state has a single writer (this type) and is read through snapshots. The
/// lock is never held across a network call.
pub struct ScanOrchestrator {
    client: Arc<dyn DetectionClient>,
    sink: Arc<dyn StateSink>,
    state: Mutex<OrchestratorState>,
}

impl ScanOrchestrator {
    pub fn new(client: Arc<dyn DetectionClient>, sink: Arc<dyn StateSink>) -> Self {
        Self {
            client,
            sink,
            state: Mutex::new(OrchestratorState::new()),
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.lock().view()
    }

    pub async fn run_url_scan(&self, raw: &str) -> ScanOutcome {
        self.run_scan(ScanKind::UrlScan, raw).await
    }

    pub async fn run_text_scan(&self, raw: &str) -> ScanOutcome {
        self.run_scan(ScanKind::TextScan, raw).await
    }

    pub async fn run_scan(&self, kind: ScanKind, raw: &str) -> ScanOutcome {
        if self.lock().phase() == Phase::InFlight {
            scan_info!("{} scan rejected: another scan is in flight", kind);
            return ScanOutcome::Rejected;
        }

        let (mut phase, effects) = self.apply(Msg::ScanRequested {
            kind,
            raw: raw.to_string(),
        });
        if phase == Phase::InFlight && effects.is_empty() {
            // Lost the race to a concurrent caller between the check and the update.
            return ScanOutcome::Rejected;
        }

        for effect in effects {
            match effect {
                Effect::Dispatch(request) => phase = self.dispatch(request).await,
            }
        }

        match phase {
            Phase::Succeeded => ScanOutcome::Succeeded,
            _ => ScanOutcome::Failed,
        }
    }

    async fn dispatch(&self, request: ScanRequest) -> Phase {
        let kind = request.kind;
        scan_info!("dispatching {} scan payload_len={}", kind, request.payload.len());

        let msg = match detect(self.client.as_ref(), &request).await {
            Ok(body) => Msg::ResponseReceived { kind, body },
            Err(err) => {
                scan_warn!("{} scan transport failure: {}", kind, err);
                Msg::ScanFailed {
                    kind,
                    message: translate(&err),
                }
            }
        };
        let (phase, _effects) = self.apply(msg);
        phase
    }

    /// Feed `msg` through `update`, publishing a snapshot if anything changed.
    fn apply(&self, msg: Msg) -> (Phase, Vec<Effect>) {
        let (phase, effects, changed_view) = {
            let mut guard = self.lock();
            let state = std::mem::take(&mut *guard);
            let (mut state, effects) = update(state, msg);
            let changed_view = state.consume_dirty().then(|| state.view());
            let phase = state.phase();
            *guard = state;
            (phase, effects, changed_view)
        };

        if let Some(view) = changed_view {
            self.sink.publish(view);
        }
        (phase, effects)
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
