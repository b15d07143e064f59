use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scanner_core::{AppViewModel, ScanKind};

use crate::orchestrator::{ChannelStateSink, ScanOrchestrator, ScanOutcome};
use crate::transport::{DetectionClient, ReqwestDetectionClient, TransportSettings};
use crate::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Snapshot published after a state transition.
    StateChanged(AppViewModel),
    /// A submitted scan resolved (or was rejected).
    ScanFinished { kind: ScanKind, outcome: ScanOutcome },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build detection client: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Scan { kind: ScanKind, raw: String },
}

/// Runs a `ScanOrchestrator` on a background runtime and reports through a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: TransportSettings) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestDetectionClient::new(settings)?);
        Self::with_client(client)
    }

    pub fn with_client(client: Arc<dyn DetectionClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let sink = Arc::new(ChannelStateSink::new(event_tx.clone()));
        let orchestrator = Arc::new(ScanOrchestrator::new(client, sink));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let orchestrator = orchestrator.clone();
                let event_tx = event_tx.clone();
                // Spawned, not awaited: overlapping submissions reach the in-flight guard.
                runtime.spawn(async move {
                    handle_command(orchestrator.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, kind: ScanKind, raw: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Scan {
            kind,
            raw: raw.into(),
        });
    }

    /// Non-blocking poll for a UI loop.
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    orchestrator: &ScanOrchestrator,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Scan { kind, raw } => {
            let outcome = orchestrator.run_scan(kind, &raw).await;
            let _ = event_tx.send(EngineEvent::ScanFinished { kind, outcome });
        }
    }
}
