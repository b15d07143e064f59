use scan_logging::{scan_debug, scan_warn};

use crate::{normalize, validate, Effect, Msg, OrchestratorState, Phase, GENERIC_FAILURE_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: OrchestratorState, msg: Msg) -> (OrchestratorState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanRequested { kind, raw } => {
            if state.phase() == Phase::InFlight {
                scan_debug!("ignoring {} scan request while another scan is in flight", kind);
                return (state, Vec::new());
            }
            match validate(kind, &raw) {
                Ok(request) => {
                    state.begin_scan(kind);
                    vec![Effect::Dispatch(request)]
                }
                Err(err) => {
                    scan_debug!("{} scan input rejected: {}", kind, err);
                    state.fail(err.user_message(kind));
                    Vec::new()
                }
            }
        }
        Msg::ResponseReceived { kind, body } => {
            if !state.is_awaiting(kind) {
                scan_debug!("dropping {} scan response with no scan awaiting it", kind);
                return (state, Vec::new());
            }
            match normalize(&body, kind) {
                Ok(result) => state.succeed(kind, result),
                Err(err) => {
                    scan_warn!("{} scan failed: {}", kind, err);
                    state.fail(GENERIC_FAILURE_MESSAGE);
                }
            }
            Vec::new()
        }
        Msg::ScanFailed { kind, message } => {
            if state.is_awaiting(kind) {
                state.fail(message);
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.dismiss_notice();
            Vec::new()
        }
    };

    (state, effects)
}
