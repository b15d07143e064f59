use serde_json::Value;

use crate::ScanKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User triggered a scan with the raw contents of the input control.
    ScanRequested { kind: ScanKind, raw: String },
    /// Transport returned a successful, decoded JSON body.
    ResponseReceived { kind: ScanKind, body: Value },
    /// Transport failed; `message` is already fit for display.
    ScanFailed { kind: ScanKind, message: String },
    /// Presentation timer expired for the current notice.
    NoticeDismissed,
}
