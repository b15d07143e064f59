use crate::ScanRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the request to the detection service and report back with
    /// `Msg::ResponseReceived` or `Msg::ScanFailed`.
    Dispatch(ScanRequest),
}
