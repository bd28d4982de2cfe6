use stratum_core::CoreError;
use stratum_frontend_core::FrontendError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MachineError>;

#[derive(Debug, Error)]
pub enum MachineError {
    /// The machine has no transition for the event in its current state.
    #[error("{machine} machine has no transition for {event} in state {state}")]
    UnexpectedEvent {
        machine: &'static str,
        state: &'static str,
        event: &'static str,
    },

    /// An inbound command could not be decoded into a known event.
    #[error("unknown or malformed event: {0}")]
    UnknownEvent(#[from] serde_json::Error),

    #[error("layer {0:?} has no context entry")]
    UnknownLayer(String),

    #[error("no added data is queued for assignment")]
    NothingQueued,

    #[error("rendering backend error: {0}")]
    Backend(#[from] FrontendError),

    #[error("scene error: {0}")]
    Scene(#[from] CoreError),
}
