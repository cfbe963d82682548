use crate::controller::client::{ClientError, ClientTarget};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: ClientTarget,
        #[source]
        source: ClientError,
    },

    #[error("process '{name}' not found")]
    ProcessNotFound { name: String },

    #[error("failed to set speed {speed}x: {source}")]
    SetSpeed {
        speed: f64,
        #[source]
        source: ClientError,
    },
}
