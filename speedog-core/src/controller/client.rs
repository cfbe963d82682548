use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How a client is bound to the target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientTarget {
    Name(String),
    Pid(u32),
}

impl Display for ClientTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientTarget::Name(name) => write!(f, "process {name}"),
            ClientTarget::Pid(pid) => write!(f, "pid {pid}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to run speed client {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("speed client {action} failed ({status}): {stderr}")]
    Rejected {
        action: &'static str,
        status: String,
        stderr: String,
    },

    #[error("speed client {action} did not finish within {timeout:?}")]
    Timeout {
        action: &'static str,
        timeout: Duration,
    },

    #[error("failed waiting for speed client {action}: {source}")]
    Wait {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("speed client is detached from its process")]
    Detached,
}

/// A live handle on the external speed hack, bound to one process.
pub trait SpeedClient: Send {
    fn set_speed(&mut self, speed: f64) -> Result<(), ClientError>;
}

/// Creates clients for a target process.
pub trait SpeedBackend: Send + Sync {
    fn create(&self, target: &ClientTarget, arch: &str) -> Result<Box<dyn SpeedClient>, ClientError>;
}
