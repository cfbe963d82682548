use crate::conf::ConfigError;
use crate::monitor::MonitorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build monitor runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to start log monitoring: {0}")]
    Monitor(#[from] MonitorError),

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
