use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("log monitor is already running")]
    AlreadyRunning,

    #[error("log monitor is not running")]
    NotRunning,

    #[error("no log file configured (Log_File_Path in [monitoring])")]
    NoLogFile,

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
