use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle that asks a running service to shut down.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub(crate) fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn request(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }

    /// Route SIGINT and SIGTERM to this handle.
    ///
    /// The process may only install one handler.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("termination signal received, shutting down");
            handle.request();
        })
    }
}
