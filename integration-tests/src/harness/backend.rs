use speedog_core::controller::{ClientError, ClientTarget, ProcessFinder, SpeedBackend, SpeedClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Stand-in for the external speed client. Records every speed it is asked to apply.
#[derive(Clone)]
pub struct RecordingBackend {
    reachable: Arc<AtomicBool>,
    speeds: Arc<Mutex<Vec<f64>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            reachable: Arc::new(AtomicBool::new(true)),
            speeds: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// While unreachable, attaching fails and live clients reject every call.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn speeds(&self) -> Vec<f64> {
        self.speeds.lock().unwrap().clone()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedBackend for RecordingBackend {
    fn create(&self, _target: &ClientTarget, _arch: &str) -> Result<Box<dyn SpeedClient>, ClientError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(unreachable_error("attach"));
        }

        Ok(Box::new(RecordingClient {
            backend: self.clone(),
        }))
    }
}

struct RecordingClient {
    backend: RecordingBackend,
}

impl SpeedClient for RecordingClient {
    fn set_speed(&mut self, speed: f64) -> Result<(), ClientError> {
        if !self.backend.reachable.load(Ordering::SeqCst) {
            return Err(unreachable_error("set-speed"));
        }

        self.backend.speeds.lock().unwrap().push(speed);
        Ok(())
    }
}

fn unreachable_error(action: &'static str) -> ClientError {
    ClientError::Rejected {
        action,
        status: "exit status: 1".to_string(),
        stderr: "process not running".to_string(),
    }
}

/// A process table that never contains the target.
pub struct EmptyProcessTable;

impl ProcessFinder for EmptyProcessTable {
    fn find_pid(&self, _name: &str) -> Option<u32> {
        None
    }
}
