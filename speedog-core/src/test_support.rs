use crate::controller::{ClientError, ClientTarget, ProcessFinder, SpeedBackend, SpeedClient};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy)]
enum SetOutcome {
    Ok,
    Rejected,
    TimedOut,
    Panic,
}

#[derive(Default)]
struct Script {
    create_results: VecDeque<bool>,
    set_results: VecDeque<SetOutcome>,
    creates: Vec<ClientTarget>,
    set_calls: Vec<f64>,
}

/// Backend whose outcomes are queued up front. Unqueued calls succeed.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_create(&self, ok: bool) -> &Self {
        self.script.lock().unwrap().create_results.push_back(ok);
        self
    }

    pub fn queue_set(&self, ok: bool) -> &Self {
        let outcome = if ok { SetOutcome::Ok } else { SetOutcome::Rejected };
        self.script.lock().unwrap().set_results.push_back(outcome);
        self
    }

    pub fn queue_set_timeout(&self) -> &Self {
        self.script.lock().unwrap().set_results.push_back(SetOutcome::TimedOut);
        self
    }

    /// The next `set_speed` records its call and then panics.
    pub fn queue_set_panic(&self) -> &Self {
        self.script.lock().unwrap().set_results.push_back(SetOutcome::Panic);
        self
    }

    pub fn creates(&self) -> Vec<ClientTarget> {
        self.script.lock().unwrap().creates.clone()
    }

    pub fn set_calls(&self) -> Vec<f64> {
        self.script.lock().unwrap().set_calls.clone()
    }
}

impl SpeedBackend for ScriptedBackend {
    fn create(&self, target: &ClientTarget, _arch: &str) -> Result<Box<dyn SpeedClient>, ClientError> {
        let mut script = self.script.lock().unwrap();
        script.creates.push(target.clone());

        if script.create_results.pop_front().unwrap_or(true) {
            Ok(Box::new(ScriptedClient {
                script: self.script.clone(),
            }))
        } else {
            Err(rejected("attach"))
        }
    }
}

struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl SpeedClient for ScriptedClient {
    fn set_speed(&mut self, speed: f64) -> Result<(), ClientError> {
        let outcome = {
            let mut script = self.script.lock().unwrap();
            script.set_calls.push(speed);
            script.set_results.pop_front().unwrap_or(SetOutcome::Ok)
        };

        // The script lock is released above so a panic does not poison it.
        match outcome {
            SetOutcome::Ok => Ok(()),
            SetOutcome::Rejected => Err(rejected("set-speed")),
            SetOutcome::TimedOut => Err(ClientError::Timeout {
                action: "set-speed",
                timeout: Duration::from_millis(10),
            }),
            SetOutcome::Panic => panic!("scripted speed client panic"),
        }
    }
}

fn rejected(action: &'static str) -> ClientError {
    ClientError::Rejected {
        action,
        status: "exit status: 1".to_string(),
        stderr: "scripted failure".to_string(),
    }
}

/// Process table lookup with a fixed answer.
pub struct FixedFinder(pub Option<u32>);

impl ProcessFinder for FixedFinder {
    fn find_pid(&self, _name: &str) -> Option<u32> {
        self.0
    }
}
