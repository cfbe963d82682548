use crate::conf::GameConfig;
use crate::controller::client::{ClientError, ClientTarget, SpeedBackend, SpeedClient};
use crate::controller::command::CommandBackend;
use crate::controller::error::ControlError;
use crate::controller::process::{ProcessFinder, SystemProcessFinder};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const NORMAL_SPEED: f64 = 1.0;

struct ControllerState {
    client: Option<Box<dyn SpeedClient>>,
    current_speed: f64,
    connected: bool,
}

impl ControllerState {
    fn attach(&mut self, client: Box<dyn SpeedClient>) {
        self.client = Some(client);
        self.connected = true;
    }

    fn detach(&mut self) {
        self.client = None;
        self.connected = false;
    }
}

/// Applies speed changes to the target process through a [`SpeedBackend`].
///
/// Connection handling is lazy: a failed connect is not fatal, every later
/// [`apply_speed`](Self::apply_speed) tries again. All operations run under one lock, so a
/// reset issued during shutdown cannot interleave with an apply from the monitor.
pub struct SpeedController {
    process_name: String,
    arch: String,
    backend: Box<dyn SpeedBackend>,
    finder: Box<dyn ProcessFinder>,
    state: Mutex<ControllerState>,
}

impl SpeedController {
    pub fn new(
        game: &GameConfig,
        backend: Box<dyn SpeedBackend>,
        finder: Box<dyn ProcessFinder>,
    ) -> Self {
        Self {
            process_name: game.process_name.clone(),
            arch: game.process_arch.clone(),
            backend,
            finder,
            state: Mutex::new(ControllerState {
                client: None,
                current_speed: NORMAL_SPEED,
                connected: false,
            }),
        }
    }

    /// Controller using the configured helper executable and the OS process table.
    pub fn from_config(game: &GameConfig) -> Self {
        Self::new(
            game,
            Box::new(CommandBackend::new(&game.client_command)),
            Box::new(SystemProcessFinder),
        )
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn current_speed(&self) -> f64 {
        self.lock().current_speed
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Bind a client to the target process, by name first and by pid second.
    pub fn connect(&self) -> Result<ClientTarget, ControlError> {
        let mut state = self.lock();
        self.connect_locked(&mut state)
    }

    /// Set the target's speed, reconnecting once if the client has gone away.
    ///
    /// A timed out call is not retried.
    pub fn apply_speed(&self, speed: f64) -> Result<(), ControlError> {
        let mut state = self.lock();

        if state.connected && state.current_speed == speed {
            return Ok(());
        }

        if !state.connected {
            self.connect_locked(&mut state)?;
        }

        let first = set_speed(&mut state, speed);
        let Err(err) = first else {
            tracing::info!(speed, "speed set");
            return Ok(());
        };

        // A hung helper is not retried, that would only double the stall.
        if matches!(err, ClientError::Timeout { .. }) {
            state.detach();
            return Err(ControlError::SetSpeed { speed, source: err });
        }

        tracing::warn!(error = %err, speed, "error setting speed, reconnecting");
        state.detach();
        self.connect_locked(&mut state)?;

        match set_speed(&mut state, speed) {
            Ok(()) => {
                tracing::info!(speed, "reconnected and speed set");
                Ok(())
            }
            Err(source) => {
                state.detach();
                Err(ControlError::SetSpeed { speed, source })
            }
        }
    }

    /// Return the target to normal speed. Failures are logged, not returned.
    pub fn reset(&self) {
        if let Err(e) = self.apply_speed(NORMAL_SPEED) {
            tracing::warn!(error = %e, "failed to reset speed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect_locked(&self, state: &mut ControllerState) -> Result<ClientTarget, ControlError> {
        let by_name = ClientTarget::Name(self.process_name.clone());
        match self.backend.create(&by_name, &self.arch) {
            Ok(client) => {
                state.attach(client);
                tracing::info!(bound_to = %by_name, arch = %self.arch, "connected");
                return Ok(by_name);
            }
            Err(e) => {
                tracing::debug!(error = %e, "connect by name failed, looking up pid");
            }
        }

        let result = match self.finder.find_pid(&self.process_name) {
            Some(pid) => {
                let by_pid = ClientTarget::Pid(pid);
                match self.backend.create(&by_pid, &self.arch) {
                    Ok(client) => Ok((by_pid, client)),
                    Err(source) => Err(ControlError::Connect {
                        target: by_pid,
                        source,
                    }),
                }
            }
            None => Err(ControlError::ProcessNotFound {
                name: self.process_name.clone(),
            }),
        };

        match result {
            Ok((target, client)) => {
                state.attach(client);
                tracing::info!(bound_to = %target, arch = %self.arch, "connected");
                Ok(target)
            }
            Err(e) => {
                state.detach();
                tracing::warn!(error = %e, "connection failed");
                Err(e)
            }
        }
    }
}

fn set_speed(state: &mut ControllerState, speed: f64) -> Result<(), ClientError> {
    let client = state.client.as_mut().ok_or(ClientError::Detached)?;
    client.set_speed(speed)?;
    state.current_speed = speed;
    Ok(())
}
