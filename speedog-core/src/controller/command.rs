use crate::controller::client::{ClientError, ClientTarget, SpeedBackend, SpeedClient};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// How long one helper invocation may run before it is killed.
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(2);

/// Backend that drives an external helper executable.
///
/// The helper is invoked once per operation:
///
/// ```text
/// <program> attach    --arch <arch> (--name <name> | --pid <pid>)
/// <program> set-speed --arch <arch> (--name <name> | --pid <pid>) --speed <speed>
/// ```
///
/// A zero exit status means success. A helper still running after the timeout is killed
/// and the call fails with [`ClientError::Timeout`].
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: PathBuf,
    timeout: Duration,
}

impl CommandBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_HELPER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn helper(&self, action: &'static str, target: &ClientTarget, arch: &str) -> Helper {
        Helper {
            program: self.program.clone(),
            timeout: self.timeout,
            action,
            target: target.clone(),
            arch: arch.to_string(),
        }
    }
}

impl SpeedBackend for CommandBackend {
    fn create(&self, target: &ClientTarget, arch: &str) -> Result<Box<dyn SpeedClient>, ClientError> {
        self.helper("attach", target, arch).run(&[])?;

        Ok(Box::new(CommandClient {
            backend: self.clone(),
            target: target.clone(),
            arch: arch.to_string(),
        }))
    }
}

#[derive(Debug)]
pub struct CommandClient {
    backend: CommandBackend,
    target: ClientTarget,
    arch: String,
}

impl SpeedClient for CommandClient {
    fn set_speed(&mut self, speed: f64) -> Result<(), ClientError> {
        let speed = speed.to_string();
        self.backend
            .helper("set-speed", &self.target, &self.arch)
            .run(&["--speed", speed.as_str()])
    }
}

struct Helper {
    program: PathBuf,
    timeout: Duration,
    action: &'static str,
    target: ClientTarget,
    arch: String,
}

impl Helper {
    fn run(&self, extra: &[&str]) -> Result<(), ClientError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(self.action).arg("--arch").arg(&self.arch);

        match &self.target {
            ClientTarget::Name(name) => cmd.arg("--name").arg(name),
            ClientTarget::Pid(pid) => cmd.arg("--pid").arg(pid.to_string()),
        };

        let mut child = cmd
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ClientError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let waited = child.wait_timeout(self.timeout).map_err(|source| ClientError::Wait {
            action: self.action,
            source,
        });

        let status = match waited {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child);
                return Err(ClientError::Timeout {
                    action: self.action,
                    timeout: self.timeout,
                });
            }
            Err(e) => {
                kill(&mut child);
                return Err(e);
            }
        };

        if status.success() {
            return Ok(());
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        Err(ClientError::Rejected {
            action: self.action,
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        })
    }
}

fn kill(child: &mut std::process::Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(pid = child.id(), error = %e, "failed to kill speed client");
    }
    // reap
    let _ = child.wait();
}
