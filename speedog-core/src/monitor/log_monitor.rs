use crate::conf::SpeedogConfig;
use crate::controller::SpeedController;
use crate::monitor::dispatch::RuleDispatcher;
use crate::monitor::error::MonitorError;
use crate::monitor::tail::{LogSource, LogTail};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Upper bound on how long `stop_monitoring` waits for the poll task.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);

enum MonitorState {
    Idle,
    Running {
        stop: watch::Sender<bool>,
        task: JoinHandle<()>,
    },
    Stopped,
}

/// Polls the configured log file on a background task and dispatches matched nodes.
pub struct LogMonitor {
    config: Arc<SpeedogConfig>,
    dispatcher: Arc<RuleDispatcher>,
    runtime: Handle,
    state: MonitorState,
}

impl LogMonitor {
    pub fn new(
        config: Arc<SpeedogConfig>,
        controller: Arc<SpeedController>,
        runtime: Handle,
    ) -> Self {
        Self {
            dispatcher: Arc::new(RuleDispatcher::new(config.clone(), controller)),
            config,
            runtime,
            state: MonitorState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MonitorState::Running { .. })
    }

    /// Open the log file at its end and start polling it.
    pub fn start_monitoring(&mut self) -> Result<(), MonitorError> {
        if self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }

        let path = self
            .config
            .monitoring
            .log_file_path
            .clone()
            .ok_or(MonitorError::NoLogFile)?;

        let tail = LogTail::open(&path).map_err(|source| MonitorError::Open {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "monitoring log file");

        let (stop, stop_rx) = watch::channel(false);
        let task = self.runtime.spawn(poll_loop(
            LogSource::new(tail),
            self.dispatcher.clone(),
            self.config.monitoring.interval(),
            stop_rx,
        ));

        self.state = MonitorState::Running { stop, task };
        Ok(())
    }

    /// Signal the poll task and wait up to [`STOP_TIMEOUT`] for it to finish.
    ///
    /// A task that does not finish in time is aborted. Must not be called from inside the
    /// monitor's runtime.
    pub fn stop_monitoring(&mut self) -> Result<(), MonitorError> {
        let (stop, mut task) = match std::mem::replace(&mut self.state, MonitorState::Stopped) {
            MonitorState::Running { stop, task } => (stop, task),
            other => {
                self.state = other;
                return Err(MonitorError::NotRunning);
            }
        };

        let _ = stop.send(true);

        let joined = self
            .runtime
            .block_on(async { tokio::time::timeout(STOP_TIMEOUT, &mut task).await });

        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "monitor task ended abnormally"),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = STOP_TIMEOUT.as_secs(),
                    "monitor task did not stop in time, aborting"
                );
                task.abort();
            }
        }

        tracing::info!("log monitoring stopped");
        Ok(())
    }
}

/// Read whatever was appended since the last poll and dispatch it.
///
/// Returns how many lines fired a rule.
pub fn poll_once(source: &mut LogSource, dispatcher: &RuleDispatcher) -> usize {
    source
        .poll()
        .iter()
        .filter(|line| dispatcher.dispatch(line).is_some())
        .count()
}

async fn poll_loop(
    mut source: LogSource,
    dispatcher: Arc<RuleDispatcher>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) {
    tracing::info!(interval_secs = interval.as_secs_f64(), "monitor loop started");

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        // One poll is one unit of work: stop is only observed between polls.
        let path = source.path().to_path_buf();
        let step_dispatcher = dispatcher.clone();
        let step = tokio::task::spawn_blocking(move || {
            poll_once(&mut source, &step_dispatcher);
            source
        });

        source = match step.await {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(error = %e, "monitor iteration failed");
                LogSource::detached(path)
            }
        };
    }

    tracing::info!("monitor loop stopped");
}
