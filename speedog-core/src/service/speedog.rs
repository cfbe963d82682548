use crate::conf::{SpeedogConfig, load_config};
use crate::controller::SpeedController;
use crate::monitor::LogMonitor;
use crate::service::error::ServiceError;
use crate::service::shutdown::ShutdownHandle;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// How often the idle loop checks for a shutdown request.
pub const IDLE_TICK: Duration = Duration::from_millis(250);

/// How long dropping the service waits for blocking work left on the monitor runtime.
pub const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Wires config, controller and monitor together and owns their lifecycle.
pub struct SpeedogService {
    config: Arc<SpeedogConfig>,
    controller: Arc<SpeedController>,
    monitor: LogMonitor,
    shutdown: ShutdownHandle,
    active: bool,
    // Taken on drop so a stuck poll step cannot hold up process exit.
    runtime: Option<Runtime>,
}

impl SpeedogService {
    /// Load the config file and build a service that talks to the configured helper.
    pub fn initialize(config_path: &Path) -> Result<Self, ServiceError> {
        tracing::info!(config = %config_path.display(), "initializing speedog");

        let config = load_config(config_path)?;
        let controller = SpeedController::from_config(&config.game);

        Self::with_controller(config, controller)
    }

    pub fn with_controller(
        config: SpeedogConfig,
        controller: SpeedController,
    ) -> Result<Self, ServiceError> {
        // Monitor runtime (poll task only)
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("speedog-monitor")
            .enable_all()
            .build()
            .map_err(ServiceError::Runtime)?;

        let config = Arc::new(config);
        let controller = Arc::new(controller);
        let monitor = LogMonitor::new(config.clone(), controller.clone(), runtime.handle().clone());

        tracing::info!("service initialized");

        Ok(Self {
            config,
            controller,
            monitor,
            shutdown: ShutdownHandle::new(),
            active: false,
            runtime: Some(runtime),
        })
    }

    pub fn config(&self) -> &SpeedogConfig {
        &self.config
    }

    pub fn controller(&self) -> &Arc<SpeedController> {
        &self.controller
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Route SIGINT and SIGTERM to this service's shutdown handle.
    pub fn install_signal_handler(&self) -> Result<(), ServiceError> {
        self.shutdown.install_signal_handler()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Connect if possible and start monitoring. Only a monitor failure is fatal.
    pub fn start(&mut self) -> Result<(), ServiceError> {
        tracing::info!("starting service");

        if let Err(e) = self.controller.connect() {
            tracing::warn!(
                error = %e,
                process = self.controller.process_name(),
                "target process not reachable yet, will retry on first rule match"
            );
        }

        self.monitor.start_monitoring()?;
        self.active = true;

        tracing::info!("speedog started");
        Ok(())
    }

    /// Start, then idle until shutdown is requested, then shut down.
    pub fn run(&mut self) -> Result<(), ServiceError> {
        self.start()?;

        while !self.shutdown.is_requested() {
            thread::sleep(IDLE_TICK);
        }

        self.shutdown();
        Ok(())
    }

    /// Stop monitoring and put the target back to normal speed. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }

        tracing::info!("shutting down");
        if let Err(e) = self.monitor.stop_monitoring() {
            tracing::debug!(error = %e, "monitor was not running");
        }

        tracing::info!("resetting game speed");
        self.controller.reset();

        self.active = false;
        self.shutdown.request();
        tracing::info!("service stopped");
    }
}

impl Drop for SpeedogService {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
        }
    }
}
