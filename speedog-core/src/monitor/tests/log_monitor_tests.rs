use crate::conf::{MonitoringConfig, RuleSet, SpeedRule, SpeedogConfig};
use crate::controller::SpeedController;
use crate::monitor::{LogMonitor, LogSource, LogTail, MonitorError, RuleDispatcher, poll_once};
use crate::test_support::{FixedFinder, ScriptedBackend};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use tokio::runtime::Runtime;

fn config(log: Option<PathBuf>, interval: f64) -> Arc<SpeedogConfig> {
    Arc::new(SpeedogConfig {
        monitoring: MonitoringConfig {
            log_file_path: log,
            monitor_interval: interval,
        },
        rules: RuleSet::from_iter([SpeedRule::new("FirstBoss", "Boss1", 3.0)]),
        ..SpeedogConfig::default()
    })
}

fn controller(config: &SpeedogConfig, backend: &ScriptedBackend) -> Arc<SpeedController> {
    Arc::new(SpeedController::new(
        &config.game,
        Box::new(backend.clone()),
        Box::new(FixedFinder(None)),
    ))
}

fn append(path: &Path, text: &str) {
    let mut f = OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(text.as_bytes()).unwrap();
}

fn wait_for(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

#[test]
fn poll_once_dispatches_each_complete_line() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "").unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(path.clone()), 1.0);
    let dispatcher = RuleDispatcher::new(cfg.clone(), controller(&cfg, &backend));
    let mut source = LogSource::new(LogTail::open(&path).unwrap());

    // Act
    append(&path, "noise\n[pipeline_data.name=Boss1] | enter\n[pipeline_data.name=Bo");
    let fired = poll_once(&mut source, &dispatcher);

    // Assert
    assert_eq!(fired, 1);
    assert_eq!(backend.set_calls(), vec![3.0]);

    // The held-back partial line fires once it is completed, and never again.
    append(&path, "ss1] | complete\n");
    assert_eq!(poll_once(&mut source, &dispatcher), 1);
    assert_eq!(poll_once(&mut source, &dispatcher), 0);
}

#[test]
fn start_fails_without_log_path() {
    let rt = Runtime::new().unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(None, 1.0);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());

    assert!(matches!(monitor.start_monitoring(), Err(MonitorError::NoLogFile)));
    assert!(!monitor.is_running());
}

#[test]
fn start_fails_for_missing_log_file() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(dir.path().join("absent.log")), 1.0);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());

    assert!(matches!(
        monitor.start_monitoring(),
        Err(MonitorError::Open { .. })
    ));
    assert!(!monitor.is_running());
}

#[test]
fn double_start_and_double_stop_report_failure() {
    // Arrange
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "").unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(path), 0.05);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());

    // Act / Assert
    assert!(matches!(monitor.stop_monitoring(), Err(MonitorError::NotRunning)));
    monitor.start_monitoring().unwrap();
    assert!(matches!(
        monitor.start_monitoring(),
        Err(MonitorError::AlreadyRunning)
    ));
    monitor.stop_monitoring().unwrap();
    assert!(matches!(monitor.stop_monitoring(), Err(MonitorError::NotRunning)));
    assert!(!monitor.is_running());
}

#[test]
fn background_task_applies_matched_rule() {
    // Arrange
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "[pipeline_data.name=Boss1] | enter\n").unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(path.clone()), 0.05);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());
    monitor.start_monitoring().unwrap();

    // Act
    append(&path, "[pipeline_data.name=Boss1] | enter\n");
    let applied = wait_for(|| !backend.set_calls().is_empty(), Duration::from_secs(3));
    monitor.stop_monitoring().unwrap();

    // Assert: the pre-existing line was skipped, the appended one applied
    assert!(applied);
    assert_eq!(backend.set_calls(), vec![3.0]);
}

#[test]
fn stop_does_not_wait_for_the_interval() {
    // Arrange
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "").unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(path), 30.0);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());
    monitor.start_monitoring().unwrap();

    // Act
    let started = Instant::now();
    monitor.stop_monitoring().unwrap();

    // Assert
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn monitor_can_restart_after_stop() {
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "").unwrap();
    let backend = ScriptedBackend::new();
    let cfg = config(Some(path), 0.05);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());

    monitor.start_monitoring().unwrap();
    monitor.stop_monitoring().unwrap();
    monitor.start_monitoring().unwrap();

    assert!(monitor.is_running());
    monitor.stop_monitoring().unwrap();
}

#[test]
fn loop_survives_a_panicking_iteration() {
    // Arrange
    let rt = Runtime::new().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.log");
    fs::write(&path, "").unwrap();
    let backend = ScriptedBackend::new();
    backend.queue_set_panic();
    let cfg = config(Some(path.clone()), 0.05);
    let mut monitor = LogMonitor::new(cfg.clone(), controller(&cfg, &backend), rt.handle().clone());
    monitor.start_monitoring().unwrap();

    // Act: the first match panics inside the client
    append(&path, "[pipeline_data.name=Boss1] | enter\n");
    let panicked = wait_for(|| backend.set_calls().len() == 1, Duration::from_secs(3));
    // the source is rebuilt at end of file on a following poll
    thread::sleep(Duration::from_millis(300));
    append(&path, "[pipeline_data.name=Boss1] | enter\n");
    let applied = wait_for(|| backend.set_calls().len() == 2, Duration::from_secs(3));

    // Assert
    assert!(panicked);
    assert!(applied);
    assert!(monitor.is_running());
    assert_eq!(backend.set_calls(), vec![3.0, 3.0]);
    monitor.stop_monitoring().unwrap();
}
