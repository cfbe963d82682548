use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A temporary directory holding a config file and the log file it points at.
pub struct Fixture {
    _dir: TempDir,
    pub config_path: PathBuf,
    pub log_path: PathBuf,
}

impl Fixture {
    /// `sections` is appended after a generated `[monitoring]` section.
    pub fn new(sections: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config_path = dir.path().join("speedog.conf");
        let log_path = dir.path().join("game.log");

        fs::write(&log_path, "").expect("failed to create log file");
        fs::write(
            &config_path,
            format!(
                "[monitoring]\nLog_File_Path={}\nMonitor_Interval=0.05\n\n{sections}",
                log_path.display()
            ),
        )
        .expect("failed to write config");

        Self {
            _dir: dir,
            config_path,
            log_path,
        }
    }

    pub fn append_log(&self, text: &str) {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.log_path)
            .expect("failed to open log file");
        f.write_all(text.as_bytes()).expect("failed to append log");
    }

    pub fn truncate_log(&self, text: &str) {
        fs::write(&self.log_path, text).expect("failed to rewrite log");
    }
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_until(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}
