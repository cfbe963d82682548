use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Most bytes consumed by one [`LogTail::read_new_lines`] call.
pub const DEFAULT_READ_LIMIT: u64 = 4 * 1024 * 1024;

/// Follows a growing log file and hands out complete lines.
///
/// The cursor only ever moves past a `\n`. A trailing line without its terminator stays
/// unread until the writer finishes it. At most the read limit is consumed per call, the
/// rest waits for the next one.
#[derive(Debug)]
pub struct LogTail {
    path: PathBuf,
    file: File,
    cursor: u64,
    read_limit: u64,
}

impl LogTail {
    /// Open `path` positioned at end of file.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let cursor = file.metadata()?.len();

        Ok(Self {
            path,
            file,
            cursor,
            read_limit: DEFAULT_READ_LIMIT,
        })
    }

    pub fn with_read_limit(mut self, limit: u64) -> Self {
        self.read_limit = limit.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn read_new_lines(&mut self) -> io::Result<Vec<String>> {
        let len = self.file.metadata()?.len();

        if len < self.cursor {
            tracing::warn!(
                path = %self.path.display(),
                cursor = self.cursor,
                len,
                "log file truncated, resetting to start"
            );
            self.cursor = 0;
        }

        if len == self.cursor {
            return Ok(Vec::new());
        }

        self.file.seek(SeekFrom::Start(self.cursor))?;
        let want = (len - self.cursor).min(self.read_limit);
        let mut chunk = Vec::new();
        Read::by_ref(&mut self.file)
            .take(want)
            .read_to_end(&mut chunk)?;

        let complete = match chunk.iter().rposition(|&b| b == b'\n') {
            Some(last_newline) => &chunk[..=last_newline],
            // A single line longer than the limit is handed out in pieces.
            None if chunk.len() as u64 == self.read_limit => {
                tracing::warn!(
                    path = %self.path.display(),
                    limit = self.read_limit,
                    "log line exceeds read limit, splitting"
                );
                &chunk[..]
            }
            None => return Ok(Vec::new()),
        };
        self.cursor += complete.len() as u64;

        Ok(split_lines(complete))
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// A [`LogTail`] that survives I/O errors by reopening the file.
#[derive(Debug)]
pub struct LogSource {
    path: PathBuf,
    tail: Option<LogTail>,
}

impl LogSource {
    pub fn new(tail: LogTail) -> Self {
        Self {
            path: tail.path.clone(),
            tail: Some(tail),
        }
    }

    /// A source whose file is opened on the first poll.
    pub fn detached(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tail: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.tail.is_some()
    }

    pub fn cursor(&self) -> Option<u64> {
        self.tail.as_ref().map(LogTail::cursor)
    }

    pub fn poll(&mut self) -> Vec<String> {
        let Some(tail) = self.tail.as_mut() else {
            self.reopen();
            return Vec::new();
        };

        match tail.read_new_lines() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "error reading log, reopening");
                self.tail = None;
                self.reopen();
                Vec::new()
            }
        }
    }

    fn reopen(&mut self) {
        match LogTail::open(&self.path) {
            Ok(tail) => {
                tracing::info!(path = %self.path.display(), "log file reopened");
                self.tail = Some(tail);
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "log file unavailable");
            }
        }
    }
}
