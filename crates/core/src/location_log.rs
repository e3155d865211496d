//! Append-only NDJSON log of every position a team reports.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_RETRIES: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub team_name: String,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Number of locations solved when the position was reported
    pub solved: usize,
    pub current_goal: String,
    #[serde(default)]
    pub beam_to_location: bool,
}

impl LogEntry {
    pub fn time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Clone, Debug)]
pub struct LocationLog {
    path: PathBuf,
    retries: u32,
    max_backoff: Duration,
}

impl LocationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retries: DEFAULT_RETRIES,
            max_backoff: Duration::from_secs(1),
        }
    }

    /// Attempts per append; at least one is always made
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    /// Upper bound of the random pause between failed attempts
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut attempt = 0;
        loop {
            match self.write_line(&line) {
                Ok(()) => return Ok(()),
                Err(source) => {
                    attempt += 1;
                    if attempt >= self.retries {
                        return Err(ScavengerError::LogWrite {
                            attempts: attempt,
                            source,
                        });
                    }

                    tracing::warn!(
                        path = %self.path.display(),
                        attempt,
                        error = %source,
                        "location log write failed, retrying"
                    );

                    let pause = rand::rng().random_range(0.0..=1.0) * self.max_backoff.as_secs_f64();
                    std::thread::sleep(Duration::from_secs_f64(pause));
                }
            }
        }
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Every logged entry; a missing file is an empty log
    pub fn read_all(&self) -> Result<Vec<LogEntry>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ScavengerError::io(&self.path, e)),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| ScavengerError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }

        Ok(entries)
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScavengerError::io(&self.path, e)),
        }
    }
}
