use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::events::{EventsError, FilterCriteria, LogEntry};

/// Read-only handle on the event log file. Every query opens its own
/// stream, so concurrent requests never share reader state.
#[derive(Debug, Clone)]
pub struct LogSource {
    path: PathBuf,
}

impl LogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::info!("Log source initialized at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Stream the file, keep the entries matching `criteria` and return
    /// them newest first. Malformed lines are skipped.
    pub async fn query(&self, criteria: &FilterCriteria) -> Result<Vec<LogEntry>, EventsError> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| EventsError::from_io(self.path.clone(), e))?;

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut entries = Vec::new();
        let mut line_number = 0usize;
        let mut skipped = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| EventsError::from_io(self.path.clone(), e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            match LogEntry::parse(line) {
                Some(entry) => {
                    if entry.matches(criteria) {
                        entries.push(entry);
                    }
                }
                None => {
                    skipped += 1;
                    tracing::trace!("Skipping malformed line {line_number}");
                }
            }
        }

        sort_newest_first(&mut entries);

        tracing::debug!(
            "Read {} lines from {}: {} matched, {} malformed",
            line_number,
            self.path.display(),
            entries.len(),
            skipped
        );

        Ok(entries)
    }
}

/// Sort by timestamp descending, compared as dates. Equal timestamps keep
/// their file order; timestamps that are not real dates go last.
pub fn sort_newest_first(entries: &mut [LogEntry]) {
    entries.sort_by_cached_key(|entry| Reverse(entry.timestamp_value()));
}
