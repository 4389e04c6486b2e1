// src/follow_up.rs
//! Follow-up requests issued from the viewer, such as showing every row
//! outside the top list as a regular table. Requests are handed off; the
//! responses belong to whoever serves the queue.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

pub const QUEUE_FILE: &str = "filter_queue.jsonl";
pub const FILTER_HEAVY: &str = "filterHeavy";

const ATTEMPTS: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Materialize the rows of the table outside a heavy-hitters list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterHeavyRequest {
    pub method: String,
    pub hitters_id: String,
    pub schema: Schema,
}

impl FilterHeavyRequest {
    pub fn new(hitters_id: impl Into<String>, schema: Schema) -> Self {
        Self {
            method: FILTER_HEAVY.to_string(),
            hitters_id: hitters_id.into(),
            schema,
        }
    }
}

pub trait FollowUpDispatcher {
    fn dispatch(&self, request: &FilterHeavyRequest) -> Result<()>;
}

/// Appends requests, one JSON object per line, to a queue file.
pub struct QueueDispatcher {
    queue_path: PathBuf,
}

impl QueueDispatcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            queue_path: data_dir.into().join(QUEUE_FILE),
        }
    }

    pub fn queue_path(&self) -> &std::path::Path {
        &self.queue_path
    }
}

impl FollowUpDispatcher for QueueDispatcher {
    fn dispatch(&self, request: &FilterHeavyRequest) -> Result<()> {
        let line = serde_json::to_string(request)?;

        // Retry a few times if locked
        for attempt in 0..ATTEMPTS {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.queue_path)
            {
                Ok(mut file) => {
                    #[cfg(unix)]
                    {
                        use fs2::FileExt;
                        if file.try_lock_exclusive().is_err() {
                            std::thread::sleep(RETRY_DELAY);
                            continue;
                        }
                    }

                    writeln!(file, "{}", line)?;

                    #[cfg(unix)]
                    {
                        use fs2::FileExt;
                        file.unlock()?;
                    }

                    tracing::info!(
                        hitters_id = %request.hitters_id,
                        queue = %self.queue_path.display(),
                        "queued {}", request.method
                    );
                    return Ok(());
                }
                Err(e) if attempt + 1 < ATTEMPTS => {
                    tracing::debug!(attempt, error = %e, "queue busy, retrying");
                    std::thread::sleep(RETRY_DELAY);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(anyhow::anyhow!(
            "could not write to queue {}",
            self.queue_path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDescription;
    use crate::value::ContentsKind;

    #[test]
    fn requests_append_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = QueueDispatcher::new(dir.path());
        let schema = Schema::new(vec![ColumnDescription::new("city", ContentsKind::Category)]);

        dispatcher.dispatch(&FilterHeavyRequest::new("hh-1", schema.clone())).unwrap();
        dispatcher.dispatch(&FilterHeavyRequest::new("hh-2", schema)).unwrap();

        let text = std::fs::read_to_string(dispatcher.queue_path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["method"], "filterHeavy");
        assert_eq!(first["hittersId"], "hh-1");
        assert_eq!(first["schema"][0]["kind"], "Category");
    }
}
