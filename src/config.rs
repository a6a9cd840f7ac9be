//! Log directory configuration.
//!
//! Defines where the logs live and how the history, index and snapshot files
//! are named.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::index::SnapshotId;
use crate::table::DEFAULT_KEY_COLUMN;
use crate::Result;

/// Naming configuration for a log directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory holding the log files.
    /// Default: "."
    pub log_path: PathBuf,

    /// Snapshot file name prefix.
    /// Default: "profile"
    pub snapshot_prefix: String,

    /// Snapshot file name suffix, without the dot.
    /// Default: "data"
    pub snapshot_suffix: String,

    /// History file name.
    /// Default: "history.data"
    pub history_file: String,

    /// Snapshot index file name.
    /// Default: "profiles.index"
    pub index_file: String,

    /// Column used for restart pruning and sequence lookups.
    /// Default: "model_number"
    pub key_column: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("."),
            snapshot_prefix: "profile".to_string(),
            snapshot_suffix: "data".to_string(),
            history_file: "history.data".to_string(),
            index_file: "profiles.index".to_string(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
        }
    }
}

impl LogConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            ..Self::default()
        }
    }

    /// Load a JSON document; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_file_over(path, &Self::default())
    }

    /// Load a JSON document; missing fields are taken from `base`.
    pub fn from_json_file_over(path: impl AsRef<Path>, base: &LogConfig) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let overlay: serde_json::Value = serde_json::from_str(&text)?;
        let merged = match (serde_json::to_value(base)?, overlay) {
            (serde_json::Value::Object(mut fields), serde_json::Value::Object(set)) => {
                fields.extend(set);
                serde_json::Value::Object(fields)
            }
            (_, other) => other,
        };
        Ok(serde_json::from_value(merged)?)
    }

    pub fn with_snapshot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.snapshot_prefix = prefix.into();
        self
    }

    pub fn with_snapshot_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.snapshot_suffix = suffix.into();
        self
    }

    pub fn with_history_file(mut self, name: impl Into<String>) -> Self {
        self.history_file = name.into();
        self
    }

    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column = name.into();
        self
    }

    /// `{prefix}{id}.{suffix}`
    pub fn snapshot_file_name(&self, id: SnapshotId) -> String {
        format!("{}{}.{}", self.snapshot_prefix, id, self.snapshot_suffix)
    }
}
