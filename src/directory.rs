//! Log directory facade.
//!
//! Ties the history log and the snapshot index of one run directory
//! together and answers "which snapshot do I load" for partial requests.

use log::{debug, warn};

use crate::config::LogConfig;
use crate::index::{SequenceId, SnapshotId, SnapshotIndex};
use crate::source::{FsSource, LogSource};
use crate::table::TabularLog;
use crate::{Error, Result};

/// A run directory holding a history file, a snapshot index and snapshots.
///
/// The entry listing, the index and the history are captured once when the
/// directory is opened. Snapshots are parsed fresh on every request.
///
/// # Example
///
/// ```no_run
/// use steplog::{LogConfig, LogDirectory};
///
/// let logs = LogDirectory::open(LogConfig::new("LOGS"))?;
///
/// // Latest snapshot.
/// let last = logs.resolve_snapshot(None, None)?;
///
/// // Snapshot written at sequence id 300.
/// let at_300 = logs.resolve_snapshot(Some(300), None)?;
/// # let _ = (last, at_300);
/// # Ok::<(), steplog::Error>(())
/// ```
#[derive(Debug)]
pub struct LogDirectory<S: LogSource = FsSource> {
    config: LogConfig,
    source: S,
    entries: Vec<String>,
    index: SnapshotIndex,
    history: TabularLog,
}

impl LogDirectory<FsSource> {
    /// Open the directory named by `config.log_path`.
    ///
    /// # Errors
    ///
    /// - `Error::Io`: the directory or one of its files could not be read
    /// - `Error::MissingIndexFile` / `Error::MissingHistoryFile`
    /// - `Error::Format`: the index or history file is malformed
    pub fn open(config: LogConfig) -> Result<Self> {
        let source = FsSource::new(&config.log_path);
        Self::with_source(config, source)
    }
}

impl<S: LogSource> LogDirectory<S> {
    /// Open a directory through an arbitrary [`LogSource`].
    pub fn with_source(config: LogConfig, source: S) -> Result<Self> {
        let entries = source.entries()?;
        if !entries.contains(&config.index_file) {
            return Err(Error::MissingIndexFile(config.index_file.clone()));
        }
        if !entries.contains(&config.history_file) {
            return Err(Error::MissingHistoryFile(config.history_file.clone()));
        }

        let index = SnapshotIndex::from_lines(&source.read_lines(&config.index_file)?)?;
        let history =
            TabularLog::from_lines(&source.read_lines(&config.history_file)?, &config.key_column)?;
        debug!(
            "opened {}: {} history rows, {} snapshots",
            config.log_path.display(),
            history.row_count(),
            index.len()
        );

        Ok(Self {
            config,
            source,
            entries,
            index,
            history,
        })
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn history(&self) -> &TabularLog {
        &self.history
    }

    pub fn index(&self) -> &SnapshotIndex {
        &self.index
    }

    /// Entry names captured when the directory was opened.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn snapshot_file_name(&self, id: SnapshotId) -> String {
        self.config.snapshot_file_name(id)
    }

    pub fn has_snapshot_file(&self, id: SnapshotId) -> bool {
        self.entries.contains(&self.snapshot_file_name(id))
    }

    /// Load the snapshot named by a possibly partial request.
    ///
    /// An explicit `snapshot_id` wins and is only checked against the
    /// directory listing. Otherwise the snapshot recorded for `sequence_id`
    /// is used, and an omitted `sequence_id` means the latest one in the
    /// index.
    pub fn resolve_snapshot(
        &self,
        sequence_id: Option<SequenceId>,
        snapshot_id: Option<SnapshotId>,
    ) -> Result<TabularLog> {
        let snapshot_id = match snapshot_id {
            Some(id) => id,
            None => {
                let sequence_id = sequence_id
                    .or_else(|| self.index.latest_sequence())
                    .ok_or(Error::EmptyIndex)?;
                self.index
                    .snapshot_for_sequence(sequence_id)
                    .ok_or(Error::NoSnapshotForSequence(sequence_id))?
            }
        };

        let name = self.snapshot_file_name(snapshot_id);
        if !self.entries.contains(&name) {
            return Err(Error::MissingSnapshotFile(name));
        }
        debug!("loading snapshot {snapshot_id} from {name}");
        TabularLog::from_lines(&self.source.read_lines(&name)?, &self.config.key_column)
    }

    /// Sequence ids with a snapshot whose history row satisfies `predicate`.
    ///
    /// Only history key values that the index knows are considered. The
    /// predicate receives one history value per entry of `names`.
    pub fn select_sequence_ids(
        &self,
        names: &[&str],
        predicate: Option<&dyn Fn(&[f64]) -> bool>,
    ) -> Result<Vec<SequenceId>> {
        let columns = self.history.resolve_columns(names)?;
        let predicate = predicate.ok_or(Error::MissingPredicate)?;
        let keys = self
            .history
            .keys()
            .ok_or_else(|| Error::MissingKeyColumn(self.history.key_column().to_string()))?;

        // Keys are strictly increasing after pruning, so each row is the
        // unique row for its key.
        let mut args = Vec::with_capacity(columns.len());
        let mut selected = Vec::new();
        for (row, &key) in keys.iter().enumerate() {
            let Some(sequence_id) = as_sequence_id(key) else {
                continue;
            };
            if !self.index.has_sequence(sequence_id) {
                continue;
            }
            args.clear();
            args.extend(columns.iter().map(|column| column[row]));
            if predicate(args.as_slice()) {
                selected.push(sequence_id);
            }
        }
        if selected.is_empty() {
            warn!("no snapshot sequence ids matched selection on {names:?}");
        }
        Ok(selected)
    }
}

fn as_sequence_id(key: f64) -> Option<SequenceId> {
    (key >= 0.0 && key.fract() == 0.0 && key <= u64::MAX as f64).then_some(key as u64)
}
