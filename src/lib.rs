//! Structured access to the history and profile logs of a time-stepped
//! simulation run.
//!
//! A run directory holds one continuous history log, a set of profile
//! snapshots and an index pairing snapshot numbers with history sequence
//! ids. [`TabularLog`] reads one file, [`SnapshotIndex`] reads the index and
//! [`LogDirectory`] combines them to resolve snapshot requests.

pub mod config;
pub mod directory;
pub mod error;
pub mod index;
pub mod source;
pub mod table;

pub use config::LogConfig;
pub use directory::LogDirectory;
pub use error::{Error, Result};
pub use index::{SequenceId, SnapshotId, SnapshotIndex};
pub use source::{FsSource, LogSource};
pub use table::{Field, HeaderValue, TabularLog, DEFAULT_KEY_COLUMN};
