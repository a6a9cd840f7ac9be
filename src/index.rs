//! Snapshot catalog.
//!
//! The index file pairs each saved snapshot with the sequence id at which it
//! was written. Line 1 is not interpreted; every following line holds
//! `sequence_id priority snapshot_id`.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::source::{read_lines, split_lines};
use crate::{Error, Result};

/// Step counter of the continuous history log.
pub type SequenceId = u64;
/// Number of a saved snapshot file.
pub type SnapshotId = u64;

const FIRST_ROW_LINE: usize = 2;

/// Bidirectional map between sequence ids and snapshot ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotIndex {
    forward: BTreeMap<SequenceId, SnapshotId>,
    inverse: BTreeMap<SnapshotId, SequenceId>,
    sequence_ids: Vec<SequenceId>,
    snapshot_ids: Vec<SnapshotId>,
}

impl SnapshotIndex {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let index = Self::from_lines(&read_lines(path)?)?;
        debug!("loaded {}: {} snapshots", path.display(), index.len());
        Ok(index)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_lines(&split_lines(text))
    }

    pub fn from_lines(lines: &[String]) -> Result<Self> {
        let mut rows = Vec::new();
        for (offset, line) in lines.iter().skip(FIRST_ROW_LINE - 1).enumerate() {
            let line_no = FIRST_ROW_LINE + offset;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 3 {
                return Err(Error::format(
                    line_no,
                    format!("expected 3 values, found {}", fields.len()),
                ));
            }
            let sequence = parse_id(fields[0], line_no)?;
            let snapshot = parse_id(fields[2], line_no)?;
            rows.push((sequence, snapshot));
        }
        Ok(Self::from_pairs(rows))
    }

    /// Build from `(sequence_id, snapshot_id)` rows in file order.
    ///
    /// A repeated sequence id keeps the last row's snapshot id.
    pub fn from_pairs(rows: impl IntoIterator<Item = (SequenceId, SnapshotId)>) -> Self {
        let mut forward = BTreeMap::new();
        for (sequence, snapshot) in rows {
            if let Some(previous) = forward.insert(sequence, snapshot) {
                warn!("sequence {sequence} listed twice; snapshot {previous} replaced by {snapshot}");
            }
        }

        let mut inverse = BTreeMap::new();
        for (&sequence, &snapshot) in &forward {
            if let Some(previous) = inverse.insert(snapshot, sequence) {
                warn!("snapshot {snapshot} listed for sequences {previous} and {sequence}");
            }
        }

        // BTreeMap iteration is ascending by sequence id, so both vectors line up.
        let sequence_ids = forward.keys().copied().collect();
        let snapshot_ids = forward.values().copied().collect();

        Self {
            forward,
            inverse,
            sequence_ids,
            snapshot_ids,
        }
    }

    pub fn has_sequence(&self, id: SequenceId) -> bool {
        self.forward.contains_key(&id)
    }

    pub fn has_snapshot(&self, id: SnapshotId) -> bool {
        self.inverse.contains_key(&id)
    }

    pub fn snapshot_for_sequence(&self, id: SequenceId) -> Option<SnapshotId> {
        self.forward.get(&id).copied()
    }

    pub fn sequence_for_snapshot(&self, id: SnapshotId) -> Option<SequenceId> {
        self.inverse.get(&id).copied()
    }

    /// Known sequence ids, ascending.
    pub fn sequence_ids(&self) -> &[SequenceId] {
        &self.sequence_ids
    }

    /// Snapshot ids, position-aligned with [`Self::sequence_ids`].
    pub fn snapshot_ids(&self) -> &[SnapshotId] {
        &self.snapshot_ids
    }

    pub fn latest_sequence(&self) -> Option<SequenceId> {
        self.sequence_ids.last().copied()
    }

    /// `(sequence_id, snapshot_id)` pairs in ascending sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, SnapshotId)> + '_ {
        self.forward.iter().map(|(&seq, &snap)| (seq, snap))
    }

    pub fn len(&self) -> usize {
        self.sequence_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence_ids.is_empty()
    }
}

fn parse_id(token: &str, line_no: usize) -> Result<u64> {
    let value: f64 = token
        .parse()
        .map_err(|_| Error::format(line_no, format!("non-numeric id {token:?}")))?;
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(Error::format(line_no, format!("invalid id {token:?}")));
    }
    Ok(value as u64)
}
