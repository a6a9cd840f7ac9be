//! Fixed-layout columnar log reader.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

use crate::source::{line_at, read_lines, split_lines};
use crate::table::prune;
use crate::table::HeaderValue;
use crate::{Error, Result};

const HEADER_NAMES_LINE: usize = 2;
const HEADER_VALUES_LINE: usize = 3;
const COLUMN_NAMES_LINE: usize = 6;
const FIRST_ROW_LINE: usize = 7;

/// Default name of the column used for pruning and point lookups.
pub const DEFAULT_KEY_COLUMN: &str = "model_number";

/// Result of [`TabularLog::get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Column(&'a [f64]),
    Header(&'a HeaderValue),
}

/// A parsed history or profile file.
///
/// Layout by 1-based line number: line 2 holds header names, line 3 their
/// values, line 6 the bulk column names and every line from 7 on one row of
/// numbers. Lines 1, 4 and 5 are not interpreted.
///
/// If the key column is present, rows superseded by a later restart are
/// removed while loading, so afterwards the key is strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularLog {
    key_column: String,
    header_names: Vec<String>,
    header: HashMap<String, HeaderValue>,
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
    column_index: HashMap<String, usize>,
    pruned_rows: usize,
}

/// Parsed file contents before the key column has been repaired.
struct RawLog {
    header_names: Vec<String>,
    header_values: Vec<HeaderValue>,
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl TabularLog {
    /// Read and parse the file at `path`.
    pub fn open(path: impl AsRef<Path>, key_column: &str) -> Result<Self> {
        let path = path.as_ref();
        let log = Self::from_lines(&read_lines(path)?, key_column)?;
        debug!(
            "loaded {}: {} rows x {} columns ({} pruned)",
            path.display(),
            log.row_count(),
            log.column_names.len(),
            log.pruned_rows
        );
        Ok(log)
    }

    pub fn parse(text: &str, key_column: &str) -> Result<Self> {
        Self::from_lines(&split_lines(text), key_column)
    }

    pub fn from_lines(lines: &[String], key_column: &str) -> Result<Self> {
        let raw = RawLog::parse(lines)?;
        Ok(raw.build(key_column))
    }

    /// Typed header value, or `None` with a warning if `name` is unknown.
    pub fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        let value = self.header.get(name);
        if value.is_none() {
            warn!("{name} is not a header field");
        }
        value
    }

    /// Bulk column, or `None` with a warning if `name` is unknown.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let column = self.column_slice(name);
        if column.is_none() {
            warn!("{name} is not a column");
        }
        column
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header.contains_key(name)
    }

    /// Look `name` up among bulk columns first, then header fields.
    pub fn get(&self, name: &str) -> Option<Field<'_>> {
        self.column_slice(name)
            .map(Field::Column)
            .or_else(|| self.header.get(name).map(Field::Header))
    }

    /// Value of column `name` in the row whose key equals `key_value`.
    ///
    /// Key equality is exact; no tolerance is applied.
    pub fn value_at_key(&self, name: &str, key_value: f64) -> Result<f64> {
        let row = self.row_for_key(key_value)?;
        let column = self
            .column_slice(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        Ok(column[row])
    }

    /// Row index whose key column equals `key_value`.
    pub fn row_for_key(&self, key_value: f64) -> Result<usize> {
        let keys = self
            .column_slice(&self.key_column)
            .ok_or_else(|| Error::MissingKeyColumn(self.key_column.clone()))?;
        keys.iter()
            .position(|&key| key == key_value)
            .ok_or_else(|| Error::KeyValueNotFound {
                column: self.key_column.clone(),
                value: key_value,
            })
    }

    /// Ascending row indices for which `predicate` holds.
    ///
    /// The predicate receives one value per entry of `names`, in that order.
    pub fn filter(
        &self,
        names: &[&str],
        predicate: Option<&dyn Fn(&[f64]) -> bool>,
    ) -> Result<Vec<usize>> {
        let selected = self.resolve_columns(names)?;
        let predicate = predicate.ok_or(Error::MissingPredicate)?;

        let mut args = Vec::with_capacity(selected.len());
        let mut rows = Vec::new();
        for row in 0..self.row_count() {
            args.clear();
            args.extend(selected.iter().map(|column| column[row]));
            if predicate(args.as_slice()) {
                rows.push(row);
            }
        }
        if rows.is_empty() {
            warn!("no rows matched filter on {names:?}");
        }
        Ok(rows)
    }

    /// Columns for `names`, failing on the first unknown one.
    pub(crate) fn resolve_columns(&self, names: &[&str]) -> Result<Vec<&[f64]>> {
        if names.is_empty() {
            return Err(Error::NoColumns);
        }
        names
            .iter()
            .map(|name| {
                self.column_slice(name)
                    .ok_or_else(|| Error::UnknownColumn(name.to_string()))
            })
            .collect()
    }

    pub fn header_names(&self) -> &[String] {
        &self.header_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Key column values, if the key column exists.
    pub fn keys(&self) -> Option<&[f64]> {
        self.column_slice(&self.key_column)
    }

    /// Number of rows the key repair dropped while loading.
    pub fn pruned_rows(&self) -> usize {
        self.pruned_rows
    }

    fn column_slice(&self, name: &str) -> Option<&[f64]> {
        self.column_index
            .get(name)
            .map(|&idx| self.columns[idx].as_slice())
    }
}

impl RawLog {
    fn parse(lines: &[String]) -> Result<Self> {
        if lines.len() < FIRST_ROW_LINE {
            return Err(Error::format(
                lines.len(),
                format!("expected at least {FIRST_ROW_LINE} lines, found {}", lines.len()),
            ));
        }

        let header_names = tokens(lines, HEADER_NAMES_LINE);
        let header_values: Vec<HeaderValue> = tokens(lines, HEADER_VALUES_LINE)
            .iter()
            .map(|token| HeaderValue::parse(token))
            .collect();
        if header_names.len() != header_values.len() {
            return Err(Error::format(
                HEADER_VALUES_LINE,
                format!(
                    "{} header values for {} header names",
                    header_values.len(),
                    header_names.len()
                ),
            ));
        }

        let column_names = tokens(lines, COLUMN_NAMES_LINE);
        for (idx, name) in column_names.iter().enumerate() {
            if column_names[..idx].contains(name) {
                return Err(Error::format(
                    COLUMN_NAMES_LINE,
                    format!("duplicate column name {name}"),
                ));
            }
        }

        let mut columns = vec![Vec::new(); column_names.len()];
        for (offset, line) in lines[FIRST_ROW_LINE - 1..].iter().enumerate() {
            let line_no = FIRST_ROW_LINE + offset;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != column_names.len() {
                return Err(Error::format(
                    line_no,
                    format!(
                        "{} values for {} columns",
                        fields.len(),
                        column_names.len()
                    ),
                ));
            }
            for (column, field) in columns.iter_mut().zip(fields) {
                let value = field.parse::<f64>().map_err(|_| {
                    Error::format(line_no, format!("non-numeric value {field:?}"))
                })?;
                column.push(value);
            }
        }

        Ok(Self {
            header_names,
            header_values,
            column_names,
            columns,
        })
    }

    fn build(self, key_column: &str) -> TabularLog {
        let column_index: HashMap<String, usize> = self
            .column_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        let (columns, pruned_rows) = match column_index.get(key_column) {
            Some(&key_idx) => {
                let stale = prune::stale_rows(&self.columns[key_idx]);
                let pruned = stale.iter().filter(|&&s| s).count();
                (prune::retain_rows(self.columns, &stale), pruned)
            }
            None => (self.columns, 0),
        };

        let header = self
            .header_names
            .iter()
            .cloned()
            .zip(self.header_values)
            .collect();

        TabularLog {
            key_column: key_column.to_string(),
            header_names: self.header_names,
            header,
            column_names: self.column_names,
            columns,
            column_index,
            pruned_rows,
        }
    }
}

fn tokens(lines: &[String], number: usize) -> Vec<String> {
    line_at(lines, number)
        .map(|line| line.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}
