//! File access seam.
//!
//! The readers only need two things from the outside world: the entry names
//! of a log directory and the full text of one file in it. [`LogSource`]
//! captures exactly that, and [`FsSource`] provides it over a real directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Provider of directory listings and file contents.
pub trait LogSource {
    /// Names of the entries in the log directory.
    fn entries(&self) -> Result<Vec<String>>;

    /// All lines of the named file, without line terminators.
    fn read_lines(&self, name: &str) -> Result<Vec<String>>;
}

/// [`LogSource`] backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LogSource for FsSource {
    fn entries(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        read_lines(self.root.join(name))
    }
}

/// Read a whole text file into lines in one scoped acquisition.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(split_lines(&text))
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// 1-based line lookup.
pub fn line_at(lines: &[String], number: usize) -> Option<&str> {
    number
        .checked_sub(1)
        .and_then(|idx| lines.get(idx))
        .map(String::as_str)
}
