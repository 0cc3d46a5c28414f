//! Sources of line-groups, one group per `CREATE TABLE` statement.
//!
//! - [`FileSource`] reads every matching file of a directory as one group
//! - [`DumpSource`] splits a single dump file into one group per statement
//!
//! Both are iterators over `Result<Vec<String>>` and can be passed straight
//! to [`Generator::generate`](crate::generator::Generator::generate).

use crate::error::{ErdError, Result};
use glob::Pattern;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec::IntoIter;
use tracing::debug;

/// File pattern used when none is given
pub const DEFAULT_PATTERN: &str = "*.sql";

static CREATE_TABLE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*CREATE\s+TABLE\b").unwrap());

/// Reads `SHOW CREATE TABLE` output from files in one directory
#[derive(Debug)]
pub struct FileSource {
    files: IntoIter<PathBuf>,
}

impl FileSource {
    /// List files in `directory` whose names match `pattern`
    /// (default `*.sql`), sorted by path.
    ///
    /// A pattern that matches nothing gives an empty source.
    pub fn new(directory: &Path, pattern: Option<&str>) -> Result<Self> {
        if !directory.is_dir() {
            return Err(ErdError::InvalidDirectory(directory.to_path_buf()));
        }

        let pattern_str = pattern.unwrap_or(DEFAULT_PATTERN);
        let pattern = Pattern::new(pattern_str).map_err(|source| ErdError::InvalidPattern {
            pattern: pattern_str.to_string(),
            source,
        })?;

        let entries = fs::read_dir(directory).map_err(|e| ErdError::io(directory, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ErdError::io(directory, e))?.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.matches(n));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!(
            directory = %directory.display(),
            pattern = pattern_str,
            files = files.len(),
            "listed source files"
        );

        Ok(Self {
            files: files.into_iter(),
        })
    }

    /// Number of files not yet read
    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl Iterator for FileSource {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        Some(read_lines(&path))
    }
}

/// Splits one dump file into per-statement line-groups.
///
/// A group starts at a `CREATE TABLE` line and ends at the first following
/// line that starts with `)`. Lines outside a statement are ignored.
#[derive(Debug)]
pub struct DumpSource {
    groups: IntoIter<Vec<String>>,
}

impl DumpSource {
    /// Read and split the dump at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let lines = read_lines(path)?;
        Ok(Self::from_lines(lines))
    }

    /// Split already-read dump text
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines().map(str::to_string).collect())
    }

    fn from_lines(lines: Vec<String>) -> Self {
        let groups = group_statements(lines);
        debug!(statements = groups.len(), "split dump into statements");
        Self {
            groups: groups.into_iter(),
        }
    }
}

impl Iterator for DumpSource {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.groups.next().map(Ok)
    }
}

/// Group lines into `CREATE TABLE` statements
pub fn group_statements(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in lines {
        if CREATE_TABLE_START_RE.is_match(&line) {
            if let Some(group) = current.take() {
                groups.push(group);
            }
            current = Some(vec![line]);
            continue;
        }

        if let Some(group) = current.as_mut() {
            let closes = line.trim_start().starts_with(')');
            group.push(line);
            if closes {
                groups.extend(current.take());
            }
        }
    }

    // Unterminated trailing statement
    groups.extend(current);
    groups
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ErdError::io(path, e))?;
    Ok(content.lines().map(str::to_string).collect())
}
