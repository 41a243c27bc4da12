//! Where feed tables come from.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use super::error::FeedError;

/// A source of named feed tables.
///
/// Implementations return `Ok(None)` for a table that doesn't exist, so the
/// loader can decide whether that table is required.
pub trait FeedSource {
    /// Open a table by file name (e.g. `"stops.txt"`).
    fn open(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>, FeedError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// A feed stored as files in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryFeed {
    root: PathBuf,
}

impl DirectoryFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The feed directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FeedSource for DirectoryFeed {
    fn open(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>, FeedError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let file = File::open(&path).map_err(|source| FeedError::Io {
            name: path.display().to_string(),
            source,
        })?;
        Ok(Some(Box::new(file)))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// A feed held in memory, keyed by file name.
///
/// Useful for embedding a feed in the binary and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    files: HashMap<String, String>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    /// Remove a table.
    pub fn without_file(mut self, name: &str) -> Self {
        self.files.remove(name);
        self
    }
}

impl FeedSource for MemoryFeed {
    fn open(&self, name: &str) -> Result<Option<Box<dyn Read + '_>>, FeedError> {
        Ok(self
            .files
            .get(name)
            .map(|contents| Box::new(Cursor::new(contents.as_bytes())) as Box<dyn Read + '_>))
    }

    fn describe(&self) -> String {
        let mut names: Vec<_> = self.files.keys().map(String::as_str).collect();
        names.sort_unstable();
        format!("memory feed [{}]", names.join(", "))
    }
}
