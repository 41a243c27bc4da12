//! Feed loading error types.

/// Errors that can occur while loading a feed or building a graph from it.
///
/// Only `MissingFile`, `Io` on a required table, `EmptyFeed` and
/// `BuildTask` abort a build. `MalformedRow`, `InvalidRecord` and
/// `Synonyms` are logged, counted and skipped.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A required feed table is absent
    #[error("required feed file missing: {name}")]
    MissingFile { name: String },

    /// A row could not be parsed
    #[error("malformed row in {file} at line {line}: {message}")]
    MalformedRow {
        file: String,
        line: u64,
        message: String,
    },

    /// A row parsed but its values are unusable (bad id, coordinates or
    /// name)
    #[error("invalid record in {file}: {message}")]
    InvalidRecord { file: String, message: String },

    /// The feed produced no stations, so no queries can be served
    #[error("feed contains no usable stations")]
    EmptyFeed,

    /// A feed file exists but could not be read
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The station synonyms file is not valid JSON of the expected shape
    #[error("invalid synonyms file: {0}")]
    Synonyms(String),

    /// The background build task panicked or was cancelled
    #[error("graph build task failed: {0}")]
    BuildTask(String),
}

impl FeedError {
    /// Whether this error aborts a build.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            FeedError::MalformedRow { .. }
                | FeedError::InvalidRecord { .. }
                | FeedError::Synonyms(_)
        )
    }
}
