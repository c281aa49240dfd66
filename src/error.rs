use std::path::PathBuf;

/// Failures local to a single schema merge call. No partial tree is
/// produced when one of these is returned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// A reserved key (`enum`, `required`, `parameters`) holds a value of
    /// the wrong shape on one of the inputs.
    #[error("expected an array at `{key}`, found {found}")]
    TypeMismatch { key: String, found: &'static str },
}

/// Errors from the tool boundary around the merger: configuration,
/// fragment loading, and document output.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing {id}: {message}")]
    Parse { id: String, message: String },

    #[error("failed fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fragment `{0}` registered twice")]
    DuplicateFragment(String),

    #[error("fragment `{0}` is not a mapping at the top level")]
    NotAMapping(String),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

pub type Result<T> = std::result::Result<T, PrepareError>;
