use super::SourceKind;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure to obtain the text of a table.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("No {0} source configured")]
    Missing(SourceKind),

    #[error("Cannot fetch {0}: built without the remote-sources feature")]
    FeatureDisabled(String),
}
