use thiserror::Error;

/// Errors from document reading and extraction. Most are recovered inside
/// the collector (skip the file, log, continue); the type exists so
/// helpers can report precise causes.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
