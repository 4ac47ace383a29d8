use std::path::PathBuf;

/// Errors surfaced by the fold engine.
///
/// Per the error taxonomy, only I/O failures and the per-message "not
/// found" lookup reach callers as `Err`. Malformed lines, torn trailing
/// writes, and orphaned mutations are local recoveries handled inside
/// the fold loop and never produce one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum FoldError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("message not found: {id}")]
    MessageNotFound { id: String },
}

pub type FoldResult<T> = Result<T, FoldError>;
