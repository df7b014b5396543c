use thiserror::Error;

/// Typed failure reported by every core operation.
///
/// Each variant carries a human-readable detail string; the UI shows it in
/// the status line and the session table is left untouched by the failed
/// operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load file: {0}")]
    Load(String),

    #[error("filter failed: {0}")]
    Filter(String),

    #[error("conversion failed: {0}")]
    Conversion(String),

    #[error("{0}")]
    InsufficientColumns(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;
