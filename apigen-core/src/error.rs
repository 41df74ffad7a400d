//! Error types for the code generator

use std::path::PathBuf;

/// Generator result type
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors raised while deriving names, rendering stubs and writing artifacts
#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    /// A stub or routes file that must exist is missing
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// The destination of a generated file is already taken; nothing was written
    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// The model identifier cannot be turned into module and type names
    #[error("invalid model name: {0}")]
    InvalidName(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Wrap an I/O error, mapping `NotFound` onto [`GeneratorError::NotFound`]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            GeneratorError::NotFound { path }
        } else {
            GeneratorError::Io { path, source }
        }
    }

    /// True for the "generated file collision" outcome
    pub fn is_already_exists(&self) -> bool {
        matches!(self, GeneratorError::AlreadyExists { .. })
    }
}
