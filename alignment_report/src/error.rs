use thiserror::Error;

/// Errors raised while reading alignments or deriving their main points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("alignment not found: {name}")]
    NotFound { name: String },

    #[error("alignment {alignment}: unsupported {kind} segment at station {station}")]
    UnsupportedSegment {
        alignment: String,
        kind: &'static str,
        station: f64,
    },

    #[error("alignment {alignment} has no segments")]
    EmptyAlignment { alignment: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
