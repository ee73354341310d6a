use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DnError {
    #[error("Compression suffix is not set")]
    MissingSuffix,
    #[error("Unknown compression suffix: {0}")]
    UnknownSuffix(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Compression failed for {}: {message}", path.display())]
    ToolFailure { path: PathBuf, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DnError {
    /// True for errors raised before any filesystem mutation because the
    /// configuration itself is unusable.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingSuffix | Self::UnknownSuffix(_) | Self::InvalidConfig(_) | Self::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DnError>;
