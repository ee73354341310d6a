//! Shared types for the documentation tree normalizer.

pub mod config;
pub mod error;
pub mod suffix;
pub mod types;

pub use config::{NormalizationConfig, DEFAULT_ROOT};
pub use error::{DnError, Result};
pub use suffix::{CompressionSuffix, KNOWN_SUFFIXES};
pub use types::{Entry, EntryKind, SymlinkTarget};
