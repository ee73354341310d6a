//! Compression suffix handling.

use crate::error::{DnError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

/// Suffixes the normalizer knows how to target.
pub const KNOWN_SUFFIXES: &[&str] = &["gz", "bz2", "xz", "lzma", "zst", "lz4", "lz", "Z", "br"];

/// A validated compression suffix, stored without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompressionSuffix(String);

impl CompressionSuffix {
    /// Parse a suffix, tolerating a leading `.`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if bare.is_empty() {
            return Err(DnError::MissingSuffix);
        }
        if !KNOWN_SUFFIXES.contains(&bare) {
            return Err(DnError::UnknownSuffix(bare.to_string()));
        }
        Ok(Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the last extension of `name` is exactly this suffix.
    ///
    /// Dotfiles such as `.gz` have no extension and never match.
    pub fn matches(&self, name: impl AsRef<OsStr>) -> bool {
        Path::new(name.as_ref())
            .extension()
            .map(|ext| ext == self.0.as_str())
            .unwrap_or(false)
    }

    /// `name` with this suffix appended, unless it already carries it.
    ///
    /// Works on raw names: bytes that are not UTF-8 pass through unchanged.
    pub fn apply(&self, name: impl AsRef<OsStr>) -> OsString {
        let name = name.as_ref();
        let mut out = name.to_os_string();
        if !self.matches(name) {
            out.push(".");
            out.push(&self.0);
        }
        out
    }
}

impl fmt::Display for CompressionSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CompressionSuffix {
    type Error = DnError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CompressionSuffix> for String {
    fn from(value: CompressionSuffix) -> Self {
        value.0
    }
}
