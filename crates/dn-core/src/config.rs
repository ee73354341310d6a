//! Normalization configuration.
//!
//! Built once by the invoking layer and handed to the normalizer; the
//! library never consults the process environment.

use crate::error::{DnError, Result};
use crate::suffix::CompressionSuffix;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Documentation root scanned when the caller names none.
pub const DEFAULT_ROOT: &str = "/usr/share/man";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Roots to scan, in order. Each root holds section subdirectories.
    pub root_directories: Vec<PathBuf>,
    /// Executable invoked to compress a file in place.
    pub compression_command: String,
    /// Arguments passed verbatim before the overwrite flag and the path.
    pub compression_flags: Vec<String>,
    /// Suffix the compressor produces. No default: must be supplied.
    pub target_suffix: String,
    /// A caller already printed the compressor choice; skip the banner.
    pub announced: bool,
    /// Surface compressor failures instead of continuing silently.
    pub strict: bool,
    /// Classify and report without mutating anything.
    pub dry_run: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            root_directories: vec![PathBuf::from(DEFAULT_ROOT)],
            compression_command: "gzip".into(),
            compression_flags: vec!["-9".into()],
            target_suffix: String::new(),
            announced: false,
            strict: false,
            dry_run: false,
        }
    }
}

impl NormalizationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DnError::InvalidConfig(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    /// Replace the root list.
    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.root_directories = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Scan a single root.
    pub fn with_root(self, root: impl Into<PathBuf>) -> Self {
        self.with_roots([root.into()])
    }

    pub fn with_compressor<I, S>(mut self, command: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compression_command = command.into();
        self.compression_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.target_suffix = suffix.into();
        self
    }

    pub fn announced(mut self, announced: bool) -> Self {
        self.announced = announced;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check the config and return the validated suffix.
    ///
    /// Must succeed before any filesystem mutation takes place.
    pub fn validate(&self) -> Result<CompressionSuffix> {
        let suffix = CompressionSuffix::parse(&self.target_suffix)?;
        if self.compression_command.trim().is_empty() {
            return Err(DnError::InvalidConfig("compression command is empty".into()));
        }
        Ok(suffix)
    }

    /// One-line banner naming the compressor and its flags.
    pub fn banner(&self) -> String {
        if self.compression_flags.is_empty() {
            format!("compressing with {}", self.compression_command)
        } else {
            format!(
                "compressing with {} {}",
                self.compression_command,
                self.compression_flags.join(" ")
            )
        }
    }
}
