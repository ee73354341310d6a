//! Compression capability and the external-tool implementation.

use anyhow::{bail, Context as _};
use dn_core::{CompressionSuffix, NormalizationConfig};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// Compresses a single file in place.
///
/// On success `path` is gone and `path.<suffix>` holds the compressed data.
pub trait Compressor: Send + Sync {
    fn compress_in_place(&self, path: &Path) -> anyhow::Result<()>;
}

/// Runs a compressor executable such as `gzip` or `xz`, one blocking call
/// per file.
#[derive(Debug, Clone)]
pub struct ExternalCompressor {
    pub command: String,
    pub flags: Vec<String>,
    pub suffix: CompressionSuffix,
}

impl ExternalCompressor {
    pub fn new(command: impl Into<String>, flags: Vec<String>, suffix: CompressionSuffix) -> Self {
        Self {
            command: command.into(),
            flags,
            suffix,
        }
    }

    pub fn from_config(config: &NormalizationConfig, suffix: CompressionSuffix) -> Self {
        Self::new(
            config.compression_command.clone(),
            config.compression_flags.clone(),
            suffix,
        )
    }

    /// Arguments for one invocation: the configured flags, `-f` unless a
    /// force flag is already present, then the file.
    pub fn args(&self, path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.flags.iter().map(OsString::from).collect();
        if !self.flags.iter().any(|f| f == "-f" || f == "--force") {
            args.push("-f".into());
        }
        args.push(path.as_os_str().to_owned());
        args
    }
}

impl Compressor for ExternalCompressor {
    fn compress_in_place(&self, path: &Path) -> anyhow::Result<()> {
        let status = Command::new(&self.command)
            .args(self.args(path))
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("failed to run {}", self.command))?;
        if !status.success() {
            bail!("{} exited with {status}", self.command);
        }
        if std::fs::symlink_metadata(path).is_ok() {
            bail!("{} left {} in place", self.command, path.display());
        }
        let mut output = path.as_os_str().to_owned();
        output.push(format!(".{}", self.suffix));
        if !Path::new(&output).exists() {
            bail!("{} did not produce {}", self.command, Path::new(&output).display());
        }
        Ok(())
    }
}
