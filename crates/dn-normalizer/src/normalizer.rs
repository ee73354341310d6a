//! TreeNormalizer: one linear pass per root, section by section.

use crate::compressor::{Compressor, ExternalCompressor};
use crate::report::{Action, ExitStatus, NormalizationReport};
use dn_core::error::{DnError, Result};
use dn_core::types::{Entry, EntryKind};
use dn_core::{CompressionSuffix, NormalizationConfig};
use dn_storage::{is_directory_alias, read_target, remove_link, replace_symlink, DocTree};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Brings every page under the configured roots to a single compression
/// state and rewrites the symlinks that point at those pages.
pub struct TreeNormalizer {
    config: NormalizationConfig,
    suffix: CompressionSuffix,
    compressor: Arc<dyn Compressor>,
}

impl TreeNormalizer {
    /// Normalizer backed by the configured external compressor.
    ///
    /// Fails with a configuration error when the suffix is unset or unknown.
    pub fn new(config: NormalizationConfig) -> Result<Self> {
        let suffix = config.validate()?;
        let compressor = Arc::new(ExternalCompressor::from_config(&config, suffix.clone()));
        Ok(Self {
            config,
            suffix,
            compressor,
        })
    }

    /// Normalizer using a caller-supplied compressor.
    pub fn with_compressor(config: NormalizationConfig, compressor: Arc<dyn Compressor>) -> Result<Self> {
        let suffix = config.validate()?;
        Ok(Self {
            config,
            suffix,
            compressor,
        })
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    pub fn suffix(&self) -> &CompressionSuffix {
        &self.suffix
    }

    /// Run one pass and return the action log.
    pub fn run(&self) -> Result<NormalizationReport> {
        let mut report = NormalizationReport::new(self.config.dry_run);

        if !self.config.announced {
            let banner = self.config.banner();
            info!("{banner}");
            report.banner = Some(banner);
        }

        for root in &self.config.root_directories {
            let tree = DocTree::new(root);
            if !tree.exists() {
                debug!(root = %root.display(), "root absent, nothing to normalize");
                report.roots_skipped += 1;
                continue;
            }
            report.roots_scanned += 1;
            for section in tree.sections()? {
                for entry in tree.entries(&section)? {
                    match entry.kind {
                        EntryKind::Symlink => self.fix_link(&entry, &mut report),
                        EntryKind::RegularFile => self.compress_file(&entry, &mut report),
                        EntryKind::Directory => {
                            debug!(dir = %entry.path.display(), "nested directory skipped");
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    /// Run one pass and map the outcome to an exit status.
    pub fn normalize(&self) -> ExitStatus {
        match self.run() {
            Ok(report) => report.exit_status(self.config.strict),
            Err(e) => {
                error!("normalization aborted: {e}");
                ExitStatus::from_error(&e)
            }
        }
    }

    fn fix_link(&self, entry: &Entry, report: &mut NormalizationReport) {
        let target = match read_target(&entry.path) {
            Ok(target) => target,
            Err(e) => {
                warn!("{e}");
                report.fail(entry.path.clone(), e);
                return;
            }
        };

        if is_directory_alias(&entry.parent, &target) {
            debug!(
                link = %entry.path.display(),
                target = %target.raw.display(),
                "directory alias left alone"
            );
            return;
        }

        let name = entry.file_name();
        let new_name = self.suffix.apply(name);
        let new_target = PathBuf::from(self.suffix.apply(&target.raw));
        let renamed = new_name.as_os_str() != name;
        if !renamed && new_target == target.raw {
            return;
        }

        let new_link = entry.parent.join(&new_name);
        if !self.config.dry_run {
            if let Err(e) = replace_symlink(&new_link, &new_target) {
                warn!("{e}");
                report.fail(entry.path.clone(), e);
                return;
            }
        }
        report.record(Action::LinkFixed {
            link: new_link,
            target: new_target,
        });

        if renamed {
            if !self.config.dry_run {
                if let Err(e) = remove_link(&entry.path) {
                    warn!("{e}");
                    report.fail(entry.path.clone(), e);
                    return;
                }
            }
            report.record(Action::LinkRemoved {
                link: entry.path.clone(),
            });
        }
    }

    fn compress_file(&self, entry: &Entry, report: &mut NormalizationReport) {
        if self.suffix.matches(entry.file_name()) {
            return;
        }
        report.record(Action::Compressing {
            file: entry.path.clone(),
        });
        if self.config.dry_run {
            return;
        }
        if let Err(e) = self.compressor.compress_in_place(&entry.path) {
            warn!(file = %entry.path.display(), "compression failed: {e:#}");
            let error = DnError::ToolFailure {
                path: entry.path.clone(),
                message: format!("{e:#}"),
            };
            report.fail(entry.path.clone(), error);
        }
    }
}

/// Normalize with the configured external compressor.
pub fn normalize(config: &NormalizationConfig) -> ExitStatus {
    match TreeNormalizer::new(config.clone()) {
        Ok(normalizer) => normalizer.normalize(),
        Err(e) => {
            error!("{e}");
            ExitStatus::from_error(&e)
        }
    }
}

/// Normalize with a caller-supplied compressor.
pub fn normalize_with(config: &NormalizationConfig, compressor: Arc<dyn Compressor>) -> ExitStatus {
    match TreeNormalizer::with_compressor(config.clone(), compressor) {
        Ok(normalizer) => normalizer.normalize(),
        Err(e) => {
            error!("{e}");
            ExitStatus::from_error(&e)
        }
    }
}
