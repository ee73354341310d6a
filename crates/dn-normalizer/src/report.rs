//! Action log and exit status of a normalization pass.

use dn_core::DnError;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// A single mutation, planned or performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LinkFixed { link: PathBuf, target: PathBuf },
    LinkRemoved { link: PathBuf },
    Compressing { file: PathBuf },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkFixed { link, target } => {
                write!(f, "link fixed: {} -> {}", link.display(), target.display())
            }
            Self::LinkRemoved { link } => write!(f, "link removed: {}", link.display()),
            Self::Compressing { file } => write!(f, "compressing: {}", file.display()),
        }
    }
}

/// A per-entry failure that was absorbed so siblings could continue.
#[derive(Debug)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub error: DnError,
}

#[derive(Debug, Default)]
pub struct NormalizationReport {
    pub banner: Option<String>,
    pub actions: Vec<Action>,
    pub failures: Vec<EntryFailure>,
    pub roots_scanned: usize,
    pub roots_skipped: usize,
    pub dry_run: bool,
}

impl NormalizationReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, action: Action) {
        if self.dry_run {
            info!("would {action}");
        } else {
            info!("{action}");
        }
        self.actions.push(action);
    }

    pub(crate) fn fail(&mut self, path: PathBuf, error: DnError) {
        self.failures.push(EntryFailure { path, error });
    }

    /// Nothing changed and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty() && self.failures.is_empty()
    }

    /// One human-readable line per action, in traversal order.
    pub fn log_lines(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }

    pub fn compressed(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::Compressing { .. }))
            .count()
    }

    pub fn links_fixed(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::LinkFixed { .. }))
            .count()
    }

    /// Failures only affect the status in strict mode.
    pub fn exit_status(&self, strict: bool) -> ExitStatus {
        if strict && !self.failures.is_empty() {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

/// Outcome of a pass as seen by the invoking process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    ConfigurationError,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::ConfigurationError => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn from_error(err: &DnError) -> Self {
        if err.is_configuration() {
            Self::ConfigurationError
        } else {
            Self::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_lines() {
        let fixed = Action::LinkFixed {
            link: PathBuf::from("/m/man1/bar.1.gz"),
            target: "foo.1.gz".into(),
        };
        assert_eq!(fixed.to_string(), "link fixed: /m/man1/bar.1.gz -> foo.1.gz");
        let removed = Action::LinkRemoved { link: PathBuf::from("/m/man1/bar.1") };
        assert_eq!(removed.to_string(), "link removed: /m/man1/bar.1");
        let comp = Action::Compressing { file: PathBuf::from("/m/man1/foo.1") };
        assert_eq!(comp.to_string(), "compressing: /m/man1/foo.1");
    }

    #[test]
    fn test_counts_and_clean() {
        let mut report = NormalizationReport::new(false);
        assert!(report.is_clean());
        report.record(Action::Compressing { file: "a.1".into() });
        report.record(Action::LinkFixed { link: "b.1.gz".into(), target: "a.1.gz".into() });
        report.record(Action::LinkRemoved { link: "b.1".into() });
        assert!(!report.is_clean());
        assert_eq!(report.compressed(), 1);
        assert_eq!(report.links_fixed(), 1);
        assert_eq!(report.log_lines().len(), 3);
    }

    #[test]
    fn test_exit_status_strictness() {
        let mut report = NormalizationReport::new(false);
        report.fail(
            "a.1".into(),
            DnError::ToolFailure {
                path: "a.1".into(),
                message: "gzip exited with 1".into(),
            },
        );
        assert_eq!(report.exit_status(false), ExitStatus::Success);
        assert_eq!(report.exit_status(true), ExitStatus::Failure);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Failure.code(), 1);
        assert_eq!(ExitStatus::ConfigurationError.code(), 2);
        assert_eq!(ExitStatus::from_error(&DnError::MissingSuffix), ExitStatus::ConfigurationError);
        assert_eq!(
            ExitStatus::from_error(&DnError::Storage("ls".into())),
            ExitStatus::Failure
        );
    }
}
