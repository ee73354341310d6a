//! docnorm: bring installed documentation pages to one compression state.
//!
//! ```bash
//! DOCNORM_COMPRESS=xz DOCNORM_COMPRESS_SUFFIX=xz docnorm image/usr/share/man
//! docnorm --config docnorm.json --dry-run
//! ```

use clap::{ArgAction, Parser};
use dn_core::{DnError, NormalizationConfig};
use dn_normalizer::{ExitStatus, TreeNormalizer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docnorm")]
#[command(about = "Compress documentation pages and fix the symlinks pointing at them", long_about = None)]
#[command(version)]
struct Cli {
    /// Documentation roots holding section directories (default: /usr/share/man)
    #[arg(value_name = "ROOT")]
    roots: Vec<PathBuf>,

    /// JSON config file; other options override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Compressor executable
    #[arg(long, env = "DOCNORM_COMPRESS", value_name = "COMMAND")]
    compress: Option<String>,

    /// Flags passed to the compressor, whitespace separated
    #[arg(long, env = "DOCNORM_COMPRESS_FLAGS", value_name = "FLAGS", allow_hyphen_values = true)]
    compress_flags: Option<String>,

    /// Suffix the compressor produces (gz, bz2, xz, ...)
    #[arg(long, env = "DOCNORM_COMPRESS_SUFFIX", value_name = "SUFFIX")]
    suffix: Option<String>,

    /// The compressor choice was already announced; skip the banner
    #[arg(long, env = "DOCNORM_COMPRESS_ANNOUNCED")]
    announced: bool,

    /// Exit non-zero when the compressor fails on any file
    #[arg(long)]
    strict: bool,

    /// Report what would change without touching the tree
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> dn_core::Result<NormalizationConfig> {
        let mut config = match &self.config {
            Some(path) => NormalizationConfig::load(path)?,
            None => NormalizationConfig::default(),
        };
        if !self.roots.is_empty() {
            config.root_directories = self.roots;
        }
        if let Some(command) = self.compress {
            config.compression_command = command;
        }
        if let Some(flags) = self.compress_flags {
            config.compression_flags = flags.split_whitespace().map(String::from).collect();
        }
        if let Some(suffix) = self.suffix {
            config.target_suffix = suffix;
        }
        config.announced |= self.announced;
        config.strict |= self.strict;
        config.dry_run |= self.dry_run;
        Ok(config)
    }
}

/// Filter used when `RUST_LOG` is unset. Action lines already go to stdout,
/// so tracing stays at `warn` unless asked for more.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_tracing(verbose: u8) {
    let default = default_filter(verbose);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(err: DnError) -> ExitCode {
    error!("{err}");
    eprintln!("docnorm: {err}");
    ExitStatus::from_error(&err).into()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => return fail(e),
    };
    let strict = config.strict;
    let normalizer = match TreeNormalizer::new(config) {
        Ok(normalizer) => normalizer,
        Err(e) => return fail(e),
    };

    match normalizer.run() {
        Ok(report) => {
            if let Some(banner) = &report.banner {
                println!("{banner}");
            }
            for line in report.log_lines() {
                println!("{line}");
            }
            for failure in &report.failures {
                eprintln!("docnorm: {}: {}", failure.path.display(), failure.error);
            }
            info!(
                scanned = report.roots_scanned,
                skipped = report.roots_skipped,
                compressed = report.compressed(),
                links = report.links_fixed(),
                "normalization finished"
            );
            report.exit_status(strict).into()
        }
        Err(e) => fail(e),
    }
}
