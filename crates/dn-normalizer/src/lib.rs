//! Documentation tree normalizer.
//!
//! Walks `root/<section>/<entry>` and leaves every page compressed with a
//! single algorithm:
//! - regular files lacking the target suffix are compressed in place
//! - symlinks get the suffix on both their name and their target
//! - symlinks that resolve to directories and `.keep*` sentinels are left alone

pub mod compressor;
pub mod normalizer;
pub mod report;

pub use compressor::{Compressor, ExternalCompressor};
pub use normalizer::{normalize, normalize_with, TreeNormalizer};
pub use report::{Action, EntryFailure, ExitStatus, NormalizationReport};
