//! DocTree: two-level view of a documentation root.
//!
//! A root holds section directories (`man1`, `man3`, ...), each of which
//! holds the pages and links the normalizer works on. Deeper nesting is
//! never visited.

use crate::links::{is_sentinel, is_staging};
use dn_core::error::{DnError, Result};
use dn_core::types::{Entry, EntryKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local-filesystem-backed documentation root.
#[derive(Debug, Clone)]
pub struct DocTree {
    root: PathBuf,
}

impl DocTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the root exists as a directory. A missing root is a valid,
    /// empty tree.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Immediate subdirectories of the root, sorted by name.
    ///
    /// Symlinks to directories are not sections.
    pub fn sections(&self) -> Result<Vec<PathBuf>> {
        let mut sections = Vec::new();
        let rd = fs::read_dir(&self.root)
            .map_err(|e| DnError::Storage(format!("ls {}: {e}", self.root.display())))?;
        for entry in rd {
            let entry = entry.map_err(|e| DnError::Storage(format!("ls entry: {e}")))?;
            let file_type = entry
                .file_type()
                .map_err(|e| DnError::Storage(format!("stat {}: {e}", entry.path().display())))?;
            if file_type.is_dir() {
                sections.push(entry.path());
            }
        }
        sections.sort();
        Ok(sections)
    }

    /// Files, symlinks and nested directories directly inside `section`,
    /// sorted by name.
    ///
    /// Sentinel entries, leftover staging links and special files are left
    /// out. Nested directories are listed but never descended into.
    pub fn entries(&self, section: &Path) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let rd = fs::read_dir(section)
            .map_err(|e| DnError::Storage(format!("ls {}: {e}", section.display())))?;
        for entry in rd {
            let entry = entry.map_err(|e| DnError::Storage(format!("ls entry: {e}")))?;
            let name = entry.file_name();
            if is_sentinel(&name) || is_staging(&name) {
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|e| DnError::Storage(format!("stat {}: {e}", entry.path().display())))?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_file() {
                EntryKind::RegularFile
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                continue;
            };
            entries.push(Entry::new(entry.path(), kind));
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(section = %section.display(), count = entries.len(), "listed section");
        Ok(entries)
    }
}
