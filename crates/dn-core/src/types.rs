use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Kind of a filesystem node, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    RegularFile,
    Symlink,
    /// Nested directory inside a section; listed but never normalized.
    Directory,
}

/// A node discovered while walking a section directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Section directory holding the entry.
    pub parent: PathBuf,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { path, kind, parent }
    }

    /// Raw file name; empty for paths without one.
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

/// Raw target of a symlink, kept byte-for-byte as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkTarget {
    pub raw: PathBuf,
}

impl SymlinkTarget {
    pub fn new(raw: impl Into<PathBuf>) -> Self {
        Self { raw: raw.into() }
    }

    /// Everything before the final component, if any.
    pub fn directory_part(&self) -> Option<&Path> {
        self.raw.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Final component. `None` when the target ends in `/` or `..`.
    pub fn file_part(&self) -> Option<&OsStr> {
        if self.has_trailing_slash() {
            return None;
        }
        self.raw.file_name()
    }

    /// `foo/` can only ever name a directory.
    pub fn has_trailing_slash(&self) -> bool {
        self.raw.as_os_str().as_encoded_bytes().last() == Some(&b'/')
    }

    /// Target resolved relative to the directory holding the link.
    /// Absolute targets are returned as-is.
    pub fn resolve_in(&self, section: &Path) -> PathBuf {
        section.join(&self.raw)
    }
}
