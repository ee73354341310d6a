//! Symlink inspection and replacement.

use dn_core::error::{DnError, Result};
use dn_core::types::SymlinkTarget;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of placeholder entries that keep otherwise-empty directories alive.
pub const SENTINEL_PREFIX: &str = ".keep";

/// Marker between the link name and the pid in a staging link name.
const STAGING_MARKER: &[u8] = b".docnorm-";

/// Whether a file name marks a sentinel entry.
pub fn is_sentinel(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(SENTINEL_PREFIX.as_bytes())
}

/// Whether a file name is a staging link left behind by an interrupted
/// [`replace_symlink`]: `.<name>.docnorm-<pid>`.
pub fn is_staging(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    if !bytes.starts_with(b".") {
        return false;
    }
    let Some(at) = bytes
        .windows(STAGING_MARKER.len())
        .rposition(|w| w == STAGING_MARKER)
    else {
        return false;
    };
    let pid = &bytes[at + STAGING_MARKER.len()..];
    at > 0 && !pid.is_empty() && pid.iter().all(u8::is_ascii_digit)
}

/// Read the literal target of a symlink, byte for byte.
pub fn read_target(link: &Path) -> Result<SymlinkTarget> {
    let target = fs::read_link(link)
        .map_err(|e| DnError::Storage(format!("readlink {}: {e}", link.display())))?;
    Ok(SymlinkTarget::new(target))
}

/// Whether `target` names a directory: either it ends in `/`, or it resolves
/// from the link's own directory to an existing directory (following links).
pub fn is_directory_alias(section: &Path, target: &SymlinkTarget) -> bool {
    target.has_trailing_slash() || target.resolve_in(section).is_dir()
}

/// Temporary sibling used while swapping a link into place.
fn staging_path(link: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(link.file_name().unwrap_or_default());
    name.push(format!(".docnorm-{}", std::process::id()));
    link.with_file_name(name)
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks are only supported on unix",
    ))
}

/// Point `link` at `target`, overwriting whatever is at `link`.
///
/// The new link is created beside the destination and renamed over it, so
/// the destination path is never missing.
pub fn replace_symlink(link: &Path, target: &Path) -> Result<()> {
    let staging = staging_path(link);
    if fs::symlink_metadata(&staging).is_ok() {
        fs::remove_file(&staging)
            .map_err(|e| DnError::Storage(format!("rm {}: {e}", staging.display())))?;
    }
    make_symlink(target, &staging).map_err(|e| {
        DnError::Storage(format!("ln -s {} {}: {e}", target.display(), staging.display()))
    })?;
    if let Err(e) = fs::rename(&staging, link) {
        let _ = fs::remove_file(&staging);
        return Err(DnError::Storage(format!("rename to {}: {e}", link.display())));
    }
    Ok(())
}

/// Remove a symlink without touching what it points at.
pub fn remove_link(link: &Path) -> Result<()> {
    fs::remove_file(link).map_err(|e| DnError::Storage(format!("rm {}: {e}", link.display())))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn os(name: &str) -> &OsStr {
        OsStr::new(name)
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel(os(".keep")));
        assert!(is_sentinel(os(".keepme")));
        assert!(is_sentinel(os(".keep_app-misc_foo-0")));
        assert!(is_sentinel(OsStr::from_bytes(b".keep\xff")));
        assert!(!is_sentinel(os("keep.1")));
        assert!(!is_sentinel(os(".kee")));
    }

    #[test]
    fn test_is_staging() {
        assert!(is_staging(os(".bar.1.docnorm-123")));
        assert!(is_staging(os(".bar.1.gz.docnorm-4")));
        assert!(is_staging(OsStr::from_bytes(b".alias\xe9.1.gz.docnorm-77")));
        assert!(!is_staging(os("bar.1.docnorm-123")));
        assert!(!is_staging(os(".bar.1.docnorm-")));
        assert!(!is_staging(os(".bar.1.docnorm-12a")));
        assert!(!is_staging(os(".docnorm-12")));
        assert!(!is_staging(os("foo.1")));
    }

    #[test]
    fn test_staging_path_matches_is_staging() {
        let staging = staging_path(Path::new(OsStr::from_bytes(b"/m/man1/caf\xe9.1.gz")));
        let name = staging.file_name().unwrap();
        assert!(is_staging(name));
        assert!(name.as_bytes().starts_with(b".caf\xe9.1.gz.docnorm-"));
    }

    #[test]
    fn test_read_target() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("bar.1");
        symlink("../man3/foo.3", &link).unwrap();
        let t = read_target(&link).unwrap();
        assert_eq!(t.raw, PathBuf::from("../man3/foo.3"));
        assert_eq!(t.file_part(), Some(os("foo.3")));
    }

    #[test]
    fn test_read_target_keeps_non_utf8_bytes() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("bar.1");
        symlink(OsStr::from_bytes(b"caf\xe9.1"), &link).unwrap();
        let t = read_target(&link).unwrap();
        assert_eq!(t.raw.as_os_str().as_bytes(), b"caf\xe9.1");
    }

    #[test]
    fn test_read_target_not_a_link() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.1");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(read_target(&file), Err(DnError::Storage(_))));
    }

    #[test]
    fn test_directory_alias() {
        let tmp = TempDir::new().unwrap();
        let man = tmp.path();
        fs::create_dir(man.join("en")).unwrap();
        fs::write(man.join("page.1"), b"x").unwrap();
        assert!(is_directory_alias(man, &SymlinkTarget::new("en")));
        assert!(!is_directory_alias(man, &SymlinkTarget::new("page.1")));
        assert!(!is_directory_alias(man, &SymlinkTarget::new("missing")));
    }

    #[test]
    fn test_directory_alias_trailing_slash_and_absolute() {
        let tmp = TempDir::new().unwrap();
        let man = tmp.path().join("man1");
        fs::create_dir(&man).unwrap();
        let outside = TempDir::new().unwrap();

        assert!(is_directory_alias(&man, &SymlinkTarget::new("missing/")));
        assert!(is_directory_alias(&man, &SymlinkTarget::new(outside.path())));
        assert!(!is_directory_alias(&man, &SymlinkTarget::new(outside.path().join("x.1"))));
    }

    #[test]
    fn test_replace_symlink_new_and_overwrite() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("bar.1.gz");
        replace_symlink(&link, Path::new("foo.1.gz")).unwrap();
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("foo.1.gz"));

        replace_symlink(&link, Path::new("baz.1.gz")).unwrap();
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("baz.1.gz"));

        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["bar.1.gz"]);
    }

    #[test]
    fn test_replace_symlink_non_utf8() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join(OsStr::from_bytes(b"alias\xe9.1.gz"));
        let target = Path::new(OsStr::from_bytes(b"caf\xe9.1.gz"));
        replace_symlink(&link, target).unwrap();
        assert_eq!(fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn test_remove_link_keeps_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("foo.1");
        fs::write(&target, b"x").unwrap();
        let link = tmp.path().join("bar.1");
        symlink("foo.1", &link).unwrap();
        remove_link(&link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.exists());
    }
}
