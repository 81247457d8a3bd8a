//! Filesystem helpers for the courier tooling, built on `cap-std` and `camino`.
//!
//! Every helper resolves an ambient directory once and performs the actual IO
//! relative to it, so callers work with UTF-8 paths throughout.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open an existing UTF-8 file for reading.
///
/// # Errors
///
/// Returns the underlying IO error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Report whether `path` names a regular file.
///
/// Directories and other entry kinds yield `Ok(false)`.
///
/// # Errors
///
/// Returns [`io::ErrorKind::NotFound`] when nothing exists at `path`, and the
/// underlying IO error when the entry cannot be inspected.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// Paths without a parent, or whose parent is the filesystem root, need no
/// work.
///
/// # Errors
///
/// Returns the underlying IO error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, relative) = split_anchor(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

/// Split `path` into the directory capability is granted on and the remainder
/// below it.
///
/// The anchor keeps any drive prefix, root and leading `.`/`..` components, so
/// the remainder never escapes it.
fn split_anchor(path: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_)
            | Utf8Component::RootDir
            | Utf8Component::CurDir
            | Utf8Component::ParentDir
                if relative.as_str().is_empty() =>
            {
                anchor.push(component.as_str());
            }
            other => relative.push(other.as_str()),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, relative)
}

#[cfg(test)]
mod tests {
    //! Unit tests for the ambient filesystem helpers.

    use super::*;
    use rstest::rstest;
    use std::io::Read;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        (tmp, root)
    }

    #[rstest]
    #[case::relative("data/db/courier.sqlite", ".", "data/db")]
    #[case::bare("courier.sqlite", ".", "")]
    #[case::absolute("/var/lib/courier/db.sqlite", "/", "var/lib/courier")]
    #[case::parent("../shared/db.sqlite", "..", "shared")]
    #[case::current("./db.sqlite", ".", "")]
    fn split_anchor_keeps_leading_components(
        #[case] path: &str,
        #[case] anchor: &str,
        #[case] relative: &str,
    ) {
        let parent = Utf8Path::new(path).parent().expect("has parent");
        let (got_anchor, got_relative) = split_anchor(parent);
        assert_eq!(got_anchor, Utf8PathBuf::from(anchor));
        assert_eq!(got_relative, Utf8PathBuf::from(relative));
    }

    #[rstest]
    fn ensure_parent_dir_creates_nested_directories() {
        let (_tmp, root) = workspace();
        let target = root.join("a/b/c/courier.sqlite");

        ensure_parent_dir(&target).expect("directories created");

        assert!(root.join("a/b/c").is_dir());
        assert!(!target.exists());
    }

    #[rstest]
    fn ensure_parent_dir_accepts_existing_directories() {
        let (_tmp, root) = workspace();
        let target = root.join("courier.sqlite");
        ensure_parent_dir(&target).expect("existing parent is fine");
        ensure_parent_dir(&target).expect("second call is a no-op");
    }

    #[rstest]
    fn is_regular_file_distinguishes_entry_kinds() {
        let (_tmp, root) = workspace();
        let file = root.join("dataset.json");
        std::fs::write(&file, b"{}").expect("write file");
        std::fs::create_dir(root.join("nested")).expect("create dir");

        assert!(is_regular_file(&file).expect("file inspected"));
        assert!(!is_regular_file(&root.join("nested")).expect("dir inspected"));
        let missing = is_regular_file(&root.join("missing.json")).expect_err("missing entry");
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn open_utf8_file_reads_contents() {
        let (_tmp, root) = workspace();
        let file = root.join("dataset.json");
        std::fs::write(&file, b"{\"drivers\": []}").expect("write file");

        let mut contents = String::new();
        open_utf8_file(&file)
            .expect("file opens")
            .read_to_string(&mut contents)
            .expect("file reads");
        assert_eq!(contents, "{\"drivers\": []}");
    }
}
