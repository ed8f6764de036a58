use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu, ensure};
use tracing::debug;

use super::{FileContent, StructureNode};
use crate::ext::PathDisplayExt;

/// Existence policies applied while materializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policies {
    /// Tolerate directories that already exist.
    pub exists_ok: bool,
    /// Replace files that already exist.
    pub overwrite: bool,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            exists_ok: true,
            overwrite: false,
        }
    }
}

/// Creates `path` and every missing ancestor.
///
/// Only an existing directory counts as a conflict. Anything else in the way
/// fails as an I/O error whatever `exists_ok` says.
pub fn create_directory(path: &Path, exists_ok: bool) -> Result<(), MaterializeError> {
    if path.is_dir() {
        ensure!(
            exists_ok,
            DirectoryConflictSnafu {
                path: path.to_path_buf(),
            }
        );
    }
    fs::create_dir_all(path).context(IoFailureSnafu {
        path: path.to_path_buf(),
    })?;
    debug!("Created directory {}", path.display());
    Ok(())
}

/// Writes `content` to `path` in full.
///
/// An existing file is removed first when `overwrite` is set. Without
/// `overwrite` an existing file is a conflict, unless it already holds exactly
/// `content`, in which case nothing is written. That exception departs from a
/// strict "existing file means conflict" rule so that writing the same tree
/// twice succeeds.
pub fn create_file(
    path: &Path,
    content: &FileContent,
    overwrite: bool,
) -> Result<(), MaterializeError> {
    if path.exists() {
        if overwrite {
            fs::remove_file(path).context(IoFailureSnafu {
                path: path.to_path_buf(),
            })?;
            debug!("Removed existing file {}", path.display());
        } else {
            ensure!(
                holds_content(path, content)?,
                FileConflictSnafu {
                    path: path.to_path_buf(),
                }
            );
            debug!("File {} is already up to date", path.display());
            return Ok(());
        }
    }
    fs::write(path, content.as_bytes()).context(IoFailureSnafu {
        path: path.to_path_buf(),
    })?;
    debug!(
        "Wrote {} bytes to {}",
        content.as_bytes().len(),
        path.display()
    );
    Ok(())
}

fn holds_content(path: &Path, content: &FileContent) -> Result<bool, MaterializeError> {
    let metadata = fs::metadata(path).context(IoFailureSnafu {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() || metadata.len() != content.as_bytes().len() as u64 {
        return Ok(false);
    }
    let existing = fs::read(path).context(IoFailureSnafu {
        path: path.to_path_buf(),
    })?;
    Ok(existing == content.as_bytes())
}

/// Writes `tree` below `root`, depth-first in child order.
///
/// Every directory is created before any of its children. The walk stops at
/// the first failure and leaves whatever was already written in place.
pub fn create_structure(
    tree: &StructureNode,
    root: &Path,
    policies: Policies,
) -> Result<(), MaterializeError> {
    match tree {
        StructureNode::Directory { children } => {
            for (name, child) in children {
                let path = root.join(name);
                match child {
                    StructureNode::Directory { .. } => {
                        create_directory(&path, policies.exists_ok)?;
                        create_structure(child, &path, policies)?;
                    }
                    StructureNode::File { content } => {
                        create_file(&path, content, policies.overwrite)?;
                    }
                }
            }
            Ok(())
        }
        StructureNode::File { content } => create_file(root, content, policies.overwrite),
    }
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Directory {} already exists", path.best_effort_display()))]
    DirectoryConflict { path: PathBuf },
    #[snafu(display("File {} already exists", path.best_effort_display()))]
    FileConflict { path: PathBuf },
    #[snafu(display("Filesystem operation failed on {}", path.best_effort_display()))]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MaterializeError {
    /// The path the failure originated from.
    pub fn path(&self) -> &Path {
        match self {
            MaterializeError::DirectoryConflict { path }
            | MaterializeError::FileConflict { path }
            | MaterializeError::IoFailure { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    fn sample() -> StructureNode {
        StructureNode::directory([
            (
                "a",
                StructureNode::directory([
                    ("b.txt", StructureNode::file("x")),
                    ("deep", StructureNode::directory([("c", StructureNode::root())])),
                ]),
            ),
            ("c.txt", StructureNode::file("y")),
            ("raw.bin", StructureNode::file(vec![0u8, 255])),
        ])
    }

    #[test]
    fn test_create_directory_creates_ancestors() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("one/two/three");

        create_directory(&path, false).expect("Failed to create directory");

        assert!(path.is_dir());
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_create_directory_respects_exists_ok(#[case] exists_ok: bool, #[case] succeeds: bool) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("existing");
        fs::create_dir(&path).expect("Failed to create directory");

        let result = create_directory(&path, exists_ok);

        assert_eq!(result.is_ok(), succeeds);
        if !succeeds {
            assert!(matches!(
                result,
                Err(MaterializeError::DirectoryConflict { .. })
            ));
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_create_directory_over_file_is_io_failure(#[case] exists_ok: bool) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("file");
        fs::write(&path, "x").expect("Failed to write file");

        let result = create_directory(&path, exists_ok);

        match result {
            Err(MaterializeError::IoFailure { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected IoFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_create_file_writes_text_as_bytes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("note.txt");

        create_file(&path, &FileContent::from("special chars: äöü🚀"), false)
            .expect("Failed to create file");

        assert_eq!(
            fs::read(&path).unwrap(),
            "special chars: äöü🚀".as_bytes().to_vec()
        );
    }

    #[test]
    fn test_create_file_conflict_leaves_bytes_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("note.txt");
        fs::write(&path, "original").expect("Failed to write file");

        let result = create_file(&path, &FileContent::from("replacement"), false);

        assert!(matches!(result, Err(MaterializeError::FileConflict { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_create_file_overwrite_replaces_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("note.txt");
        fs::write(&path, "a much longer original").expect("Failed to write file");

        create_file(&path, &FileContent::from("short"), true).expect("Failed to overwrite");

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_create_file_with_identical_content_is_no_op() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("note.txt");
        fs::write(&path, "same").expect("Failed to write file");

        create_file(&path, &FileContent::from("same"), false).expect("Identical content failed");

        assert_eq!(fs::read_to_string(&path).unwrap(), "same");
    }

    #[test]
    fn test_create_file_in_missing_directory_is_io_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing/note.txt");

        let result = create_file(&path, &FileContent::from("x"), false);

        assert!(matches!(result, Err(MaterializeError::IoFailure { .. })));
        assert_eq!(result.unwrap_err().path(), path);
    }

    #[test]
    fn test_create_structure_writes_whole_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        create_structure(&sample(), root, Policies::default()).expect("Failed to materialize");

        assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "x");
        assert_eq!(fs::read_to_string(root.join("c.txt")).unwrap(), "y");
        assert_eq!(fs::read(root.join("raw.bin")).unwrap(), vec![0u8, 255]);
        assert!(root.join("a/deep/c").is_dir());
    }

    #[test]
    fn test_create_structure_twice_is_stable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let policies = Policies {
            exists_ok: true,
            overwrite: false,
        };

        create_structure(&sample(), root, policies).expect("First run failed");
        create_structure(&sample(), root, policies).expect("Second run failed");

        assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "x");
        assert_eq!(fs::read_dir(root).unwrap().count(), 3);
    }

    #[test]
    fn test_create_structure_stops_at_first_failure_without_rollback() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("second.txt"), "existing").expect("Failed to write file");
        let tree = StructureNode::directory([
            ("first.txt", StructureNode::file("1")),
            ("second.txt", StructureNode::file("2")),
            ("third.txt", StructureNode::file("3")),
        ]);

        let result = create_structure(&tree, root, Policies::default());

        assert!(matches!(result, Err(MaterializeError::FileConflict { .. })));
        assert!(root.join("first.txt").exists());
        assert!(!root.join("third.txt").exists());
        assert_eq!(fs::read_to_string(root.join("second.txt")).unwrap(), "existing");
    }

    #[test]
    fn test_create_structure_applies_policies_to_nested_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/deep")).expect("Failed to create directories");
        let policies = Policies {
            exists_ok: true,
            overwrite: true,
        };
        fs::write(root.join("a/b.txt"), "stale").expect("Failed to write file");

        create_structure(&sample(), root, policies).expect("Failed to materialize");

        assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "x");
    }

    #[test]
    fn test_error_display_contains_path() {
        let error = MaterializeError::FileConflict {
            path: PathBuf::from("/this/path/does/not/exist.txt"),
        };
        let message = error.to_string();
        assert!(message.contains("already exists"));
        assert!(message.contains("/this/path/does/not/exist.txt"));
    }
}
