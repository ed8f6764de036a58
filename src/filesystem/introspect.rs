use std::fs;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use super::{FileContent, StructureNode};
use crate::ext::PathDisplayExt;

/// Reads the directory tree below `root` into a canonical tree.
///
/// File contents are never read: every file becomes a leaf holding the empty
/// placeholder content, so writing a tree and reading it back only preserves
/// its shape. Symbolic links and hidden entries follow the same rule as any
/// other entry. A missing root reads as an empty directory. An entry whose
/// name is not valid UTF-8 fails the whole read.
pub fn read_structure(root: &Path) -> Result<StructureNode, IntrospectError> {
    if !root.exists() {
        debug!("Root {} does not exist, reading it as empty", root.display());
        return Ok(StructureNode::root());
    }
    let children = read_children(root)?;
    debug!(
        "Introspected {} entries under {}",
        children.len(),
        root.display()
    );
    Ok(StructureNode::Directory { children })
}

fn read_children(dir: &Path) -> Result<LinkedHashMap<String, StructureNode>, IntrospectError> {
    let mut children = LinkedHashMap::new();
    let entries = fs::read_dir(dir).context(ReadDirSnafu {
        path: dir.to_path_buf(),
    })?;

    for entry in entries {
        let entry = entry.context(ReadDirSnafu {
            path: dir.to_path_buf(),
        })?;
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            return NonUnicodeNameSnafu { path }.fail();
        };

        let node = if path.is_dir() {
            StructureNode::Directory {
                children: read_children(&path)?,
            }
        } else {
            StructureNode::File {
                content: FileContent::default(),
            }
        };
        children.insert(name, node);
    }

    Ok(children)
}

#[derive(Debug, Snafu)]
pub enum IntrospectError {
    #[snafu(display("Failed to read directory {}", path.best_effort_display()))]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Entry name of {} is not valid UTF-8", path.best_effort_display()))]
    NonUnicodeName { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::filesystem::{Policies, create_structure};

    #[test]
    fn test_round_trip_keeps_shape_but_not_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = StructureNode::directory([
            (
                "a",
                StructureNode::directory([
                    ("b.txt", StructureNode::file("x")),
                    ("empty", StructureNode::root()),
                ]),
            ),
            ("c.bin", StructureNode::file(vec![1u8, 2, 3])),
        ]);
        create_structure(&tree, temp_dir.path(), Policies::default())
            .expect("Failed to materialize");

        let read_back = read_structure(temp_dir.path()).expect("Failed to introspect");

        assert!(read_back.same_shape(&tree));
        let leaves = [
            read_back.child("a").and_then(|a| a.child("b.txt")),
            read_back.child("c.bin"),
        ];
        for leaf in leaves {
            let content = leaf.and_then(StructureNode::content).unwrap();
            assert!(content.is_empty());
        }
    }

    #[test]
    fn test_hidden_entries_are_included() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join(".hidden"), "secret").unwrap();
        fs::create_dir(temp_dir.path().join(".config")).unwrap();

        let tree = read_structure(temp_dir.path()).expect("Failed to introspect");

        assert!(tree.child(".hidden").is_some_and(StructureNode::is_file));
        assert!(tree.child(".config").is_some_and(StructureNode::is_directory));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_follow_their_target_kind() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("root");
        fs::create_dir_all(root.join("real_dir")).unwrap();
        fs::write(root.join("real_file"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("real_dir"), root.join("dir_link")).unwrap();
        std::os::unix::fs::symlink(root.join("real_file"), root.join("file_link")).unwrap();

        let tree = read_structure(&root).expect("Failed to introspect");

        assert!(tree.child("dir_link").is_some_and(StructureNode::is_directory));
        assert!(tree.child("file_link").is_some_and(StructureNode::is_file));
    }

    #[test]
    fn test_missing_root_reads_as_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let tree = read_structure(&temp_dir.path().join("nope")).expect("Failed to introspect");

        assert_eq!(tree, StructureNode::root());
    }

    #[test]
    fn test_file_root_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file");
        fs::write(&file, "x").unwrap();

        let result = read_structure(&file);

        assert!(matches!(result, Err(IntrospectError::ReadDir { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_unicode_names_are_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = OsStr::from_bytes(b"a\xff");
        fs::write(temp_dir.path().join(name), "x").unwrap();
        fs::write(temp_dir.path().join(OsStr::from_bytes(b"a\xfe")), "y").unwrap();

        let result = read_structure(temp_dir.path());

        match result {
            Err(IntrospectError::NonUnicodeName { path }) => {
                assert_eq!(path.parent(), Some(temp_dir.path()));
                assert!(path.file_name().unwrap().to_str().is_none());
            }
            other => panic!("Expected NonUnicodeName, got {other:?}"),
        }
    }
}
