use std::path::{Path, PathBuf};

use snafu::{Snafu, ensure};

use super::StructureNode;
use crate::ext::PathDisplayExt;

/// Calls `operation` with the path of every file leaf of `tree`, depth-first
/// in child order. Directories are descended into but never passed to
/// `operation`.
pub fn apply_to_tree(tree: &StructureNode, root: &Path, mut operation: impl FnMut(&Path)) {
    walk(tree, root, &mut operation);
}

fn walk(node: &StructureNode, path: &Path, operation: &mut dyn FnMut(&Path)) {
    match node {
        StructureNode::Directory { children } => {
            for (name, child) in children {
                walk(child, &path.join(name), operation);
            }
        }
        StructureNode::File { .. } => operation(path),
    }
}

/// Calls `operation` on `path` if it exists.
pub fn apply_to_path<T>(
    path: &Path,
    operation: impl FnOnce(&Path) -> T,
) -> Result<T, TraverseError> {
    ensure!(
        path.exists(),
        PathNotFoundSnafu {
            path: path.to_path_buf(),
        }
    );
    Ok(operation(path))
}

#[derive(Debug, Snafu)]
pub enum TraverseError {
    #[snafu(display("Path {} does not exist", path.best_effort_display()))]
    PathNotFound { path: PathBuf },
}
