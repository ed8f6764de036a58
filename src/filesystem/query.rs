use std::path::{Path, PathBuf};

use glob::Pattern;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

/// Matches `pattern` below `root`.
///
/// Supports `*`, `?` and recursive `**` segments. Results come back in the
/// order the filesystem enumerates them.
pub fn search(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, QueryError> {
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let full_pattern = Path::new(&escaped_root)
        .join(pattern)
        .to_string_lossy()
        .into_owned();
    debug!("Searching with pattern {}", full_pattern);

    let paths = glob::glob(&full_pattern)
        .context(PatternSnafu { pattern })?
        .collect::<Result<Vec<_>, _>>()
        .context(GlobSnafu)?;
    debug!("Pattern {} matched {} paths", pattern, paths.len());
    Ok(paths)
}

/// Resolves `relative` against `root`. A missing path is reported as a
/// warning and yields `None`.
pub fn get(root: &Path, relative: impl AsRef<Path>) -> Option<PathBuf> {
    let target = root.join(relative.as_ref());
    if target.exists() {
        Some(target)
    } else {
        warn!("Path {} does not exist", relative.as_ref().display());
        None
    }
}

#[derive(Debug, Snafu)]
pub enum QueryError {
    #[snafu(display("Invalid search pattern '{}'", pattern))]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[snafu(display("Failed to read a path while searching"))]
    Glob { source: glob::GlobError },
}
