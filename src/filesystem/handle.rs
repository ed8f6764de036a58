use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

use super::introspect::IntrospectError;
use super::materialize::MaterializeError;
use super::normalize::NormalizeError;
use super::query::QueryError;
use super::traverse::TraverseError;
use super::{
    Description, FileContent, Policies, StructureNode, apply_to_path, apply_to_tree,
    create_directory, create_file, create_structure, normalize, query, read_structure,
};

/// Where the cached tree of a [`TreeHandle`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HandleState {
    /// Holds a normalized description that has not been written.
    #[display("uninitialized")]
    Uninitialized,
    /// Holds the normalized description that was just written.
    #[display("materialized")]
    Materialized,
    /// Holds a tree read from an existing root, nothing was written.
    #[display("introspected")]
    Introspected,
    /// Holds a tree re-read from disk after a write or a query.
    #[display("synchronized")]
    Synchronized,
}

/// Construction options for [`TreeHandle::with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleOptions {
    pub exists_ok: bool,
    pub overwrite: bool,
    /// Materialize the description right away.
    pub create_mode: bool,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            exists_ok: true,
            overwrite: false,
            create_mode: true,
        }
    }
}

impl HandleOptions {
    pub fn policies(&self) -> Policies {
        Policies {
            exists_ok: self.exists_ok,
            overwrite: self.overwrite,
        }
    }
}

/// Binds a canonical tree to a root directory and default policies.
///
/// Every call that writes re-reads the tree from disk afterwards, and so do
/// [`TreeHandle::search`] and [`TreeHandle::get`]. The cached tree is replaced
/// as a whole, never patched.
#[derive(Debug, Clone)]
pub struct TreeHandle {
    tree: StructureNode,
    root: PathBuf,
    policies: Policies,
    state: HandleState,
}

impl TreeHandle {
    /// Normalizes `description` and materializes it under `root` with the
    /// default policies.
    pub fn new(description: &Description, root: impl Into<PathBuf>) -> Result<Self, TreeHandleError> {
        Self::with_options(description, root, HandleOptions::default())
    }

    pub fn with_options(
        description: &Description,
        root: impl Into<PathBuf>,
        options: HandleOptions,
    ) -> Result<Self, TreeHandleError> {
        let tree = normalize(description).context(NormalizeSnafu)?;
        let mut handle = Self {
            tree,
            root: root.into(),
            policies: options.policies(),
            state: HandleState::Uninitialized,
        };
        if options.create_mode {
            handle.materialize()?;
        }
        Ok(handle)
    }

    /// Reads the tree of an existing root without writing anything.
    pub fn from_path(root: impl Into<PathBuf>, policies: Policies) -> Result<Self, TreeHandleError> {
        let root = root.into();
        let tree = read_structure(&root).context(IntrospectSnafu)?;
        info!("Opened tree handle on {}", root.display());
        Ok(Self {
            tree,
            root,
            policies,
            state: HandleState::Introspected,
        })
    }

    /// Writes the cached tree under the root. Used for deferred handles.
    pub fn materialize(&mut self) -> Result<(), TreeHandleError> {
        create_directory(&self.root, true).context(MaterializeSnafu)?;
        create_structure(&self.tree, &self.root, self.policies).context(MaterializeSnafu)?;
        info!("Materialized tree under {}", self.root.display());
        self.state = HandleState::Materialized;
        Ok(())
    }

    /// Replaces the cached tree with the current state of the root.
    pub fn sync(&mut self) -> Result<&StructureNode, TreeHandleError> {
        self.tree = read_structure(&self.root).context(IntrospectSnafu)?;
        self.state = HandleState::Synchronized;
        Ok(&self.tree)
    }

    /// The current tree, re-read from disk.
    pub fn structure(&mut self) -> Result<&StructureNode, TreeHandleError> {
        self.sync()
    }

    /// The cached tree, as of the last write or synchronization.
    pub fn tree(&self) -> &StructureNode {
        &self.tree
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policies(&self) -> Policies {
        self.policies
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Materializes `description` under the root with the default policies.
    pub fn create_structure(&mut self, description: &Description) -> Result<(), TreeHandleError> {
        self.create_structure_with(description, None, None, None)
    }

    /// Materializes `description` under `target` (default: the root). Unset
    /// policies fall back to the handle's defaults.
    pub fn create_structure_with(
        &mut self,
        description: &Description,
        target: Option<&Path>,
        exists_ok: Option<bool>,
        overwrite: Option<bool>,
    ) -> Result<(), TreeHandleError> {
        let tree = normalize(description).context(NormalizeSnafu)?;
        let target = target.map_or_else(|| self.root.clone(), |path| self.resolve(path));
        let policies = Policies {
            exists_ok: exists_ok.unwrap_or(self.policies.exists_ok),
            overwrite: overwrite.unwrap_or(self.policies.overwrite),
        };
        info!(
            "Creating structure of {} entries under {}",
            tree.len(),
            target.display()
        );

        create_directory(&target, true).context(MaterializeSnafu)?;
        let result = create_structure(&tree, &target, policies).context(MaterializeSnafu);
        self.sync_after_write(result)
    }

    /// Creates a directory, relative paths being resolved against the root.
    pub fn create_directory(
        &mut self,
        path: impl AsRef<Path>,
        exists_ok: Option<bool>,
    ) -> Result<(), TreeHandleError> {
        let path = self.resolve(path.as_ref());
        let result = create_directory(&path, exists_ok.unwrap_or(self.policies.exists_ok))
            .context(MaterializeSnafu);
        self.sync_after_write(result)
    }

    /// Creates a file, relative paths being resolved against the root.
    pub fn create_file(
        &mut self,
        path: impl AsRef<Path>,
        content: impl Into<FileContent>,
        overwrite: Option<bool>,
    ) -> Result<(), TreeHandleError> {
        let path = self.resolve(path.as_ref());
        let result = create_file(
            &path,
            &content.into(),
            overwrite.unwrap_or(self.policies.overwrite),
        )
        .context(MaterializeSnafu);
        self.sync_after_write(result)
    }

    /// Calls `operation` on the path `relative` to the root, if it exists.
    pub fn apply<T>(
        &self,
        relative: impl AsRef<Path>,
        operation: impl FnOnce(&Path) -> T,
    ) -> Result<T, TreeHandleError> {
        apply_to_path(&self.resolve(relative.as_ref()), operation).context(TraverseSnafu)
    }

    /// Calls `operation` on every file leaf of the cached tree.
    pub fn apply_to_tree(&self, operation: impl FnMut(&Path)) {
        apply_to_tree(&self.tree, &self.root, operation);
    }

    /// Resolves `relative` against the root after synchronizing. A missing
    /// path is reported and yields `None`.
    pub fn get(&mut self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        if let Err(error) = self.sync() {
            warn!("Failed to synchronize before lookup: {}", error);
        }
        query::get(&self.root, relative)
    }

    /// Matches `pattern` below the root after synchronizing.
    pub fn search(&mut self, pattern: &str) -> Result<Vec<PathBuf>, TreeHandleError> {
        self.sync()?;
        query::search(&self.root, pattern).context(QuerySnafu)
    }

    /// Every directory path in the cached tree, the root excluded.
    pub fn directory_paths(&self) -> Vec<PathBuf> {
        self.tree.directory_paths(&self.root)
    }

    /// Every file path in the cached tree.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.tree.file_paths(&self.root)
    }

    /// Re-reads the root after a write. A failed write keeps its own error
    /// and the synchronization failure is only reported.
    fn sync_after_write(
        &mut self,
        result: Result<(), TreeHandleError>,
    ) -> Result<(), TreeHandleError> {
        match (result, self.sync()) {
            (Ok(()), Ok(_)) => Ok(()),
            (Ok(()), Err(sync_error)) => Err(sync_error),
            (Err(write_error), Ok(_)) => Err(write_error),
            (Err(write_error), Err(sync_error)) => {
                warn!("Failed to synchronize after a failed write: {}", sync_error);
                Err(write_error)
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[derive(Debug, Snafu)]
pub enum TreeHandleError {
    #[snafu(display("Invalid structure description"))]
    NormalizeError { source: NormalizeError },
    #[snafu(display("Failed to write the structure"))]
    MaterializeError { source: MaterializeError },
    #[snafu(display("Failed to read the structure from disk"))]
    IntrospectError { source: IntrospectError },
    #[snafu(display("Failed to apply an operation"))]
    TraverseError { source: TraverseError },
    #[snafu(display("Failed to search the structure"))]
    QueryError { source: QueryError },
}
