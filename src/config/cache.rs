use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::structure_config::{StructureConfig, StructureConfigError};

/// Memoizes loaded configurations by path.
///
/// The cache is an ordinary value owned by the caller. Nothing is shared
/// between caches, and entries only go away through [`ConfigCache::invalidate`]
/// or [`ConfigCache::clear`].
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: HashMap<PathBuf, StructureConfig>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached configuration for `path`, loading it on first use.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&StructureConfig, StructureConfigError> {
        match self.entries.entry(path.as_ref().to_path_buf()) {
            Entry::Occupied(entry) => {
                debug!("Config cache hit for {}", entry.key().display());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let config = StructureConfig::from_path(entry.key())?;
                Ok(entry.insert(config))
            }
        }
    }

    /// Drops the cached configuration for `path`, returning whether one was
    /// cached.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
