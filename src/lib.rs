//! Declarative directory tree scaffolding.
//!
//! A nested [`Description`] is normalized into a canonical [`StructureNode`]
//! tree, which can be written to disk, read back from disk, traversed and
//! queried. [`TreeHandle`] binds a tree to a root directory and default
//! existence policies.

pub mod config;
pub mod ext;
pub mod filesystem;

pub use filesystem::{
    Description, FileContent, HandleOptions, HandleState, Policies, StructureNode, TreeHandle,
    TreeHandleError,
};
