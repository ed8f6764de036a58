//! Filesystem tree representation and the operations built on top of it.
//!
//! A [`Description`] is normalized into a [`StructureNode`] tree, where nodes
//! are either directories (holding other nodes) or files with content. The
//! tree can be materialized on disk, introspected back from disk, traversed
//! leaf by leaf and queried with glob patterns.

mod description;
mod handle;
mod introspect;
mod materialize;
mod normalize;
mod query;
mod traverse;
mod tree;

pub use description::Description;
pub use handle::{HandleOptions, HandleState, TreeHandle, TreeHandleError};
pub use introspect::{IntrospectError, read_structure};
pub use materialize::{MaterializeError, Policies, create_directory, create_file, create_structure};
pub use normalize::{NormalizeError, normalize};
pub use query::{QueryError, get, search};
pub use traverse::{TraverseError, apply_to_path, apply_to_tree};
pub use tree::{FileContent, StructureNode};
