use std::path::{Path, PathBuf};

use derive_more::{From, IsVariant};
use hashlink::LinkedHashMap;

use super::Description;

/// Content of a file leaf, either text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Bytes written to disk. Text is written as UTF-8.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// The placeholder content used for introspected files.
impl Default for FileContent {
    fn default() -> Self {
        FileContent::Text(String::new())
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Binary(bytes.to_vec())
    }
}

/// A node of the canonical tree.
///
/// Nodes never store their own path: the path of a node is the root it is
/// materialized under joined with the names of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum StructureNode {
    Directory {
        children: LinkedHashMap<String, StructureNode>,
    },
    File {
        content: FileContent,
    },
}

impl StructureNode {
    /// An empty directory, the root of every canonical tree.
    pub fn root() -> Self {
        StructureNode::Directory {
            children: LinkedHashMap::new(),
        }
    }

    pub fn file(content: impl Into<FileContent>) -> Self {
        StructureNode::File {
            content: content.into(),
        }
    }

    pub fn directory<K: Into<String>>(entries: impl IntoIterator<Item = (K, StructureNode)>) -> Self {
        StructureNode::Directory {
            children: entries
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        }
    }

    /// Children of a directory, `None` for files.
    pub fn children(&self) -> Option<&LinkedHashMap<String, StructureNode>> {
        match self {
            StructureNode::Directory { children } => Some(children),
            StructureNode::File { .. } => None,
        }
    }

    pub fn child(&self, name: impl AsRef<str>) -> Option<&StructureNode> {
        self.children()?.get(name.as_ref())
    }

    pub fn content(&self) -> Option<&FileContent> {
        match self {
            StructureNode::File { content } => Some(content),
            StructureNode::Directory { .. } => None,
        }
    }

    /// Number of direct children, zero for files.
    pub fn len(&self) -> usize {
        self.children().map_or(0, LinkedHashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compares names and node kinds recursively, ignoring file content and
    /// child order.
    pub fn same_shape(&self, other: &StructureNode) -> bool {
        match (self, other) {
            (StructureNode::File { .. }, StructureNode::File { .. }) => true,
            (
                StructureNode::Directory { children },
                StructureNode::Directory {
                    children: other_children,
                },
            ) => {
                children.len() == other_children.len()
                    && children.iter().all(|(name, child)| {
                        other_children
                            .get(name)
                            .is_some_and(|other_child| child.same_shape(other_child))
                    })
            }
            _ => false,
        }
    }

    /// Paths of every file leaf below `root`, depth-first in child order.
    pub fn file_paths(&self, root: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        self.collect_paths(root, &mut paths, &mut |node: &StructureNode| node.is_file());
        paths
    }

    /// Paths of every directory below `root`, depth-first in child order.
    /// The root itself is not included.
    pub fn directory_paths(&self, root: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        self.collect_paths(root, &mut paths, &mut |node: &StructureNode| node.is_directory());
        paths
    }

    fn collect_paths(
        &self,
        path: &Path,
        paths: &mut Vec<PathBuf>,
        keep: &mut impl FnMut(&StructureNode) -> bool,
    ) {
        let Some(children) = self.children() else {
            return;
        };
        for (name, child) in children {
            let child_path = path.join(name);
            if keep(child) {
                paths.push(child_path.clone());
            }
            child.collect_paths(&child_path, paths, keep);
        }
    }

    /// Converts the tree back into a description that normalizes to an
    /// equal tree.
    pub fn to_description(&self) -> Description {
        match self {
            StructureNode::Directory { children } => Description::Mapping(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_description()))
                    .collect(),
            ),
            StructureNode::File {
                content: FileContent::Text(text),
            } => Description::Text(text.clone()),
            StructureNode::File {
                content: FileContent::Binary(bytes),
            } => Description::Bytes(bytes.clone()),
        }
    }
}

impl Default for StructureNode {
    fn default() -> Self {
        Self::root()
    }
}

impl From<&StructureNode> for Description {
    fn from(node: &StructureNode) -> Self {
        node.to_description()
    }
}
