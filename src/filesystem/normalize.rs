use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use hashlink::LinkedHashMap;
use snafu::{Snafu, ensure};
use tracing::debug;

use super::{Description, StructureNode};

type Children = LinkedHashMap<String, StructureNode>;

/// Normalizes a description into a canonical tree whose root is always a
/// directory.
///
/// Mappings become directories and text or bytes become files. A sequence is
/// read as a list of entries: a mapping element contributes its entries and a
/// scalar element contributes an empty directory named after it, so a plain
/// sequence never describes files. A scalar at the top level is treated like
/// a single element sequence.
pub fn normalize(description: &Description) -> Result<StructureNode, NormalizeError> {
    let mut children = Children::new();
    let top = Path::new("");
    match description {
        Description::Mapping(entries) => normalize_entries(entries, top, &mut children)?,
        Description::Sequence(items) => normalize_sequence(items, top, &mut children)?,
        other => normalize_sequence(std::slice::from_ref(other), top, &mut children)?,
    }
    debug!("Normalized description into {} top-level entries", children.len());
    Ok(StructureNode::Directory { children })
}

impl TryFrom<&Description> for StructureNode {
    type Error = NormalizeError;

    fn try_from(description: &Description) -> Result<Self, Self::Error> {
        normalize(description)
    }
}

fn normalize_entries(
    entries: &LinkedHashMap<String, Description>,
    path: &Path,
    children: &mut Children,
) -> Result<(), NormalizeError> {
    for (name, value) in entries {
        validate_name(name, path)?;
        let child_path = path.join(name);
        let node = match value {
            nested if nested.is_nested() => StructureNode::Directory {
                children: normalize_nested(nested, &child_path)?,
            },
            Description::Text(text) => StructureNode::file(text.clone()),
            Description::Bytes(bytes) => StructureNode::file(bytes.clone()),
            other => {
                return UnsupportedContentSnafu {
                    path: child_path,
                    kind: other.kind(),
                }
                .fail();
            }
        };
        children.insert(name.clone(), node);
    }
    Ok(())
}

fn normalize_nested(description: &Description, path: &Path) -> Result<Children, NormalizeError> {
    let mut children = Children::new();
    match description {
        Description::Mapping(entries) => normalize_entries(entries, path, &mut children)?,
        Description::Sequence(items) => normalize_sequence(items, path, &mut children)?,
        other => {
            return UnsupportedContentSnafu {
                path: path.to_path_buf(),
                kind: other.kind(),
            }
            .fail();
        }
    }
    Ok(children)
}

fn normalize_sequence(
    items: &[Description],
    path: &Path,
    children: &mut Children,
) -> Result<(), NormalizeError> {
    for item in items {
        if let Description::Mapping(entries) = item {
            normalize_entries(entries, path, children)?;
            continue;
        }
        let Some(name) = item.scalar_name() else {
            return UnnamedEntrySnafu {
                path: path.to_path_buf(),
                kind: item.kind(),
            }
            .fail();
        };
        validate_name(&name, path)?;
        children.insert(name, StructureNode::root());
    }
    Ok(())
}

fn validate_name(name: &str, path: &Path) -> Result<(), NormalizeError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(MAIN_SEPARATOR);
    ensure!(
        valid,
        InvalidNameSnafu {
            path: path.to_path_buf(),
            name,
        }
    );
    Ok(())
}

fn display_entry(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "<root>".to_string()
    } else {
        path.display().to_string()
    }
}

#[derive(Debug, Snafu)]
pub enum NormalizeError {
    #[snafu(display("Unsupported {} content at '{}'", kind, display_entry(path)))]
    UnsupportedContent { path: PathBuf, kind: &'static str },
    #[snafu(display("Invalid entry name '{}' under '{}'", name, display_entry(path)))]
    InvalidName { path: PathBuf, name: String },
    #[snafu(display(
        "A {} cannot name a sequence entry under '{}'",
        kind,
        display_entry(path)
    ))]
    UnnamedEntry { path: PathBuf, kind: &'static str },
}
