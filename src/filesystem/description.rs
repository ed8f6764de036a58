use hashlink::LinkedHashMap;

/// A loosely typed nested description of a directory tree, as produced by a
/// configuration parser or built in code.
///
/// Only mappings, sequences, text and bytes are meaningful as content. The
/// remaining scalar kinds exist so that parsed input can be represented
/// faithfully; they are accepted as names inside sequences and rejected as
/// content during normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    Mapping(LinkedHashMap<String, Description>),
    Sequence(Vec<Description>),
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Description {
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Description)>) -> Self {
        Description::Mapping(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn sequence(items: impl IntoIterator<Item = Description>) -> Self {
        Description::Sequence(items.into_iter().collect())
    }

    /// A sequence of plain names, i.e. a list of empty directories.
    pub fn names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Description::Sequence(
            names
                .into_iter()
                .map(|name| Description::Text(name.into()))
                .collect(),
        )
    }

    /// Human readable kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Description::Mapping(_) => "mapping",
            Description::Sequence(_) => "sequence",
            Description::Text(_) => "text",
            Description::Bytes(_) => "bytes",
            Description::Integer(_) => "integer",
            Description::Float(_) => "float",
            Description::Boolean(_) => "boolean",
            Description::Null => "null",
        }
    }

    /// Whether the value describes a directory.
    pub fn is_nested(&self) -> bool {
        matches!(self, Description::Mapping(_) | Description::Sequence(_))
    }

    /// The textual form of a scalar, used when the scalar names an entry.
    /// Bytes and null have no name.
    pub fn scalar_name(&self) -> Option<String> {
        match self {
            Description::Text(text) => Some(text.clone()),
            Description::Integer(value) => Some(value.to_string()),
            Description::Float(value) => Some(value.to_string()),
            Description::Boolean(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

impl Default for Description {
    fn default() -> Self {
        Description::Mapping(LinkedHashMap::new())
    }
}

impl From<String> for Description {
    fn from(text: String) -> Self {
        Description::Text(text)
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Description::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Description {
    fn from(bytes: Vec<u8>) -> Self {
        Description::Bytes(bytes)
    }
}

impl From<&[u8]> for Description {
    fn from(bytes: &[u8]) -> Self {
        Description::Bytes(bytes.to_vec())
    }
}

impl From<i64> for Description {
    fn from(value: i64) -> Self {
        Description::Integer(value)
    }
}

impl From<f64> for Description {
    fn from(value: f64) -> Self {
        Description::Float(value)
    }
}

impl From<bool> for Description {
    fn from(value: bool) -> Self {
        Description::Boolean(value)
    }
}

impl From<Vec<Description>> for Description {
    fn from(items: Vec<Description>) -> Self {
        Description::Sequence(items)
    }
}

impl From<LinkedHashMap<String, Description>> for Description {
    fn from(entries: LinkedHashMap<String, Description>) -> Self {
        Description::Mapping(entries)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case(Description::from("logs"), Some("logs"))]
    #[case(Description::from(2023i64), Some("2023"))]
    #[case(Description::from(1.5f64), Some("1.5"))]
    #[case(Description::from(true), Some("true"))]
    #[case(Description::Null, None)]
    #[case(Description::from(vec![1u8]), None)]
    #[case(Description::default(), None)]
    fn test_scalar_name(#[case] description: Description, #[case] expected: Option<&str>) {
        assert_eq!(description.scalar_name().as_deref(), expected);
    }

    #[test]
    fn test_names_builds_text_sequence() {
        assert_eq!(
            Description::names(["a", "b"]),
            Description::Sequence(vec![Description::from("a"), Description::from("b")])
        );
    }

    #[test]
    fn test_nested_kinds() {
        assert!(Description::default().is_nested());
        assert!(Description::names(["a"]).is_nested());
        assert!(!Description::from("a").is_nested());
        assert_eq!(Description::Null.kind(), "null");
    }
}
