use std::{
    fs,
    path::{Path, PathBuf},
};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::PathDisplayExt;
use crate::filesystem::Description;

/// Section holding the structure description when none is named.
pub const DEFAULT_SECTION: &str = "downloads";

/// A parsed YAML configuration whose top-level sections are structure
/// descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureConfig {
    sections: LinkedHashMap<String, Description>,
}

impl StructureConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StructureConfigError> {
        let path = path.as_ref();
        debug!("Reading config file: {}", path.best_effort_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    pub fn section(&self, name: impl AsRef<str>) -> Result<&Description, StructureConfigError> {
        let name = name.as_ref();
        self.sections
            .get(name)
            .context(MissingSectionSnafu { section: name })
    }

    pub fn get_sections_iter(&self) -> impl Iterator<Item = (&String, &Description)> {
        self.sections.iter()
    }

    fn key_name(key: &Yaml, parent: &str) -> Result<String, StructureConfigError> {
        match key {
            Yaml::Value(Scalar::String(name)) => Ok(name.to_string()),
            Yaml::Value(Scalar::Integer(value)) => Ok(value.to_string()),
            Yaml::Value(Scalar::FloatingPoint(value)) => Ok(f64::from(*value).to_string()),
            Yaml::Value(Scalar::Boolean(value)) => Ok(value.to_string()),
            _ => UnsupportedKeySnafu { location: parent }.fail(),
        }
    }

    fn description_from_yaml(
        node: &Yaml,
        location: &str,
    ) -> Result<Description, StructureConfigError> {
        let description = match node {
            Yaml::Mapping(entries) => {
                let mut mapping = LinkedHashMap::new();
                for (key, value) in entries {
                    let name = Self::key_name(key, location)?;
                    let child_location = format!("{location}.{name}");
                    let child = Self::description_from_yaml(value, &child_location)?;
                    mapping.insert(name, child);
                }
                Description::Mapping(mapping)
            }
            Yaml::Sequence(items) => Description::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        Self::description_from_yaml(item, &format!("{location}[{index}]"))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Value(Scalar::String(text)) => Description::Text(text.to_string()),
            Yaml::Value(Scalar::Integer(value)) => Description::Integer(*value),
            Yaml::Value(Scalar::FloatingPoint(value)) => Description::Float(f64::from(*value)),
            Yaml::Value(Scalar::Boolean(value)) => Description::Boolean(*value),
            Yaml::Value(Scalar::Null) => Description::Null,
            _ => {
                debug!("Unsupported YAML node at {}: {:?}", location, node);
                return UnsupportedValueSnafu { location }.fail();
            }
        };
        Ok(description)
    }
}

impl TryFrom<&str> for StructureConfig {
    type Error = StructureConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let mut sections = LinkedHashMap::new();
        for (key, value) in top_level {
            let name = Self::key_name(key, "<top level>")?;
            let description = Self::description_from_yaml(value, &name)?;
            sections.insert(name, description);
        }
        debug!("Loaded {} config sections", sections.len());

        Ok(StructureConfig { sections })
    }
}

#[derive(Debug, Snafu)]
pub enum StructureConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path.best_effort_display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config has no '{}' section", section))]
    MissingSection { section: String },
    #[snafu(display("Unsupported mapping key under '{}'", location))]
    UnsupportedKey { location: String },
    #[snafu(display("Unsupported value at '{}'", location))]
    UnsupportedValue { location: String },
}
