use std::path::Path;

use fstruct::config::{ConfigCache, StructureConfigError};
use fstruct::{Policies, StructureNode, TreeHandle, TreeHandleError};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::tree_printer::{render_tree, stdout_supports_color};
use crate::application::{Action, RuntimeConfig};

pub struct Application;

impl Application {
    pub fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        debug!("Runtime config: {:?}", runtime_config);
        let root = runtime_config.root.as_path();

        match &runtime_config.action {
            Action::Create {
                config,
                section,
                policies,
            } => Self::create(root, config, section, *policies),
            Action::Show => Self::show(root),
            Action::Search { pattern } => Self::search(root, pattern),
        }
    }

    fn create(
        root: &Path,
        config_path: &Path,
        section: &str,
        policies: Policies,
    ) -> Result<(), ApplicationError> {
        let mut configs = ConfigCache::new();
        let config = configs.load(config_path).context(ConfigSnafu)?;
        let description = config.section(section).context(ConfigSnafu)?;
        debug!("Loaded section '{}': {:?}", section, description);

        let mut handle = TreeHandle::from_path(root, policies).context(TreeSnafu)?;
        handle.create_structure(description).context(TreeSnafu)?;
        info!(
            "Prepared {} directories under {}, handle {} with {:?}",
            handle.directory_paths().len(),
            root.display(),
            handle.state(),
            handle.policies()
        );

        Self::print(root, handle.tree());
        Ok(())
    }

    fn show(root: &Path) -> Result<(), ApplicationError> {
        let mut handle = TreeHandle::from_path(root, Policies::default()).context(TreeSnafu)?;
        let tree = handle.structure().context(TreeSnafu)?;
        Self::print(root, tree);
        Ok(())
    }

    fn search(root: &Path, pattern: &str) -> Result<(), ApplicationError> {
        let mut handle = TreeHandle::from_path(root, Policies::default()).context(TreeSnafu)?;
        let matches = handle.search(pattern).context(TreeSnafu)?;
        info!("Pattern '{}' matched {} paths", pattern, matches.len());
        for path in matches {
            println!("{}", path.display());
        }
        Ok(())
    }

    fn print(root: &Path, tree: &StructureNode) {
        let label = root.display().to_string();
        print!("{}", render_tree(&label, tree, stdout_supports_color()));
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: StructureConfigError },
    #[snafu(display("Critical failure encountered while working on the tree"))]
    TreeError { source: TreeHandleError },
}
