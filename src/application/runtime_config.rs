use std::path::PathBuf;

use fstruct::Policies;

use crate::cli::{Cli, Command};

/// What the binary was asked to do.
#[derive(Debug, Clone)]
pub enum Action {
    Create {
        config: PathBuf,
        section: String,
        policies: Policies,
    },
    Show,
    Search {
        pattern: String,
    },
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub action: Action,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let action = match cli.command {
            Command::Create {
                config,
                section,
                overwrite,
                no_exists_ok,
            } => Action::Create {
                config,
                section,
                policies: Policies {
                    exists_ok: !no_exists_ok,
                    overwrite,
                },
            },
            Command::Show => Action::Show,
            Command::Search { pattern } => Action::Search { pattern },
        };
        Self {
            root: cli.root,
            action,
        }
    }
}
