use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::module::Module;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
    #[error("module {import_path:?} sets both `forge` and an explicit vcs or repo")]
    AmbiguousModule { import_path: String },
}

/// Contents of `modsite.toml`.
///
/// ```toml
/// domain = "go.example.org"
/// index = "Modules by <a href=\"https://example.org\">me</a>."
/// footer = "Imprint: ..."
///
/// [[modules]]
/// import_path = "go.example.org/tool"
/// forge = { repo = "https://github.com/example/tool", ref = "main" }
///
/// [[modules]]
/// import_path = "go.example.org/legacy"
/// vcs = "hg"
/// repo = "https://hg.example.org/legacy"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub domain: String,
    pub index: String,
    pub footer: String,
    pub modules: Vec<ModuleConfig>,
}

impl SiteConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(data)?)
    }

    /// Expands every entry into a [`Module`], keeping file order.
    pub fn modules(&self) -> Result<Vec<Module>, ConfigError> {
        self.modules.iter().map(ModuleConfig::to_module).collect()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ModuleConfig {
    pub import_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forge: Option<Forge>,
    pub vcs: String,
    pub repo: String,
    pub home_page: String,
    pub directory_link_template: String,
    pub file_link_template: String,
}

/// Shorthand for a repository on a GitHub-style forge.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Forge {
    pub repo: String,
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

fn default_ref() -> String {
    "main".to_string()
}

impl ModuleConfig {
    pub fn to_module(&self) -> Result<Module, ConfigError> {
        let Some(forge) = &self.forge else {
            return Ok(Module {
                import_path: self.import_path.clone(),
                vcs: self.vcs.clone(),
                repo_url: self.repo.clone(),
                home_page: self.home_page.clone(),
                directory_link_template: self.directory_link_template.clone(),
                file_link_template: self.file_link_template.clone(),
            });
        };

        if !self.vcs.is_empty() || !self.repo.is_empty() {
            return Err(ConfigError::AmbiguousModule {
                import_path: self.import_path.clone(),
            });
        }

        let mut module = Module::git_forge(&self.import_path, &forge.repo, &forge.git_ref);
        if !self.home_page.is_empty() {
            module.home_page = self.home_page.clone();
        }
        Ok(module)
    }
}
