//! Configuration handling for tugremap

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{RemapError, RemapResult};

/// Directory holding project-level tugremap settings.
pub const CONFIG_DIR: &str = ".tugremap";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Remap configuration
///
/// Each category flag disables renaming of that symbol kind entirely when
/// set to `false`. Occurrences of a disabled kind are still visited (frames
/// are still pushed for disabled parameters) but never produce edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapConfig {
    /// Rename type references and declarations
    #[serde(default = "default_enabled")]
    pub classes: bool,

    /// Rename method declarations and invocations
    #[serde(default = "default_enabled")]
    pub methods: bool,

    /// Rename constructor declarations
    #[serde(default = "default_enabled")]
    pub constructors: bool,

    /// Rename field declarations and accesses
    #[serde(default = "default_enabled")]
    pub fields: bool,

    /// Rename method and lambda parameters
    #[serde(default = "default_enabled")]
    pub parameters: bool,

    /// Worker threads for parallel remapping (rayon's global pool when unset)
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            classes: default_enabled(),
            methods: default_enabled(),
            constructors: default_enabled(),
            fields: default_enabled(),
            parameters: default_enabled(),
            threads: None,
        }
    }
}

impl RemapConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> RemapResult<Self> {
        let config: RemapConfig = toml::from_str(content)
            .map_err(|e| RemapError::config(format!("failed to parse config file: {}", e)))?;
        if config.threads == Some(0) {
            return Err(RemapError::config("threads must be at least 1"));
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> RemapResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RemapError::config(format!("failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from .tugremap/config.toml in the given project root
    pub fn load_from_project(project_root: &Path) -> RemapResult<Self> {
        let config_path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(RemapConfig::default())
        }
    }

    /// Whether every symbol category is disabled.
    pub fn renames_nothing(&self) -> bool {
        !(self.classes || self.methods || self.constructors || self.fields || self.parameters)
    }
}
