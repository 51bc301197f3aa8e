use crate::filter::FilterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub filter: FilterRules,
    pub fields: FieldsRules,
    /// Named condition lists usable with `filter --preset`.
    pub presets: BTreeMap<String, Vec<String>>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            filter: FilterRules::default(),
            fields: FieldsRules::default(),
            presets: BTreeMap::new(),
        }
    }
}

impl ToolConfig {
    /// Conditions of the named presets, in the order given
    pub fn preset_conditions(&self, names: &[String]) -> Result<Vec<String>, FilterError> {
        let mut conditions = Vec::new();
        for name in names {
            let preset = self
                .presets
                .get(name)
                .ok_or_else(|| FilterError::UnknownPreset(name.clone()))?;
            conditions.extend(preset.iter().cloned());
        }
        Ok(conditions)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterRules {
    /// Combine conditions with OR instead of AND
    pub or: bool,
    pub reverse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsRules {
    pub separator: String,
}

impl Default for FieldsRules {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ToolConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<ToolConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static ToolConfig {
    static DEFAULT_CONFIG: LazyLock<ToolConfig> = LazyLock::new(ToolConfig::default);
    &DEFAULT_CONFIG
}
