// Configuration Loader
// Layered configuration loading system

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::layered::{ConfigLayer, ConfigLayerSource, LayeredConfig};
use crate::types::{Config, ProviderSettings};

const CONFIG_DIR: &str = ".chorus";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader with layered support
pub struct ConfigLoader {
    /// Global config directory
    global_dir: PathBuf,
    /// Project config directory
    project_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        let global_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR);

        Self {
            global_dir,
            project_dir: None,
        }
    }

    /// Override the global config directory
    pub fn with_global_dir(mut self, dir: PathBuf) -> Self {
        self.global_dir = dir;
        self
    }

    /// Set project directory
    pub fn with_project_dir(mut self, dir: PathBuf) -> Self {
        self.project_dir = Some(dir);
        self
    }

    /// Load configuration with CLI overrides
    pub fn load_with_cli_overrides(&self, cli_overrides: Vec<(String, String)>) -> Result<Config> {
        // Load layers in order:
        // 1. Built-in defaults
        // 2. Global config (~/.chorus/config.toml)
        // 3. Project config (.chorus/config.toml)
        // 4. CLI overrides

        let mut layered = LayeredConfig::new();
        layered.add_layer(ConfigLayer {
            source: ConfigLayerSource::Default,
            values: toml::Value::try_from(Config::default())
                .context("Failed to serialize default config")?,
        });

        if let Some(values) = Self::read_layer(&self.global_dir.join(CONFIG_FILE))? {
            layered.add_layer(ConfigLayer {
                source: ConfigLayerSource::GlobalConfig,
                values,
            });
        }

        if let Some(project_dir) = &self.project_dir {
            let path = project_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if let Some(values) = Self::read_layer(&path)? {
                layered.add_layer(ConfigLayer {
                    source: ConfigLayerSource::ProjectConfig,
                    values,
                });
            }
        }

        let mut config: Config = layered
            .merge()
            .try_into()
            .context("Invalid configuration")?;

        for (key, value) in cli_overrides {
            self.apply_override(&mut config, &key, &value)?;
        }

        Ok(config)
    }

    /// Read one TOML file, `None` when it does not exist
    fn read_layer(path: &Path) -> Result<Option<toml::Value>> {
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!("Loading config layer {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let values: toml::Value =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(values))
    }

    /// Apply a single CLI override
    fn apply_override(&self, config: &mut Config, key: &str, value: &str) -> Result<()> {
        match key {
            "storage.data_dir" => {
                config.storage.data_dir = Some(PathBuf::from(value));
            }
            "network.request_timeout_secs" => {
                config.network.request_timeout_secs = parse_number(key, value)?;
            }
            "network.translate_timeout_secs" => {
                config.network.translate_timeout_secs = parse_number(key, value)?;
            }
            "dispatch.history_limit" => {
                config.dispatch.history_limit = parse_number(key, value)?;
            }
            "dispatch.memory_capacity" => {
                config.dispatch.memory_capacity = parse_number(key, value)?;
            }
            "dispatch.max_attachments" => {
                config.dispatch.max_attachments = parse_number(key, value)?;
            }
            "dispatch.reveal_interval_ms" => {
                config.dispatch.reveal_interval_ms = parse_number(key, value)?;
            }
            _ => {
                let Some(family) = key
                    .strip_prefix("providers.")
                    .and_then(|rest| rest.strip_suffix(".base_url"))
                else {
                    anyhow::bail!("Unknown config key: {}", key);
                };
                config.providers.insert(
                    family.to_string(),
                    ProviderSettings {
                        base_url: Some(value.to_string()),
                    },
                );
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", key, value))
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loader(global: &Path, project: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_global_dir(global.to_path_buf())
            .with_project_dir(project.to_path_buf())
    }

    #[test]
    fn defaults_without_files() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let config = loader(global.path(), project.path())
            .load_with_cli_overrides(vec![])
            .unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dispatch.memory_capacity, 500);
        assert_eq!(config.network.request_timeout_secs, 60);
    }

    #[test]
    fn project_overrides_global_overrides_default() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        std::fs::write(
            global.path().join(CONFIG_FILE),
            "[dispatch]\nhistory_limit = 4\nreveal_interval_ms = 10\n",
        )
        .unwrap();
        std::fs::create_dir_all(project.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            project.path().join(CONFIG_DIR).join(CONFIG_FILE),
            "[dispatch]\nhistory_limit = 2\n\n[providers.grok]\nbase_url = \"http://localhost:1\"\n",
        )
        .unwrap();

        let config = loader(global.path(), project.path())
            .load_with_cli_overrides(vec![("network.request_timeout_secs".into(), "9".into())])
            .unwrap();

        assert_eq!(config.dispatch.history_limit, 2);
        assert_eq!(config.dispatch.reveal_interval_ms, 10);
        assert_eq!(config.dispatch.max_attachments, 20);
        assert_eq!(config.network.request_timeout_secs, 9);
        assert_eq!(config.provider_base_url("grok"), Some("http://localhost:1"));
    }

    #[test]
    fn unknown_or_malformed_override_is_error() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let loader = loader(global.path(), project.path());

        assert!(
            loader
                .load_with_cli_overrides(vec![("ui.theme".into(), "dark".into())])
                .is_err()
        );
        assert!(
            loader
                .load_with_cli_overrides(vec![("dispatch.history_limit".into(), "ten".into())])
                .is_err()
        );

        let config = loader
            .load_with_cli_overrides(vec![("providers.openai.base_url".into(), "http://x".into())])
            .unwrap();
        assert_eq!(config.provider_base_url("openai"), Some("http://x"));
    }
}
