use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::types::Visibility;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_instance_url")]
    pub instance_url: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    /// Widest audience a reply may reach; narrower subjects keep their own visibility.
    #[serde(default)]
    pub default_visibility: Visibility,
    #[serde(default)]
    pub install_prompt: InstallPromptMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallPromptMode {
    /// Only on Android hosts.
    #[default]
    Auto,
    Always,
    Never,
}

fn default_instance_url() -> String {
    "https://kronk.info".to_string()
}

fn default_tick_rate() -> f64 {
    30.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instance_url: default_instance_url(),
            tick_rate_fps: default_tick_rate(),
            default_visibility: Visibility::default(),
            install_prompt: InstallPromptMode::default(),
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/kronktui"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("invalid config.toml, using defaults: {e}");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("");
        assert_eq!(config.instance_url, "https://kronk.info");
        assert_eq!(config.default_visibility, Visibility::Public);
        assert_eq!(config.install_prompt, InstallPromptMode::Auto);
    }

    #[test]
    fn reads_overrides() {
        let config = parse_config(
            "instance_url = \"https://example.social\"\n\
             default_visibility = \"unlisted\"\n\
             install_prompt = \"never\"\n",
        );
        assert_eq!(config.instance_url, "https://example.social");
        assert_eq!(config.default_visibility, Visibility::Unlisted);
        assert_eq!(config.install_prompt, InstallPromptMode::Never);
    }

    #[test]
    fn malformed_config_falls_back() {
        let config = parse_config("tick_rate_fps = \"fast\"");
        assert_eq!(config.tick_rate_fps, 30.0);
    }
}
