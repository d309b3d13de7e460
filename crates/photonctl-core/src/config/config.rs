//! Configuration management for photonctl
//!
//! Configuration is stored in TOML format with support for multiple named
//! profiles, each pointing at one control-plane endpoint.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::wait::WaitConfig;
use crate::wait::WaitPolicy;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when `--profile` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Base URL of the control-plane API
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Tenant used when `--tenant` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Project used when `--project` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<WaitConfig>,
}

impl Profile {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            tenant: None,
            project: None,
            wait: None,
        }
    }

    /// Wait policy for this profile, defaults when no `wait` section is present
    pub fn wait_policy(&self) -> Result<WaitPolicy> {
        match &self.wait {
            Some(wait) => wait.to_policy(),
            None => Ok(WaitPolicy::default()),
        }
    }

    /// Token with everything but the last four characters masked
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            let visible: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if token.chars().count() <= 4 {
                "****".to_string()
            } else {
                format!("****{}", visible)
            }
        })
    }
}

impl Config {
    /// Pick the profile to use: explicit name, then the default, then the
    /// first profile by name.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(name) = explicit_profile {
            if !self.profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            return Ok(name.to_string());
        }

        if let Some(default) = &self.default_profile {
            return Ok(default.clone());
        }

        self.list_profiles()
            .first()
            .map(|(name, _)| (*name).clone())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: "Use 'photonctl profile set' to create a profile.".to_string(),
            })
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path; a missing file is an empty config
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Add or replace a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// Profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Platform config file location, e.g. `~/.config/photonctl/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "photonctl", "photonctl")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}`; unknown variables are left as-is
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok())
            .to_string()
    }
}
