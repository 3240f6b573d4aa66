//! Configuration management for auroractl
//!
//! Handles configuration loading from files, environment variables, and command-line arguments.
//! Configuration is stored in TOML format with support for multiple named profiles.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{ConfigError, Result};
use super::polling::PollSettings;
use crate::params::{DEFAULT_INSTANCE_CLASS, Engine, InstanceSpec};
use crate::rds::AwsContextOptions;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is named on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Profile {
    /// AWS region, e.g. `eu-west-1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Named profile in the shared AWS config/credentials files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    /// RDS endpoint override (LocalStack and similar)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub polling: PollSettings,
    #[serde(default)]
    pub instance: InstanceDefaults,
}

/// Defaults for instances attached by workflows
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct InstanceDefaults {
    #[serde(default = "default_instance_class")]
    pub instance_class: String,
    #[serde(default)]
    pub engine: Engine,
}

impl Default for InstanceDefaults {
    fn default() -> Self {
        Self {
            instance_class: default_instance_class(),
            engine: Engine::default(),
        }
    }
}

fn default_instance_class() -> String {
    DEFAULT_INSTANCE_CLASS.to_string()
}

impl InstanceDefaults {
    pub fn to_spec(&self) -> InstanceSpec {
        InstanceSpec {
            engine: self.engine,
            engine_version: None,
            instance_class: self.instance_class.clone(),
        }
    }
}

impl Profile {
    /// AWS SDK overrides carried by this profile
    pub fn aws_options(&self) -> AwsContextOptions {
        AwsContextOptions {
            region: self.region.clone(),
            profile_name: self.aws_profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// A profile picked for this run, with the name it was found under
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    /// `None` when no profile is configured and built-in defaults apply
    pub name: Option<String>,
    pub profile: Profile,
}

impl Config {
    /// Pick the profile for this run.
    ///
    /// An explicitly named profile wins, then `default_profile`, then the
    /// built-in defaults. A named profile that does not exist is an error.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<ResolvedProfile> {
        let name = explicit_profile.or(self.default_profile.as_deref());

        let Some(name) = name else {
            debug!("No profile selected, using defaults");
            return Ok(ResolvedProfile {
                name: None,
                profile: Profile::default(),
            });
        };

        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })?;
        debug!(profile = name, "Resolved profile");

        Ok(ResolvedProfile {
            name: Some(name.to_string()),
            profile: profile.clone(),
        })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this prefers the Linux-style path when it already exists:
    /// 1. ~/.config/auroractl/config.toml
    /// 2. ~/Library/Application Support/com.auroractl.auroractl/config.toml
    ///
    /// On Linux: ~/.config/auroractl/config.toml
    /// On Windows: %APPDATA%\auroractl\auroractl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("auroractl")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("com", "auroractl", "auroractl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is so that unused profiles do not break loading.
    ///
    /// Example:
    /// ```toml
    /// region = "${AWS_REGION:-eu-west-1}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
