//! Building the RDS engine from profile settings and command-line overrides

use std::path::PathBuf;

use auroractl_core::{
    AuroraEngine, AwsContext, AwsContextOptions, Config, RdsClient, ResolvedProfile, WaitConfig,
};
use tracing::{debug, info};

use crate::error::Result as CliResult;

/// Settings given on the command line that win over the profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Resolves profiles and hands out engines bound to them
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Create a connection manager; `config_path` is set when `--config-file` was given
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Location of the configuration file in use
    pub fn config_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> CliResult<ResolvedProfile> {
        Ok(self.config.resolve_profile(explicit_profile)?)
    }

    /// AWS settings for a profile with `--region` applied
    pub fn aws_options(&self, resolved: &ResolvedProfile, overrides: &Overrides) -> AwsContextOptions {
        let mut options = resolved.profile.aws_options();
        if let Some(region) = &overrides.region {
            options.region = Some(region.clone());
        }
        options
    }

    /// Polling behaviour for a profile with the polling flags applied
    pub fn wait_config(&self, resolved: &ResolvedProfile, overrides: &Overrides) -> CliResult<WaitConfig> {
        let mut polling = resolved.profile.polling.clone();
        if let Some(secs) = overrides.poll_interval_secs {
            polling.interval_secs = secs;
        }
        if let Some(attempts) = overrides.max_attempts {
            polling.max_attempts = Some(attempts);
        }
        if let Some(secs) = overrides.timeout_secs {
            polling.timeout_secs = Some(secs);
        }
        Ok(polling.to_wait_config()?)
    }

    /// Create an engine backed by the AWS SDK for the selected profile
    pub async fn create_engine(&self, overrides: &Overrides) -> CliResult<AuroraEngine<RdsClient>> {
        let resolved = self.resolve_profile(overrides.profile.as_deref())?;
        let wait = self.wait_config(&resolved, overrides)?;
        let options = self.aws_options(&resolved, overrides);

        debug!(
            profile = resolved.name.as_deref().unwrap_or("<defaults>"),
            ?options,
            ?wait,
            "Creating RDS engine"
        );

        let aws = AwsContext::load(&options).await;
        info!(region = aws.region().unwrap_or("<unset>"), "Using AWS region");

        Ok(AuroraEngine::new(RdsClient::from_context(&aws))
            .with_wait_config(wait)
            .with_instance_defaults(resolved.profile.instance.to_spec()))
    }
}
