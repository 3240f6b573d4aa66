//! Shared AWS configuration context
//!
//! Provides `AwsContext` for loading AWS SDK configuration once at process
//! start. The context is passed explicitly to whatever needs a client; there is
//! no process-wide client handle.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;
use tracing::debug;

/// Overrides applied on top of the default AWS credential/region chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsContextOptions {
    /// Region; falls back to `AWS_REGION` / the shared config file
    pub region: Option<String>,
    /// Named profile from `~/.aws/config`
    pub profile_name: Option<String>,
    /// Custom endpoint, e.g. a local emulator
    pub endpoint_url: Option<String>,
}

/// Shared AWS configuration context for creating service clients.
///
/// # Example
/// ```ignore
/// let aws = AwsContext::load(&AwsContextOptions::default()).await;
/// let rds = RdsClient::from_context(&aws);
/// ```
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
}

impl AwsContext {
    /// Load AWS configuration.
    ///
    /// Credentials and anything not overridden come from the environment,
    /// shared config files and instance roles.
    pub async fn load(options: &AwsContextOptions) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &options.profile_name {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        debug!(region = ?config.region(), "Loaded AWS configuration");

        Self {
            config: Arc::new(config),
        }
    }

    /// Get the underlying SDK config for direct client construction.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Get the resolved region, if any.
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }

    /// Create an RDS client from this context.
    pub fn rds_client(&self) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::new(self.sdk_config())
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region())
            .finish_non_exhaustive()
    }
}
