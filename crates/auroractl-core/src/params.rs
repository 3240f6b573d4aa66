//! Parameter types for resource operations and workflows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Instance class used when a workflow attaches an instance to a new cluster
pub const DEFAULT_INSTANCE_CLASS: &str = "db.t3.small";

/// Suffix appended to a cluster identifier when it is renamed out of the way
pub const DEFAULT_RENAME_SUFFIX: &str = "backup";

/// Database engine of a cluster or instance
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    Aurora,
    #[default]
    AuroraMysql,
    AuroraPostgresql,
    Mariadb,
    Mysql,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Aurora => "aurora",
            Engine::AuroraMysql => "aurora-mysql",
            Engine::AuroraPostgresql => "aurora-postgresql",
            Engine::Mariadb => "mariadb",
            Engine::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aurora" => Ok(Engine::Aurora),
            "aurora-mysql" => Ok(Engine::AuroraMysql),
            "aurora-postgresql" => Ok(Engine::AuroraPostgresql),
            "mariadb" => Ok(Engine::Mariadb),
            "mysql" => Ok(Engine::Mysql),
            other => Err(CoreError::Configuration(format!(
                "unsupported engine '{other}'"
            ))),
        }
    }
}

/// How a point-in-time restore lays out storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreType {
    /// The new cluster shares storage with its source until pages diverge
    #[default]
    CopyOnWrite,
    /// The new cluster gets a full copy of the source volume
    FullCopy,
}

impl RestoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreType::CopyOnWrite => "copy-on-write",
            RestoreType::FullCopy => "full-copy",
        }
    }
}

/// Engine, version and class of an instance attached to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub engine: Engine,
    /// `None` lets the instance inherit the cluster's engine version
    pub engine_version: Option<String>,
    pub instance_class: String,
}

impl Default for InstanceSpec {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            engine_version: None,
            instance_class: DEFAULT_INSTANCE_CLASS.to_string(),
        }
    }
}

impl InstanceSpec {
    /// Pin the engine version
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }
}

/// New name for a cluster being renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameTarget {
    /// Use exactly this identifier
    Explicit(String),
    /// Append `-<suffix>` to the current identifier
    Suffix(String),
}

impl Default for RenameTarget {
    fn default() -> Self {
        RenameTarget::Suffix(DEFAULT_RENAME_SUFFIX.to_string())
    }
}

impl RenameTarget {
    /// Build a target from the two optional knobs a caller can set.
    ///
    /// An explicit identifier wins; otherwise the suffix is used. Returns a
    /// target even when both are empty so that the failure surfaces from
    /// [`RenameTarget::resolve`] at the point of use.
    pub fn from_parts(new_identifier: Option<&str>, suffix: Option<&str>) -> Self {
        match new_identifier {
            Some(name) if !name.is_empty() => RenameTarget::Explicit(name.to_string()),
            _ => RenameTarget::Suffix(suffix.unwrap_or_default().to_string()),
        }
    }

    /// Compute the new identifier for `current`
    pub fn resolve(&self, current: &str) -> Result<String> {
        match self {
            RenameTarget::Explicit(name) if !name.is_empty() => Ok(name.clone()),
            RenameTarget::Suffix(suffix) if !suffix.is_empty() => Ok(format!("{current}-{suffix}")),
            _ => Err(CoreError::Configuration(
                "it requires suffix or a new identifier".to_string(),
            )),
        }
    }
}

/// Inputs of the upgrade-in-place workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeParams {
    /// Identifier of the clone that will be upgraded
    pub cluster_identifier: Option<String>,
    /// Cluster being upgraded; it ends up renamed with the backup suffix
    pub source_cluster_identifier: Option<String>,
    pub subnet_group_name: Option<String>,
    /// Without a version the workflow stops after the clone
    pub engine_version: Option<String>,
}

impl UpgradeParams {
    /// Names of required arguments that are unset
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cluster_identifier.is_none() {
            missing.push("cluster_identifier");
        }
        if self.source_cluster_identifier.is_none() {
            missing.push("source_cluster_identifier");
        }
        missing
    }
}

/// Inputs of the clone-in-time workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneParams {
    pub cluster_identifier: Option<String>,
    pub new_cluster_identifier: Option<String>,
    pub subnet_group_name: Option<String>,
    pub engine_version: Option<String>,
}

impl CloneParams {
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cluster_identifier.is_none() {
            missing.push("cluster_identifier");
        }
        if self.new_cluster_identifier.is_none() {
            missing.push("new_cluster_identifier");
        }
        if self.subnet_group_name.is_none() {
            missing.push("subnet_group_name");
        }
        if self.engine_version.as_deref().is_none_or(str::is_empty) {
            missing.push("engine_version");
        }
        missing
    }
}

/// Inputs of the snapshot-restore workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRestoreParams {
    pub cluster_identifier: Option<String>,
    /// Prefix of the snapshot name; a `-yy-mm-dd-HH` stamp is appended
    pub snapshot_identifier: Option<String>,
    pub new_cluster_identifier: Option<String>,
    pub engine_version: Option<String>,
}

impl SnapshotRestoreParams {
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cluster_identifier.is_none() {
            missing.push("cluster_identifier");
        }
        if self.snapshot_identifier.is_none() {
            missing.push("snapshot_identifier");
        }
        if self.new_cluster_identifier.is_none() {
            missing.push("new_cluster_identifier");
        }
        missing
    }
}

/// Inputs of the delete-cluster workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteParams {
    pub cluster_identifier: Option<String>,
    /// Take a final snapshot with this name before deleting
    pub final_snapshot_identifier: Option<String>,
}

impl DeleteParams {
    pub fn missing(&self) -> Vec<&'static str> {
        if self.cluster_identifier.is_none() {
            vec!["cluster_identifier"]
        } else {
            Vec::new()
        }
    }
}
