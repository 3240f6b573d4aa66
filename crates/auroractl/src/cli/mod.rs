//! CLI structure and command definitions
//!
//! Workflows are top-level subcommands; `profile`, `version` and
//! `completions` are informational.

use clap::{Args, Parser, Subcommand};

use auroractl_core::{CloneParams, DeleteParams, SnapshotRestoreParams, UpgradeParams};

use crate::connection::Overrides;

/// Lifecycle automation for Amazon Aurora clusters
#[derive(Parser, Debug)]
#[command(name = "auroractl")]
#[command(version, about = "Lifecycle automation for Amazon Aurora clusters")]
#[command(long_about = "
Lifecycle automation for Amazon Aurora clusters

Each workflow is a linear sequence of RDS calls. After every call auroractl
polls until the resource settles, then moves on. Nothing is rolled back if a
step fails.

EXAMPLES:
    # Clone a cluster and swap the clone in under the original name
    auroractl clone-cluster-in-time --cluster-identifier orders \\
        --new-cluster-identifier orders-next --subnet-group-name private \\
        --engine-version 8.0.mysql_aurora.3.05.2

    # Upgrade through a clone, keeping the original as orders-backup
    auroractl upgrade-cluster-version --cluster-identifier orders-clone \\
        --source-cluster-identifier orders --engine-version 8.0.mysql_aurora.3.05.2

    # Poll every 10 seconds and give up after an hour
    auroractl --poll-interval 10 --timeout 3600 delete-cluster --cluster-identifier scratch

For more help on a specific command, run:
    auroractl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "AURORACTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "AURORACTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// AWS region, overriding the profile
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Fail when a workflow is skipped for missing arguments
    #[arg(long, global = true)]
    pub strict: bool,

    /// Seconds between status checks
    #[arg(long, global = true, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Give up waiting after this many status checks
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Give up waiting on a single resource after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Per-invocation settings layered over the selected profile
    pub fn overrides(&self) -> Overrides {
        Overrides {
            profile: self.profile.clone(),
            region: self.region.clone(),
            poll_interval_secs: self.poll_interval,
            max_attempts: self.max_attempts,
            timeout_secs: self.timeout,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, tables for listings
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Workflow(WorkflowCommands),

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    Profile(ProfileCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cluster lifecycle workflows
#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// Upgrade a cluster's engine through a clone, then swap names
    #[command(after_help = "EXAMPLES:
    auroractl upgrade-cluster-version --cluster-identifier orders-clone \\
        --source-cluster-identifier orders --engine-version 8.0.mysql_aurora.3.05.2

    # Without --engine-version only the clone is created
    auroractl upgrade-cluster-version --cluster-identifier orders-clone \\
        --source-cluster-identifier orders
")]
    UpgradeClusterVersion(UpgradeArgs),

    /// Copy-on-write clone a cluster, then swap the clone in under the original name
    #[command(after_help = "EXAMPLES:
    auroractl clone-cluster-in-time --cluster-identifier orders \\
        --new-cluster-identifier orders-next --subnet-group-name private \\
        --engine-version 8.0.mysql_aurora.3.05.2
")]
    CloneClusterInTime(CloneArgs),

    /// Snapshot a cluster, restore the snapshot, then swap the restore in
    #[command(after_help = "EXAMPLES:
    # Takes a snapshot named nightly-<yy-mm-dd-HH>
    auroractl restore-from-snapshot --cluster-identifier orders \\
        --snapshot-identifier nightly --new-cluster-identifier orders-restored
")]
    RestoreFromSnapshot(RestoreArgs),

    /// Delete a cluster and its instance
    #[command(after_help = "EXAMPLES:
    auroractl delete-cluster --cluster-identifier scratch

    # Keep a final snapshot
    auroractl delete-cluster --cluster-identifier scratch --final-snapshot-identifier scratch-final
")]
    DeleteCluster(DeleteArgs),
}

impl WorkflowCommands {
    /// Subcommand name, as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowCommands::UpgradeClusterVersion(_) => "upgrade-cluster-version",
            WorkflowCommands::CloneClusterInTime(_) => "clone-cluster-in-time",
            WorkflowCommands::RestoreFromSnapshot(_) => "restore-from-snapshot",
            WorkflowCommands::DeleteCluster(_) => "delete-cluster",
        }
    }

    /// Required arguments left unset, in parameter naming
    pub fn missing(&self) -> Vec<&'static str> {
        match self {
            WorkflowCommands::UpgradeClusterVersion(args) => UpgradeParams::from(args).missing(),
            WorkflowCommands::CloneClusterInTime(args) => CloneParams::from(args).missing(),
            WorkflowCommands::RestoreFromSnapshot(args) => {
                SnapshotRestoreParams::from(args).missing()
            }
            WorkflowCommands::DeleteCluster(args) => DeleteParams::from(args).missing(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UpgradeArgs {
    /// Identifier of the clone to create and upgrade
    #[arg(long)]
    pub cluster_identifier: Option<String>,
    /// Cluster to upgrade; it is kept as <source>-backup
    #[arg(long)]
    pub source_cluster_identifier: Option<String>,
    /// DB subnet group for the clone
    #[arg(long)]
    pub subnet_group_name: Option<String>,
    /// Target engine version
    #[arg(long)]
    pub engine_version: Option<String>,
}

impl From<&UpgradeArgs> for UpgradeParams {
    fn from(args: &UpgradeArgs) -> Self {
        UpgradeParams {
            cluster_identifier: args.cluster_identifier.clone(),
            source_cluster_identifier: args.source_cluster_identifier.clone(),
            subnet_group_name: args.subnet_group_name.clone(),
            engine_version: args.engine_version.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    /// Cluster to clone; it is kept as <cluster>-backup
    #[arg(long)]
    pub cluster_identifier: Option<String>,
    /// Identifier of the clone before it takes over the original name
    #[arg(long)]
    pub new_cluster_identifier: Option<String>,
    /// DB subnet group for the clone
    #[arg(long)]
    pub subnet_group_name: Option<String>,
    /// Engine version of the clone's instance
    #[arg(long)]
    pub engine_version: Option<String>,
}

impl From<&CloneArgs> for CloneParams {
    fn from(args: &CloneArgs) -> Self {
        CloneParams {
            cluster_identifier: args.cluster_identifier.clone(),
            new_cluster_identifier: args.new_cluster_identifier.clone(),
            subnet_group_name: args.subnet_group_name.clone(),
            engine_version: args.engine_version.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RestoreArgs {
    /// Cluster to snapshot; it is kept as <cluster>-backup
    #[arg(long)]
    pub cluster_identifier: Option<String>,
    /// Snapshot name prefix; a -yy-mm-dd-HH stamp is appended
    #[arg(long)]
    pub snapshot_identifier: Option<String>,
    /// Identifier of the restored cluster before it takes over the original name
    #[arg(long)]
    pub new_cluster_identifier: Option<String>,
    /// Engine version of the restored cluster
    #[arg(long)]
    pub engine_version: Option<String>,
}

impl From<&RestoreArgs> for SnapshotRestoreParams {
    fn from(args: &RestoreArgs) -> Self {
        SnapshotRestoreParams {
            cluster_identifier: args.cluster_identifier.clone(),
            snapshot_identifier: args.snapshot_identifier.clone(),
            new_cluster_identifier: args.new_cluster_identifier.clone(),
            engine_version: args.engine_version.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Cluster to delete
    #[arg(long)]
    pub cluster_identifier: Option<String>,
    /// Take a final snapshot with this name; skipped when absent
    #[arg(long)]
    pub final_snapshot_identifier: Option<String>,
}

impl From<&DeleteArgs> for DeleteParams {
    fn from(args: &DeleteArgs) -> Self {
        DeleteParams {
            cluster_identifier: args.cluster_identifier.clone(),
            final_snapshot_identifier: args.final_snapshot_identifier.clone(),
        }
    }
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show the settings a command would run with
    #[command(visible_alias = "get")]
    Show {
        /// Profile name; defaults to --profile, then the default profile
        name: Option<String>,
    },
}
