//! Typed resource statuses
//!
//! The RDS API reports status as free text. Each resource kind gets a closed
//! enumeration with an explicit text mapping. Matching is exact, so text
//! outside the mapping (including padded or differently cased text) is an
//! error, never "not ready yet".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::rds::ResourceKind;

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:expr) {
            $($variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every status in this enumeration
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The raw text the RDS API uses for this status
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::UnknownStatus {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

status_enum! {
    /// DB cluster status
    ClusterStatus (ResourceKind::Cluster) {
        Available => "available",
        BackingUp => "backing-up",
        Backtracking => "backtracking",
        CloningFailed => "cloning-failed",
        Creating => "creating",
        Deleting => "deleting",
        FailingOver => "failing-over",
        InaccessibleEncryptionCredentials => "inaccessible-encryption-credentials",
        InaccessibleEncryptionCredentialsRecoverable => "inaccessible-encryption-credentials-recoverable",
        Maintenance => "maintenance",
        Migrating => "migrating",
        MigrationFailed => "migration-failed",
        Modifying => "modifying",
        PreparingDataMigration => "preparing-data-migration",
        Promoting => "promoting",
        Rebooting => "rebooting",
        Renaming => "renaming",
        ResettingMasterCredentials => "resetting-master-credentials",
        Starting => "starting",
        Stopped => "stopped",
        Stopping => "stopping",
        StorageOptimization => "storage-optimization",
        UpdateIamDbAuth => "update-iam-db-auth",
        Upgrading => "upgrading",
    }
}

status_enum! {
    /// DB instance status
    InstanceStatus (ResourceKind::Instance) {
        Available => "available",
        BackingUp => "backing-up",
        ConfiguringEnhancedMonitoring => "configuring-enhanced-monitoring",
        ConfiguringIamDatabaseAuth => "configuring-iam-database-auth",
        ConfiguringLogExports => "configuring-log-exports",
        ConvertingToVpc => "converting-to-vpc",
        Creating => "creating",
        DeletePrecheck => "delete-precheck",
        Deleting => "deleting",
        Failed => "failed",
        InaccessibleEncryptionCredentials => "inaccessible-encryption-credentials",
        InaccessibleEncryptionCredentialsRecoverable => "inaccessible-encryption-credentials-recoverable",
        IncompatibleCreate => "incompatible-create",
        IncompatibleNetwork => "incompatible-network",
        IncompatibleOptionGroup => "incompatible-option-group",
        IncompatibleParameters => "incompatible-parameters",
        IncompatibleRestore => "incompatible-restore",
        InsufficientCapacity => "insufficient-capacity",
        Maintenance => "maintenance",
        Modifying => "modifying",
        MovingToVpc => "moving-to-vpc",
        Rebooting => "rebooting",
        Renaming => "renaming",
        ResettingMasterCredentials => "resetting-master-credentials",
        RestoreError => "restore-error",
        Starting => "starting",
        Stopped => "stopped",
        Stopping => "stopping",
        StorageConfigUpgrade => "storage-config-upgrade",
        StorageFull => "storage-full",
        StorageInitialization => "storage-initialization",
        StorageOptimization => "storage-optimization",
        Upgrading => "upgrading",
    }
}

status_enum! {
    /// DB cluster snapshot status
    SnapshotStatus (ResourceKind::Snapshot) {
        Available => "available",
        Copying => "copying",
        Creating => "creating",
        Deleting => "deleting",
        Failed => "failed",
    }
}
