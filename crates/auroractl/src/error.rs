//! Error types for auroractl
//!
//! Library errors are folded into [`AuroraCtlError`], which knows how to
//! print itself as a diagnostic with suggestions.

use auroractl_core::{ConfigError, CoreError};
use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: failed to rename orders with status code 400 (InvalidParameterCombination)
///
///   tip: the clone and its instance were left in place; inspect them before retrying
/// ```
pub struct CliDiagnostic {
    label: Label,
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

enum Label {
    Error,
    Warning,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self::new(Label::Error, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(Label::Warning, message)
    }

    fn new(label: Label, message: &str) -> Self {
        Self {
            label,
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        let label = match self.label {
            Label::Error => "error".red().bold(),
            Label::Warning => "warning".yellow().bold(),
        };
        eprint!("{}{}", label, ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the auroractl application
#[derive(Error, Debug)]
pub enum AuroraCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{workflow} skipped: missing {}", .missing.join(", "))]
    WorkflowSkipped {
        workflow: &'static str,
        missing: Vec<String>,
    },

    #[error("{message}")]
    OperationRejected { message: String, status_code: u16 },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for auroractl operations
pub type Result<T> = std::result::Result<T, AuroraCtlError>;

impl AuroraCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AuroraCtlError::ProfileNotFound { name } => vec![
                "List available profiles: auroractl profile list".to_string(),
                format!("Add a [profiles.{name}] table to the config file: auroractl profile path"),
            ],
            AuroraCtlError::Config(_) => vec![
                "Show the config file location: auroractl profile path".to_string(),
            ],
            AuroraCtlError::WorkflowSkipped { workflow, .. } => vec![format!(
                "See the required flags: auroractl {workflow} --help"
            )],
            AuroraCtlError::OperationRejected { status_code, .. } if *status_code == 403 => vec![
                "Check the IAM permissions of the active AWS credentials".to_string(),
            ],
            AuroraCtlError::OperationRejected { .. } => vec![
                "Resources created by earlier steps are left in place; inspect them before retrying"
                    .to_string(),
            ],
            AuroraCtlError::NotFound { .. } => vec![
                "Check the identifier and the region: auroractl profile show".to_string(),
            ],
            AuroraCtlError::Timeout { .. } => vec![
                "Raise --timeout or --max-attempts, or drop them to wait indefinitely".to_string(),
            ],
            AuroraCtlError::ConnectionError { .. } => vec![
                "Check network connectivity and the configured endpoint_url".to_string(),
                "Verify AWS credentials are available (AWS_PROFILE, environment or instance role)"
                    .to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<ConfigError> for AuroraCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => AuroraCtlError::ProfileNotFound { name },
            other => AuroraCtlError::Config(other.to_string()),
        }
    }
}

impl From<CoreError> for AuroraCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration(message) => AuroraCtlError::InvalidInput { message },
            CoreError::OperationFailed { status_code, .. } => AuroraCtlError::OperationRejected {
                message: err.to_string(),
                status_code,
            },
            CoreError::NotFound { .. } => AuroraCtlError::NotFound {
                message: err.to_string(),
            },
            CoreError::PollTimeout { .. } => AuroraCtlError::Timeout {
                message: err.to_string(),
            },
            CoreError::Sdk { .. } => AuroraCtlError::ConnectionError {
                message: err.to_string(),
            },
            CoreError::Config(config_err) => AuroraCtlError::from(config_err),
            _ => AuroraCtlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<anyhow::Error> for AuroraCtlError {
    fn from(err: anyhow::Error) -> Self {
        AuroraCtlError::OutputError {
            message: err.to_string(),
        }
    }
}
