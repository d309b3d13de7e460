//! Error types for photonctl
//!
//! Everything a command can fail with is folded into [`PhotonCtlError`] and
//! printed as a diagnostic with tips.

use colored::Colorize;
use photonctl_core::{ApiError, ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// ```text
/// error: Profile 'lab' not found
///
///   tip: List available profiles: photonctl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
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
        eprint!("{}{}", "error".red().bold(), ": ".bold());
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

/// Main error type for the photonctl application
#[derive(Error, Debug)]
pub enum PhotonCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'photonctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("{message}")]
    OperationFailed { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for photonctl operations
pub type Result<T> = std::result::Result<T, PhotonCtlError>;

impl PhotonCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            PhotonCtlError::ProfileNotFound { name } => vec![
                "List available profiles: photonctl profile list".to_string(),
                format!(
                    "Create profile '{}': photonctl profile set {} --endpoint <url>",
                    name, name
                ),
            ],
            PhotonCtlError::NoProfileConfigured => vec![
                "Create a profile: photonctl profile set <name> --endpoint <url>".to_string(),
                "Or set PHOTON_ENDPOINT (and PHOTON_TOKEN) in the environment".to_string(),
            ],
            PhotonCtlError::AuthenticationFailed { .. } => vec![
                "Check the token: photonctl profile show <profile>".to_string(),
                "Ensure the endpoint URL is correct".to_string(),
            ],
            PhotonCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the endpoint URL: photonctl profile show <profile>".to_string(),
            ],
            PhotonCtlError::Unavailable { .. } => vec![
                "The failure is temporary on the server side; run the command again".to_string(),
                "Raise the retry budget: photonctl profile set <name> --retry-budget <n>"
                    .to_string(),
            ],
            PhotonCtlError::NotFound { .. } => vec![
                "Verify the ID is correct".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            PhotonCtlError::Timeout { .. } => vec![
                "The operation may still finish; check it with 'photonctl cluster show <id>'"
                    .to_string(),
                "Raise the limit with --wait-timeout".to_string(),
            ],
            PhotonCtlError::InvalidInput { .. } => {
                vec!["Check the command syntax: photonctl <command> --help".to_string()]
            }
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let PhotonCtlError::OperationFailed { .. } = self {
            diag = diag
                .detail("The control plane reported the failure; no further polling was done.");
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<ApiError> for PhotonCtlError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound { .. } => PhotonCtlError::NotFound {
                message: err.to_string(),
            },
            ApiError::Http { .. } if err.is_unauthorized() => {
                PhotonCtlError::AuthenticationFailed {
                    message: err.to_string(),
                }
            }
            ApiError::Request(ref e) if e.is_connect() || e.is_timeout() => {
                PhotonCtlError::ConnectionError {
                    message: err.to_string(),
                }
            }
            ApiError::InvalidUrl(message) => {
                PhotonCtlError::Config(format!("Invalid endpoint: {}", message))
            }
            _ => PhotonCtlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for PhotonCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(ApiError::Http { .. }) if err.is_retryable() => {
                PhotonCtlError::Unavailable {
                    message: err.to_string(),
                }
            }
            CoreError::Api(api_err) => PhotonCtlError::from(api_err),
            CoreError::Validation(message) => PhotonCtlError::InvalidInput { message },
            CoreError::Config(config_err) => PhotonCtlError::from(config_err),
            CoreError::WaitTimeout { .. } => PhotonCtlError::Timeout {
                message: err.to_string(),
            },
            CoreError::RetriesExhausted { .. } => PhotonCtlError::ConnectionError {
                message: err.to_string(),
            },
            CoreError::TaskFailed { .. } | CoreError::ResourceFailed { .. } => {
                PhotonCtlError::OperationFailed {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<ConfigError> for PhotonCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => PhotonCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => PhotonCtlError::NoProfileConfigured,
            _ => PhotonCtlError::Config(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PhotonCtlError {
    fn from(err: serde_json::Error) -> Self {
        PhotonCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for PhotonCtlError {
    fn from(err: serde_yaml::Error) -> Self {
        PhotonCtlError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}

impl From<anyhow::Error> for PhotonCtlError {
    fn from(err: anyhow::Error) -> Self {
        PhotonCtlError::Config(format!("{:#}", err))
    }
}
