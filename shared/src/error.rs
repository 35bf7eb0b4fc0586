use thiserror::Error;

/// Everything that can stop a run. Only `Config` is recoverable: the binary
/// answers it with a usage hint instead of a failing exit status.
#[derive(Debug, Error)]
pub enum EcsnvError {
    #[error("{0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create AWS session: {0}")]
    Session(String),

    #[error("Error calling {operation}: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("No {0} selected")]
    Selection(&'static str),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Failed to write envs: {0}")]
    Output(#[from] std::io::Error),
}

impl EcsnvError {
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    /// Bad flag combination: answered with usage help and a zero exit.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::InvalidConfig(_) => 2,
            Self::Session(_) => 3,
            Self::Service { .. } => 4,
            Self::NotFound(_) => 5,
            Self::Selection(_) | Self::Prompt(_) => 6,
            Self::Output(_) => 1,
        }
    }
}
