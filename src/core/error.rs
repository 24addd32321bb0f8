use thiserror::Error;

/// A provider-reported failure, independent of the transport that ran the call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AwsCommandError {
    /// Full human-readable message
    pub message: String,
    /// Machine-readable classifier, e.g. `ValidationError` (empty if unknown)
    pub code: String,
    /// Provider explanation (empty if unknown)
    pub detail: String,
}

impl AwsCommandError {
    pub fn new(message: impl Into<String>, code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            detail: detail.into(),
        }
    }

    /// Build the error both transports raise for a provider failure
    ///
    /// The message mirrors the text the AWS CLI prints, so it reads the same
    /// whichever transport produced it.
    pub fn provider(operation: &str, code: &str, detail: &str) -> Self {
        Self::new(
            format!("An error occurred ({code}) when calling the {operation} operation: {detail}"),
            code,
            detail,
        )
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code == code
    }
}

#[derive(Error, Debug)]
pub enum PolgenError {
    #[error(transparent)]
    Aws(#[from] AwsCommandError),

    #[error(
        "Cannot interface with AWS: neither the AWS SDK transport (`sdk` feature) nor the AWS CLI \
         is available. Either install and configure the AWS CLI or build with `--features sdk`"
    )]
    NoAwsInterface,

    #[error("Unable to run {program}: {reason}")]
    ToolUnavailable { program: String, reason: String },

    #[error("{program} exited with status {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("AWS SDK error: {0}")]
    Sdk(String),

    #[error("Unexpected response from {operation}: {reason}")]
    UnexpectedResponse { operation: String, reason: String },

    #[error("Operation {service}/{operation} is not supported by this transport")]
    UnsupportedOperation { service: String, operation: String },

    #[error("Stack {stack} did not settle after {attempts} status checks")]
    StackTimeout { stack: String, attempts: u32 },

    #[error("Stack {stack} failed in state {status}")]
    StackFailed { stack: String, status: String },

    #[error("Stack {0} does not exist")]
    StackMissing(String),

    #[error("Key {key} not found in Outputs of stack {stack}")]
    MissingOutput { stack: String, key: String },

    #[error("Not a valid repo name: {0:?} (expected \"<owner>/<repo>\")")]
    InvalidRepoName(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl PolgenError {
    /// The normalized provider error, if this is one
    pub fn as_aws(&self) -> Option<&AwsCommandError> {
        match self {
            Self::Aws(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PolgenError>;
