//! Error types.
//!
//! - `AppError`: run-level failure carrying a process exit code.
//! - `IngestError`: fatal input problems found before any network activity.
//! - `TaskError`: failure of a single rate-group task; recorded, never propagated.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Problems with the tabular input. Any of these aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("Failed to open CSV '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read CSV headers: {0}")]
    Headers(#[source] csv::Error),
    #[error("Missing required column: `{0}`")]
    MissingColumn(String),
    #[error("Line {line}: CSV parse error: {source}")]
    Record {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Line {line}: missing value for `{column}`")]
    MissingValue { line: usize, column: String },
    #[error("Line {line}: invalid rate '{value}' (expected a finite decimal number)")]
    InvalidRate { line: usize, value: String },
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Failure of one rate-group task.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    /// The service answered with a non-2xx status.
    #[error("remote service returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },
    /// The response did not have the expected envelope.
    #[error("unexpected response shape: {0}")]
    Shape(String),
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The request could not be built from the task's inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("task panicked: {0}")]
    Panicked(String),
}
