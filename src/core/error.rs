use thiserror::Error;

/// The error type for this application.
#[derive(Error, Debug)]
pub enum AppError {
    /// An I/O error occurred.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    /// The svn executable could not be started (missing binary, permissions, ...).
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// An SVN command ran to completion but returned a non-zero status,
    /// indicating a logical failure.
    #[error("SVN command failed (exit code {exit_code}): {command}\n{stderr}")]
    SvnCommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
    /// The operation was cancelled, either through a cancellation token or by
    /// the user declining a prompt.
    #[error("Operation cancelled")]
    OperationCancelled,
    /// The command exceeded the configured time limit and was killed.
    #[error("SVN command timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },
    /// Failed to parse a revision string.
    #[error("Failed to parse revision: {0}")]
    RevisionParse(String),
    /// A business logic validation error occurred.
    #[error("Error: {0}")]
    Validation(String),
    /// A settings file could not be read or written.
    #[error("Settings Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Wrap a spawn error, keeping the program name for the message.
    pub fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Launch {
            program: program.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::OperationCancelled)
    }

    /// True when the svn executable itself could not be found.
    pub fn is_tool_missing(&self) -> bool {
        match self {
            AppError::Launch { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

// We will also define a uniform Result type for our application.
pub type AppResult<T> = Result<T, AppError>;
