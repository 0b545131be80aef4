/// Fatal run errors and their exit codes. Per-file extraction failures
/// never reach this type — they degrade to sentinel records inside the
/// extraction layer.
use std::path::PathBuf;

#[derive(Debug)]
pub enum RunError {
    /// The external parser is not installed or not invocable.
    ParserMissing { command: String },
    /// Bad invocation or unusable environment (config, replay root).
    Usage { message: String },
    /// The user interrupted the run.
    Interrupted,
    /// Failed to write the output artifact.
    OutputWrite { path: PathBuf, detail: String },
}

impl RunError {
    /// Process exit code reported to the shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::ParserMissing { .. } => 1,
            RunError::Usage { .. } => 2,
            RunError::Interrupted => 128,
            RunError::OutputWrite { .. } => 1,
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::ParserMissing { command } => {
                write!(
                    f,
                    "replay parser \"{}\" not found; install heroprotocol or point --parser at it",
                    command
                )
            }
            RunError::Usage { message } => write!(f, "{}", message),
            RunError::Interrupted => write!(f, "interrupted"),
            RunError::OutputWrite { path, detail } => {
                write!(f, "failed to write result to {}: {}", path.display(), detail)
            }
        }
    }
}

impl std::error::Error for RunError {}
