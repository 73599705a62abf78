use std::path::PathBuf;

use stockcrew_models::ExecutionResult;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a single reasoning backend call.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Claude CLI error: {0}")]
    Cli(String),

    #[error("Agent returned an empty response")]
    EmptyResponse,

    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid task graph: {0}")]
    InvalidGraph(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A validated graph was violated at run time. Indicates a bug, never retried.
    #[error("Task {task} reached before its dependency {dependency} completed")]
    DependencyNotSatisfied { task: String, dependency: String },

    #[error("Agent invocation failed in task {task}: {source}")]
    AgentInvocation {
        task: String,
        #[source]
        source: AgentError,
    },

    #[error("Failed to persist artifact {}: {source}", .path.display())]
    ArtifactPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed run: the error plus whatever outputs completed before it.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    pub error: PipelineError,
    pub partial: ExecutionResult,
}

impl RunFailure {
    pub fn new(error: PipelineError, partial: ExecutionResult) -> Self {
        Self { error, partial }
    }

    /// A failure before any task ran, e.g. an invalid ticker.
    pub fn before_run(error: PipelineError, ticker: &str) -> Self {
        Self::new(error, ExecutionResult::new(Uuid::nil(), ticker.trim()))
    }

    pub fn into_error(self) -> PipelineError {
        self.error
    }
}
