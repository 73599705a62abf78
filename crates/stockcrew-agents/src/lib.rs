pub mod agent;
pub mod artifact;
pub mod claude_cli;
pub mod context;
pub mod error;
pub mod graph;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod registry;

pub mod test_support;

pub use agent::{ClaudeAgent, ReasoningAgent};
pub use artifact::{ArtifactNamer, ArtifactStore, FsArtifactStore};
pub use context::RunContext;
pub use error::{AgentError, PipelineError, RunFailure};
pub use graph::{Task, TaskGraph};
pub use pipeline::PipelineExecutor;
pub use registry::AgentRegistry;
