pub mod agent;
pub mod agent_message;
pub mod config;
pub mod execution;
pub mod market;
pub mod task;

pub use agent::{AgentDefinition, Capability};
pub use agent_message::{AgentRequest, PriorOutput};
pub use config::{AgentsConfig, ArtifactConfig, CrewConfig, MarketConfig, PipelineConfig};
pub use execution::{ExecutionResult, TaskOutput};
pub use market::{variation_percent, InstrumentQuote, MarketContext};
pub use task::{OutputSpec, TaskDefinition, DEFAULT_ARTIFACT_PATTERN};
