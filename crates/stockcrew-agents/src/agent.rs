use std::time::Duration;

use async_trait::async_trait;
use stockcrew_models::{AgentDefinition, AgentRequest};

use crate::claude_cli::{invoke_claude, ClaudeCliConfig};
use crate::error::AgentError;
use crate::parser::clean_response;
use crate::prompts::{agent_system_prompt, task_prompt};

/// A configured reasoning participant. Mockable for testing.
///
/// Implementations hold no per-run state, so one instance may serve
/// concurrent runs.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    fn definition(&self) -> &AgentDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Produce the text output for one task.
    async fn invoke(&self, request: &AgentRequest) -> Result<String, AgentError>;
}

/// An agent that reasons through the Claude CLI.
pub struct ClaudeAgent {
    definition: AgentDefinition,
    cli_config: ClaudeCliConfig,
}

impl ClaudeAgent {
    pub fn new(definition: AgentDefinition, model: String, timeout: Duration) -> Self {
        let allowed_tools = definition
            .capabilities
            .iter()
            .map(|c| c.tool_name().to_string())
            .collect();
        Self {
            definition,
            cli_config: ClaudeCliConfig {
                model,
                timeout,
                allowed_tools,
                ..ClaudeCliConfig::default()
            },
        }
    }

    pub fn cli_config(&self) -> &ClaudeCliConfig {
        &self.cli_config
    }
}

#[async_trait]
impl ReasoningAgent for ClaudeAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn invoke(&self, request: &AgentRequest) -> Result<String, AgentError> {
        let system_prompt = agent_system_prompt(&self.definition);
        let user_prompt = task_prompt(request);
        let raw_output = invoke_claude(&system_prompt, &user_prompt, &self.cli_config).await?;
        clean_response(&raw_output)
    }
}
