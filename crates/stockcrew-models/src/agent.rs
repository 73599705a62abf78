use serde::{Deserialize, Serialize};

/// External tools an agent is allowed to reach while reasoning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Query a web search engine for recent news and filings.
    WebSearch,
    /// Fetch arbitrary web pages by URL.
    WebFetch,
}

impl Capability {
    /// Tool name as understood by the `claude` CLI `--allowedTools` flag.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Capability::WebSearch => "WebSearch",
            Capability::WebFetch => "WebFetch",
        }
    }
}

/// Static definition of one reasoning participant in the crew.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDefinition {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    /// Override model for this agent. Falls back to `AgentsConfig::default_model`.
    #[serde(default)]
    pub model: Option<String>,
}

impl AgentDefinition {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
