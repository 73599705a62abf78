use serde::{Deserialize, Serialize};

use crate::agent::{AgentDefinition, Capability};
use crate::task::{OutputSpec, TaskDefinition};

/// Top-level configuration for stockcrew.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewConfig {
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default = "default_tasks")]
    pub tasks: Vec<TaskDefinition>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub market: MarketConfig,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            agents: AgentsConfig::default(),
            tasks: default_tasks(),
            pipeline: PipelineConfig::default(),
            artifacts: ArtifactConfig::default(),
            market: MarketConfig::default(),
        }
    }
}

/// Configuration for the agent layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentsConfig {
    /// Model used by agents that do not name one.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Per-invocation timeout in seconds for the reasoning backend.
    #[serde(default = "default_agent_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_agents")]
    pub definitions: Vec<AgentDefinition>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            timeout_seconds: default_agent_timeout(),
            definitions: default_agents(),
        }
    }
}

impl AgentsConfig {
    /// Model an agent should run on, honoring its override.
    pub fn model_for(&self, agent: &AgentDefinition) -> String {
        agent
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Task whose output is the user-facing report. Defaults to the last task.
    #[serde(default)]
    pub final_task: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactConfig {
    /// Directory persisted task outputs are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Configuration for the market context enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the quote API.
    #[serde(default = "default_quote_base_url")]
    pub base_url: String,
    /// How many days back the "previous" quote is looked up.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// How long a fetched snapshot is reused across runs.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_quote_base_url(),
            history_days: default_history_days(),
            cache_ttl_seconds: default_cache_ttl(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}
fn default_agent_timeout() -> u64 {
    300
}
fn default_output_dir() -> String {
    ".".to_string()
}
fn default_true() -> bool {
    true
}
fn default_quote_base_url() -> String {
    "https://economia.awesomeapi.com.br".to_string()
}
fn default_history_days() -> u32 {
    15
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_request_timeout() -> u64 {
    10
}

fn default_agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition {
            name: "researcher".to_string(),
            role: "Senior Equity Researcher".to_string(),
            goal: "Uncover the most relevant recent facts about a B3-listed company: results, \
                   guidance, corporate events and how the market is pricing them."
                .to_string(),
            backstory: "You have covered Brazilian equities for over a decade and know where \
                        to look for filings, earnings calls and credible press coverage. You \
                        always cite the date of the information you report."
                .to_string(),
            capabilities: vec![Capability::WebSearch],
            model: None,
        },
        AgentDefinition {
            name: "reporting_analyst".to_string(),
            role: "Equity Reporting Analyst".to_string(),
            goal: "Turn raw research into a clear, structured investment report.".to_string(),
            backstory: "You write reports read by retail investors. You organise findings \
                        into sections, explain the numbers and state risks plainly."
                .to_string(),
            capabilities: vec![],
            model: None,
        },
        AgentDefinition {
            name: "audit_analyst".to_string(),
            role: "Investment Report Auditor".to_string(),
            goal: "Check the report for factual consistency, unsupported claims and missing \
                   risks, and deliver the corrected final version."
                .to_string(),
            backstory: "You review every report before publication. You remove speculation \
                        that is not backed by the research and make sure currency values are \
                        labelled correctly."
                .to_string(),
            capabilities: vec![],
            model: None,
        },
    ]
}

fn default_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition {
            name: "research_task".to_string(),
            agent: "researcher".to_string(),
            description: "Research the stock {ticker} listed on B3. Collect the latest \
                          quarterly results, guidance, dividends, relevant news and analyst \
                          views. Today is {current_date}. Market context: {market_context}"
                .to_string(),
            expected_output: "A bullet list of the 10 most relevant findings about {ticker}, \
                              each with its date and source."
                .to_string(),
            depends_on: None,
            output: None,
        },
        TaskDefinition {
            name: "reporting_task".to_string(),
            agent: "reporting_analyst".to_string(),
            description: "Using the research on {ticker}, write a complete investment report. \
                          Relate the company's exposure to the dollar and crypto movements in \
                          the market context: {market_context}"
                .to_string(),
            expected_output: "A markdown report on {ticker} with sections for overview, \
                              results, valuation, risks and outlook."
                .to_string(),
            depends_on: None,
            output: None,
        },
        TaskDefinition {
            name: "audit_task".to_string(),
            agent: "audit_analyst".to_string(),
            description: "Audit the report on {ticker}. Verify every figure against the \
                          research, remove unsupported claims and fix currency labels."
                .to_string(),
            expected_output: "The final audited markdown report on {ticker}, without code \
                              fences."
                .to_string(),
            depends_on: Some("reporting_task".to_string()),
            output: Some(OutputSpec::default()),
        },
    ]
}
