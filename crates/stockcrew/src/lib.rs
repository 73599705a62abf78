//! stockcrew - multi-agent equity research
//!
//! A crew of Claude CLI agents researches a ticker, writes a report and
//! audits it. Tasks run in order, each seeing every earlier output, and the
//! audited report is persisted as `{ticker}_{MMDD_HHMM}.md`.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use stockcrew::models::CrewConfig;
//! use stockcrew::market::MarketContextProvider;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CrewConfig::default();
//! let executor = stockcrew::build_pipeline(&config)?;
//! let market = MarketContextProvider::from_config(&config.market)?;
//! let analysis = stockcrew::analyze(&executor, Some(&market), "PETR4")
//!     .await
//!     .map_err(|f| anyhow::anyhow!("{f}"))?;
//! println!("{}", analysis.report);
//! # Ok(())
//! # }
//! ```

pub mod report;

pub use stockcrew_agents as agents;
pub use stockcrew_market as market;
pub use stockcrew_models as models;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use stockcrew_agents::{
    AgentRegistry, ArtifactStore, ClaudeAgent, FsArtifactStore, PipelineError, PipelineExecutor,
    ReasoningAgent, RunContext, RunFailure, TaskGraph,
};
use stockcrew_market::MarketContextProvider;
use stockcrew_models::{AgentsConfig, CrewConfig, ExecutionResult};

/// Outcome of a successful analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: ExecutionResult,
    /// Output of the final task, unprocessed.
    pub report: String,
}

/// Read a TOML configuration file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<CrewConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// One Claude-backed agent per configured definition.
pub fn claude_agents(config: &AgentsConfig) -> Vec<Arc<dyn ReasoningAgent>> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    config
        .definitions
        .iter()
        .map(|definition| {
            let model = config.model_for(definition);
            Arc::new(ClaudeAgent::new(definition.clone(), model, timeout))
                as Arc<dyn ReasoningAgent>
        })
        .collect()
}

/// Validate the task graph against `agents` and wire up an executor.
pub fn assemble(
    config: &CrewConfig,
    agents: Vec<Arc<dyn ReasoningAgent>>,
    store: Arc<dyn ArtifactStore>,
) -> Result<PipelineExecutor, PipelineError> {
    let registry = AgentRegistry::new(agents)?;
    let graph = TaskGraph::new(
        config.tasks.clone(),
        &registry,
        config.pipeline.final_task.as_deref(),
    )?;
    Ok(PipelineExecutor::new(Arc::new(registry), Arc::new(graph), store))
}

/// Build a Claude-backed executor writing artifacts to the configured directory.
pub fn build_pipeline(config: &CrewConfig) -> Result<PipelineExecutor, PipelineError> {
    let store = Arc::new(FsArtifactStore::new(config.artifacts.output_dir.as_str()));
    assemble(config, claude_agents(&config.agents), store)
}

/// Normalize a raw ticker the way a run would, without starting one.
pub fn validate_ticker(raw_ticker: &str) -> Result<String, PipelineError> {
    RunContext::bind(raw_ticker, None).map(|ctx| ctx.ticker().to_string())
}

/// Analyze one ticker.
///
/// The ticker is validated before quotes are fetched, so bad input costs
/// neither network calls nor agent invocations.
pub async fn analyze(
    executor: &PipelineExecutor,
    market: Option<&MarketContextProvider>,
    raw_ticker: &str,
) -> Result<Analysis, RunFailure> {
    let ctx = RunContext::bind(raw_ticker, None)
        .map_err(|error| RunFailure::before_run(error, raw_ticker))?;
    let ctx = match market {
        Some(provider) => ctx.with_market_context(provider.fetch().await),
        None => ctx,
    };

    let result = executor.run(&ctx).await?;
    let report = executor.report(&result).unwrap_or_default().to_string();
    Ok(Analysis { result, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcrew_agents::test_support::{MemoryArtifactStore, ScriptedAgent};

    fn scripted_crew() -> Vec<Arc<dyn ReasoningAgent>> {
        vec![
            Arc::new(ScriptedAgent::new("researcher", "news and fundamentals"))
                as Arc<dyn ReasoningAgent>,
            Arc::new(ScriptedAgent::new("reporting_analyst", "draft report")),
            Arc::new(ScriptedAgent::new("audit_analyst", "# PETR4\n\nFinal report")),
        ]
    }

    #[test]
    fn default_config_builds_claude_pipeline() {
        let executor = build_pipeline(&CrewConfig::default()).unwrap();
        assert_eq!(executor.graph().len(), 3);
        assert_eq!(executor.graph().final_task().name(), "audit_task");
        assert_eq!(executor.registry().len(), 3);
    }

    #[test]
    fn claude_agents_follow_definitions() {
        let agents = claude_agents(&AgentsConfig::default());

        let names: Vec<_> = agents.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["researcher", "reporting_analyst", "audit_analyst"]);
    }

    #[test]
    fn missing_agent_rejected_at_build() {
        let mut config = CrewConfig::default();
        config.agents.definitions.retain(|a| a.name != "audit_analyst");

        let err = build_pipeline(&config).err().expect("expected build_pipeline to fail");

        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn analyze_returns_final_report() {
        let store = Arc::new(MemoryArtifactStore::default());
        let config = CrewConfig::default();
        let executor = assemble(&config, scripted_crew(), store.clone()).unwrap();

        let analysis = analyze(&executor, None, "petr4").await.unwrap();

        assert_eq!(analysis.report, "# PETR4\n\nFinal report");
        assert_eq!(analysis.result.ticker, "PETR4");
        assert_eq!(analysis.result.len(), 3);
        let names = store.names().await;
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("PETR4_"));
    }

    #[tokio::test]
    async fn analyze_rejects_blank_ticker() {
        let store = Arc::new(MemoryArtifactStore::default());
        let executor = assemble(&CrewConfig::default(), scripted_crew(), store).unwrap();

        let failure = analyze(&executor, None, " ").await.unwrap_err();

        assert!(matches!(failure.error, PipelineError::InvalidInput(_)));
        assert!(failure.partial.is_empty());
    }

    #[test]
    fn validate_ticker_normalizes_or_rejects() {
        assert_eq!(validate_ticker(" vale3\n").unwrap(), "VALE3");
        for raw in ["", "  ", "PETR 4"] {
            assert!(matches!(
                validate_ticker(raw),
                Err(PipelineError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn load_config_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockcrew.toml");
        std::fs::write(
            &path,
            "[pipeline]\nfinal_task = \"reporting_task\"\n\n[market]\nenabled = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.pipeline.final_task.as_deref(), Some("reporting_task"));
        assert!(!config.market.enabled);
        assert_eq!(config.tasks.len(), 3);
    }

    #[test]
    fn example_config_builds() {
        let config: CrewConfig =
            toml::from_str(include_str!("../../../config/stockcrew.toml")).unwrap();

        let executor = build_pipeline(&config).unwrap();

        assert_eq!(executor.graph().final_task().name(), "audit_task");
        let audit = executor.graph().get("audit_task").unwrap();
        assert_eq!(audit.dependency_index(), Some(1));
        assert_eq!(config.artifacts.output_dir, "reports");
    }

    #[test]
    fn load_config_missing_file() {
        let err = load_config("/nonexistent/stockcrew.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
