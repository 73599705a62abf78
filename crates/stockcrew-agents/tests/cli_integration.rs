//! Integration tests that invoke the real Claude CLI.
//!
//! These tests are `#[ignore]` by default. They require:
//! - The `claude` CLI installed and on PATH
//! - Valid Anthropic credentials configured
//!
//! Run explicitly with:
//! ```bash
//! cargo test -p stockcrew-agents --test cli_integration -- --ignored
//! ```

use std::time::Duration;

use stockcrew_agents::claude_cli::{check_cli_available, invoke_claude, ClaudeCliConfig};
use stockcrew_agents::parser::clean_response;
use stockcrew_agents::test_support::agent_def;
use stockcrew_agents::{ClaudeAgent, ReasoningAgent};
use stockcrew_models::AgentRequest;
use uuid::Uuid;

/// Verify the Claude CLI is installed and responds to --version.
#[tokio::test]
#[ignore]
async fn cli_is_available() {
    assert!(check_cli_available().await, "claude CLI not found on PATH");
}

/// A trivial prompt should come back as non-empty text once cleaned.
#[tokio::test]
#[ignore]
async fn cli_output_cleans_to_text() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let config = ClaudeCliConfig {
        timeout: Duration::from_secs(60),
        ..ClaudeCliConfig::default()
    };

    let raw = invoke_claude(
        "You are a test agent. Reply with a markdown heading '# ok' and nothing else.",
        "ping",
        &config,
    )
    .await
    .expect("Claude CLI invocation failed");

    let cleaned = clean_response(&raw).expect("CLI returned no usable text");
    assert!(cleaned.contains("ok"), "Unexpected response: {cleaned}");
}

/// A full agent invocation renders the task prompt and returns cleaned markdown.
#[tokio::test]
#[ignore]
async fn claude_agent_answers_a_task() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let agent = ClaudeAgent::new(
        agent_def("reporting_analyst"),
        "claude-3-5-haiku-latest".to_string(),
        Duration::from_secs(120),
    );
    let request = AgentRequest {
        request_id: Uuid::new_v4(),
        run_id: Uuid::new_v4(),
        task: "reporting_task".to_string(),
        ticker: "WEGE3".to_string(),
        description: "Write one sentence describing what the company WEG does.".to_string(),
        expected_output: "A single markdown paragraph.".to_string(),
        market_context: None,
        dependency_output: None,
        prior_outputs: vec![],
    };

    let output = agent.invoke(&request).await.expect("invocation failed");
    assert!(!output.trim().is_empty());
    assert!(!output.starts_with("```"));
}

/// An invalid model must surface as an error, not an empty success.
#[tokio::test]
#[ignore]
async fn cli_reports_errors_for_invalid_model() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let config = ClaudeCliConfig {
        model: "nonexistent-model-12345".to_string(),
        timeout: Duration::from_secs(15),
        allowed_tools: vec![],
        ..ClaudeCliConfig::default()
    };

    let result = invoke_claude("You are a test.", "hello", &config).await;

    assert!(
        result.is_err(),
        "Expected error for invalid model, got: {:?}",
        result.unwrap()
    );
}
