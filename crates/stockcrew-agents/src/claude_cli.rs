use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;

/// Configuration for a Claude CLI invocation.
#[derive(Debug, Clone)]
pub struct ClaudeCliConfig {
    /// Executable to spawn, `claude` on PATH by default.
    pub program: String,
    pub model: String,
    pub timeout: Duration,
    /// Tools the model may call, passed through `--allowedTools`.
    pub allowed_tools: Vec<String>,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            timeout: Duration::from_secs(300),
            allowed_tools: Vec::new(),
        }
    }
}

impl ClaudeCliConfig {
    fn args(&self, system_prompt: &str, user_prompt: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            user_prompt.to_string(),
            "--system-prompt".to_string(),
            system_prompt.to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output-format".to_string(),
            "text".to_string(),
        ];
        if !self.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(self.allowed_tools.join(","));
        }
        args
    }
}

/// Invoke the `claude` CLI with a system prompt and user prompt.
/// Returns the raw stdout text. A child still running at the timeout is killed.
pub async fn invoke_claude(
    system_prompt: &str,
    user_prompt: &str,
    config: &ClaudeCliConfig,
) -> Result<String, AgentError> {
    debug!(model = %config.model, tools = ?config.allowed_tools, "Invoking claude CLI");

    let result = tokio::time::timeout(config.timeout, async {
        Command::new(&config.program)
            .args(config.args(system_prompt, user_prompt))
            .kill_on_drop(true)
            .output()
            .await
    })
    .await
    .map_err(|_| AgentError::Timeout(config.timeout.as_secs()))?
    .map_err(|e| AgentError::Cli(format!("Failed to spawn claude: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(status = %result.status, stderr = %stderr, "Claude CLI failed");
        return Err(AgentError::Cli(format!(
            "claude exited {}: {}",
            result.status, stderr
        )));
    }

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }

    Ok(stdout)
}

/// Check if the `claude` CLI is available on the system.
pub async fn check_cli_available() -> bool {
    match Command::new("claude").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClaudeCliConfig::default();
        assert_eq!(config.program, "claude");
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.allowed_tools.is_empty());
    }

    #[test]
    fn args_without_tools() {
        let config = ClaudeCliConfig::default();
        let args = config.args("system", "user");
        assert_eq!(args[0], "-p");
        assert_eq!(args[1], "user");
        assert_eq!(args[3], "system");
        assert!(!args.contains(&"--allowedTools".to_string()));
    }

    #[test]
    fn args_with_tools() {
        let config = ClaudeCliConfig {
            allowed_tools: vec!["WebSearch".to_string(), "WebFetch".to_string()],
            ..ClaudeCliConfig::default()
        };
        let args = config.args("system", "user");
        let pos = args.iter().position(|a| a == "--allowedTools").unwrap();
        assert_eq!(args[pos + 1], "WebSearch,WebFetch");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_child_is_killed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = dir.path().join("slow-claude");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nsleep 2\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = ClaudeCliConfig {
            program: script.display().to_string(),
            timeout: Duration::from_millis(500),
            ..ClaudeCliConfig::default()
        };

        let err = invoke_claude("system", "user", &config).await.unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists(), "child kept running after the timeout");
    }

    #[tokio::test]
    async fn missing_program_is_a_cli_error() {
        let config = ClaudeCliConfig {
            program: "/nonexistent/claude".to_string(),
            ..ClaudeCliConfig::default()
        };
        let err = invoke_claude("system", "user", &config).await.unwrap_err();
        assert!(matches!(err, AgentError::Cli(_)));
    }
}
