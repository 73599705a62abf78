//! Test doubles for running the pipeline without the Claude CLI.
//!
//! [`ScriptedAgent`] returns a fixed text (or fails) and records every
//! request it receives, so tests can count invocations and inspect the
//! context each task was given. [`MemoryArtifactStore`] keeps artifacts in
//! memory instead of on disk.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stockcrew_models::{AgentDefinition, AgentRequest, TaskDefinition};
use tokio::sync::Mutex;

use crate::agent::ReasoningAgent;
use crate::artifact::ArtifactStore;
use crate::error::{AgentError, PipelineError};

/// Shared, ordered record of which agent handled which task.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Agent definition with placeholder role text.
pub fn agent_def(name: &str) -> AgentDefinition {
    AgentDefinition {
        name: name.to_string(),
        role: format!("{name} role"),
        goal: format!("{name} goal"),
        backstory: format!("{name} backstory"),
        capabilities: vec![],
        model: None,
    }
}

/// Task definition whose description renders to `"{name} task for {ticker}"`.
pub fn task_def(name: &str, agent: &str, depends_on: Option<&str>) -> TaskDefinition {
    TaskDefinition {
        name: name.to_string(),
        agent: agent.to_string(),
        description: format!("{name} task for {{ticker}}"),
        expected_output: format!("{name} output"),
        depends_on: depends_on.map(str::to_string),
        output: None,
    }
}

/// Spy agent returning a scripted response.
pub struct ScriptedAgent {
    definition: AgentDefinition,
    response: String,
    should_fail: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<AgentRequest>>,
    call_log: Option<CallLog>,
}

impl ScriptedAgent {
    pub fn new(name: &str, response: &str) -> Self {
        Self {
            definition: agent_def(name),
            response: response.to_string(),
            should_fail: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            call_log: None,
        }
    }

    /// An agent whose every invocation fails with a CLI error.
    pub fn failing(name: &str) -> Self {
        let mut agent = Self::new(name, "");
        agent.should_fail = true;
        agent
    }

    /// Append `agent:task` to `log` on every invocation.
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.call_log = Some(log);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ReasoningAgent for ScriptedAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn invoke(&self, request: &AgentRequest) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());
        if let Some(log) = &self.call_log {
            log.lock()
                .await
                .push(format!("{}:{}", self.definition.name, request.task));
        }

        if self.should_fail {
            return Err(AgentError::Cli("Scripted failure".to_string()));
        }
        Ok(self.response.clone())
    }
}

/// Artifact store that keeps written artifacts in memory.
#[derive(Default)]
pub struct MemoryArtifactStore {
    written: Mutex<BTreeMap<String, String>>,
}

impl MemoryArtifactStore {
    pub async fn names(&self) -> Vec<String> {
        self.written.lock().await.keys().cloned().collect()
    }

    pub async fn contents(&self, name: &str) -> Option<String> {
        self.written.lock().await.get(name).cloned()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn persist(&self, name: &str, contents: &str) -> Result<PathBuf, PipelineError> {
        self.written
            .lock()
            .await
            .insert(name.to_string(), contents.to_string());
        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn request(task: &str) -> AgentRequest {
        AgentRequest {
            request_id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            task: task.to_string(),
            ticker: "WEGE3".to_string(),
            description: "Research WEGE3".to_string(),
            expected_output: "Findings".to_string(),
            market_context: None,
            dependency_output: None,
            prior_outputs: vec![],
        }
    }

    #[tokio::test]
    async fn scripted_agent_records_requests() {
        let log: CallLog = Arc::default();
        let agent = ScriptedAgent::new("researcher", "findings").with_call_log(log.clone());

        let output = agent.invoke(&request("research")).await.unwrap();

        assert_eq!(output, "findings");
        assert_eq!(agent.calls(), 1);
        assert_eq!(agent.requests().await[0].task, "research");
        assert_eq!(*log.lock().await, vec!["researcher:research"]);
    }

    #[tokio::test]
    async fn failing_agent_counts_the_attempt() {
        let agent = ScriptedAgent::failing("researcher");
        assert!(agent.invoke(&request("research")).await.is_err());
        assert_eq!(agent.calls(), 1);
    }

    #[tokio::test]
    async fn memory_store_keeps_contents() {
        let store = MemoryArtifactStore::default();
        let name = "WEGE3_1015_1000.md";
        let path = store.persist(name, "# Report").await.unwrap();
        assert_eq!(path, PathBuf::from("WEGE3_1015_1000.md"));
        assert_eq!(store.names().await, vec!["WEGE3_1015_1000.md"]);
        assert_eq!(
            store.contents("WEGE3_1015_1000.md").await.as_deref(),
            Some("# Report")
        );
    }
}
