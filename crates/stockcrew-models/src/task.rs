use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTIFACT_PATTERN: &str = "{ticker}_{timestamp}.md";

/// Declarative description of one pipeline stage.
///
/// `description` and `expected_output` are templates; `{ticker}`,
/// `{market_context}` and `{current_date}` are substituted per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDefinition {
    pub name: String,
    /// Name of the agent that executes this task.
    pub agent: String,
    pub description: String,
    pub expected_output: String,
    /// Name of an earlier task whose output must exist before this one runs.
    #[serde(default)]
    pub depends_on: Option<String>,
    /// When present, the task's output is persisted as an artifact.
    #[serde(default)]
    pub output: Option<OutputSpec>,
}

/// File-naming rule for a persisted task output.
///
/// Supported placeholders: `{ticker}`, `{timestamp}` (`MMDD_HHMM`), `{task}`, `{run_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSpec {
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_ARTIFACT_PATTERN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "name": "research_task",
            "agent": "researcher",
            "description": "Research {ticker}",
            "expected_output": "A list of findings"
        }"#;
        let task: TaskDefinition = serde_json::from_str(json).unwrap();
        assert!(task.depends_on.is_none());
        assert!(task.output.is_none());
    }

    #[test]
    fn empty_output_table_uses_default_pattern() {
        let json = r#"{
            "name": "audit_task",
            "agent": "audit_analyst",
            "description": "Audit",
            "expected_output": "Report",
            "depends_on": "reporting_task",
            "output": {}
        }"#;
        let task: TaskDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(task.depends_on.as_deref(), Some("reporting_task"));
        assert_eq!(task.output.unwrap().pattern, DEFAULT_ARTIFACT_PATTERN);
    }
}
