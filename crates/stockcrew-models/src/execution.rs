use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent_message::PriorOutput;

/// Text produced by one completed task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    pub output: String,
    pub elapsed_ms: u64,
    /// Where the output was persisted, for tasks with an output spec.
    pub artifact: Option<PathBuf>,
}

/// Ordered accumulation of task outputs for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    pub run_id: Uuid,
    pub ticker: String,
    outputs: Vec<TaskOutput>,
}

impl ExecutionResult {
    pub fn new(run_id: Uuid, ticker: impl Into<String>) -> Self {
        Self {
            run_id,
            ticker: ticker.into(),
            outputs: Vec::new(),
        }
    }

    pub fn push(&mut self, output: TaskOutput) {
        self.outputs.push(output);
    }

    pub fn get(&self, task: &str) -> Option<&TaskOutput> {
        self.outputs.iter().find(|o| o.task == task)
    }

    pub fn get_mut(&mut self, task: &str) -> Option<&mut TaskOutput> {
        self.outputs.iter_mut().find(|o| o.task == task)
    }

    pub fn contains(&self, task: &str) -> bool {
        self.get(task).is_some()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn outputs(&self) -> &[TaskOutput] {
        &self.outputs
    }

    /// Output of the most recently completed task.
    pub fn last(&self) -> Option<&TaskOutput> {
        self.outputs.last()
    }

    /// Paths of every artifact written during the run.
    pub fn artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.outputs.iter().filter_map(|o| o.artifact.as_ref())
    }

    /// All outputs so far, in the shape handed to later tasks.
    pub fn prior_outputs(&self) -> Vec<PriorOutput> {
        self.outputs
            .iter()
            .map(|o| PriorOutput {
                task: o.task.clone(),
                agent: o.agent.clone(),
                output: o.output.clone(),
            })
            .collect()
    }
}
