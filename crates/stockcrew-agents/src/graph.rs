use std::collections::HashMap;

use stockcrew_models::{OutputSpec, TaskDefinition};

use crate::artifact::ArtifactNamer;
use crate::error::PipelineError;
use crate::prompts::{placeholders, TEMPLATE_VARIABLES};
use crate::registry::AgentRegistry;

/// A validated task: its dependency is resolved to the index of an earlier task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    index: usize,
    definition: TaskDefinition,
    dependency: Option<usize>,
}

impl Task {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn agent(&self) -> &str {
        &self.definition.agent
    }

    /// Position in declaration (and execution) order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dependency_index(&self) -> Option<usize> {
        self.dependency
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn expected_output(&self) -> &str {
        &self.definition.expected_output
    }

    pub fn output_spec(&self) -> Option<&OutputSpec> {
        self.definition.output.as_ref()
    }
}

/// Tasks in declaration order. That order is the execution order, and every
/// dependency points strictly backwards in it.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    final_task: usize,
}

impl TaskGraph {
    /// Validate definitions against the registry.
    ///
    /// `final_task` names the task whose output is the report; the last task
    /// when `None`.
    pub fn new(
        definitions: Vec<TaskDefinition>,
        registry: &AgentRegistry,
        final_task: Option<&str>,
    ) -> Result<Self, PipelineError> {
        if definitions.is_empty() {
            return Err(PipelineError::InvalidGraph(
                "pipeline has no tasks".to_string(),
            ));
        }

        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(definitions.len());
        for (index, def) in definitions.iter().enumerate() {
            if positions.insert(def.name.as_str(), index).is_some() {
                return Err(PipelineError::InvalidGraph(format!(
                    "duplicate task name: {}",
                    def.name
                )));
            }
        }

        let mut resolved = Vec::with_capacity(definitions.len());
        for (index, def) in definitions.iter().enumerate() {
            if !registry.contains(&def.agent) {
                return Err(PipelineError::NotFound(format!(
                    "agent {} referenced by task {}",
                    def.agent, def.name
                )));
            }

            let dependency = match &def.depends_on {
                None => None,
                Some(dep) => {
                    let dep_index = *positions.get(dep.as_str()).ok_or_else(|| {
                        PipelineError::NotFound(format!(
                            "task {dep} referenced as dependency of {}",
                            def.name
                        ))
                    })?;
                    if dep_index >= index {
                        return Err(PipelineError::InvalidGraph(format!(
                            "task {} depends on {dep}, which is not declared before it",
                            def.name
                        )));
                    }
                    Some(dep_index)
                }
            };

            for template in [&def.description, &def.expected_output] {
                if let Some(unknown) = placeholders(template)
                    .into_iter()
                    .find(|p| !TEMPLATE_VARIABLES.contains(&p.as_str()))
                {
                    return Err(PipelineError::InvalidGraph(format!(
                        "task {} references unknown placeholder {{{unknown}}}",
                        def.name
                    )));
                }
            }

            if let Some(spec) = &def.output {
                ArtifactNamer::new(spec.pattern.as_str()).validate()?;
            }

            resolved.push(dependency);
        }

        let final_task = match final_task {
            Some(name) => *positions
                .get(name)
                .ok_or_else(|| PipelineError::NotFound(format!("final task {name}")))?,
            None => definitions.len() - 1,
        };

        let tasks = definitions
            .into_iter()
            .zip(resolved)
            .enumerate()
            .map(|(index, (definition, dependency))| Task {
                index,
                definition,
                dependency,
            })
            .collect();

        Ok(Self { tasks, final_task })
    }

    /// All tasks in execution order.
    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn dependency_of(&self, task: &Task) -> Option<&Task> {
        task.dependency.map(|i| &self.tasks[i])
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// The task whose output is the user-facing report.
    pub fn final_task(&self) -> &Task {
        &self.tasks[self.final_task]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Rewire a dependency, bypassing validation.
    #[cfg(test)]
    pub(crate) fn set_dependency_unchecked(&mut self, task: usize, dependency: Option<usize>) {
        self.tasks[task].dependency = dependency;
    }
}
