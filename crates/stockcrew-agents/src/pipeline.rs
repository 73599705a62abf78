use std::sync::Arc;
use std::time::Instant;

use stockcrew_models::{AgentRequest, ExecutionResult, MarketContext, PriorOutput, TaskOutput};
use tracing::{info, warn};
use uuid::Uuid;

use crate::artifact::{ArtifactNamer, ArtifactStore};
use crate::context::RunContext;
use crate::error::{PipelineError, RunFailure};
use crate::graph::TaskGraph;
use crate::prompts::{render_template, template_vars};
use crate::registry::AgentRegistry;

/// Runs the task graph for one ticker at a time, strictly in declaration order.
///
/// Each task sees the full prior context: every earlier task's output, not
/// only its declared dependency. Failures abort the run and are never retried.
pub struct PipelineExecutor {
    registry: Arc<AgentRegistry>,
    graph: Arc<TaskGraph>,
    store: Arc<dyn ArtifactStore>,
}

impl PipelineExecutor {
    pub fn new(
        registry: Arc<AgentRegistry>,
        graph: Arc<TaskGraph>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            registry,
            graph,
            store,
        }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Bind a raw ticker and run. An invalid ticker fails before any agent is invoked.
    pub async fn kickoff(
        &self,
        raw_ticker: &str,
        market_context: Option<MarketContext>,
    ) -> Result<ExecutionResult, RunFailure> {
        let ctx = RunContext::bind(raw_ticker, market_context)
            .map_err(|error| RunFailure::before_run(error, raw_ticker))?;
        self.run(&ctx).await
    }

    /// Execute every task for `ctx`. On failure the partial result holds the
    /// outputs of the tasks that completed.
    pub async fn run(&self, ctx: &RunContext) -> Result<ExecutionResult, RunFailure> {
        let start = Instant::now();
        info!(
            ticker = %ctx.ticker(),
            run_id = %ctx.run_id(),
            tasks = self.graph.len(),
            enriched = ctx.market_context().is_some_and(|m| !m.is_empty()),
            "Starting pipeline run"
        );

        let mut result = ExecutionResult::new(ctx.run_id(), ctx.ticker());
        match self.execute(ctx, &mut result).await {
            Ok(()) => {
                info!(
                    ticker = %ctx.ticker(),
                    run_id = %ctx.run_id(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "Pipeline run complete"
                );
                Ok(result)
            }
            Err(error) => {
                warn!(
                    ticker = %ctx.ticker(),
                    run_id = %ctx.run_id(),
                    completed = result.len(),
                    error = %error,
                    "Pipeline run failed"
                );
                Err(RunFailure::new(error, result))
            }
        }
    }

    async fn execute(
        &self,
        ctx: &RunContext,
        result: &mut ExecutionResult,
    ) -> Result<(), PipelineError> {
        let vars = template_vars(ctx);

        for task in self.graph.all_tasks() {
            // 1. Dependency gate
            let dependency_output = match self.graph.dependency_of(task) {
                None => None,
                Some(dep) => {
                    let done = result.get(dep.name()).ok_or_else(|| {
                        PipelineError::DependencyNotSatisfied {
                            task: task.name().to_string(),
                            dependency: dep.name().to_string(),
                        }
                    })?;
                    Some(PriorOutput {
                        task: done.task.clone(),
                        agent: done.agent.clone(),
                        output: done.output.clone(),
                    })
                }
            };

            // 2. Build input from the run context and everything completed so far
            let agent = self.registry.get(task.agent())?;
            let request = AgentRequest {
                request_id: Uuid::new_v4(),
                run_id: ctx.run_id(),
                task: task.name().to_string(),
                ticker: ctx.ticker().to_string(),
                description: render_template(task.description(), &vars),
                expected_output: render_template(task.expected_output(), &vars),
                market_context: ctx.market_context().cloned(),
                dependency_output,
                prior_outputs: result.prior_outputs(),
            };

            // 3. Invoke
            info!(task = %task.name(), agent = %agent.name(), "Task started");
            let task_start = Instant::now();
            let output = agent.invoke(&request).await.map_err(|source| {
                warn!(task = %task.name(), agent = %agent.name(), error = %source, "Agent failed");
                PipelineError::AgentInvocation {
                    task: task.name().to_string(),
                    source,
                }
            })?;
            let elapsed_ms = task_start.elapsed().as_millis() as u64;
            info!(task = %task.name(), agent = %agent.name(), elapsed_ms, "Task complete");

            // 4. Record before persisting so a write failure keeps the text
            result.push(TaskOutput {
                task: task.name().to_string(),
                agent: agent.name().to_string(),
                output: output.clone(),
                elapsed_ms,
                artifact: None,
            });

            // 5. Persist
            if let Some(spec) = task.output_spec() {
                let name =
                    ArtifactNamer::new(spec.pattern.as_str()).name_for_run(ctx, task.name());
                let path = self.store.persist(&name, &output).await?;
                if let Some(entry) = result.get_mut(task.name()) {
                    entry.artifact = Some(path);
                }
            }
        }

        Ok(())
    }

    /// The user-facing report: the designated final task's output.
    pub fn report<'a>(&self, result: &'a ExecutionResult) -> Option<&'a str> {
        result
            .get(self.graph.final_task().name())
            .map(|o| o.output.as_str())
    }
}
