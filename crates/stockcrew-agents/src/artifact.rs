//! Naming and persistence of task artifacts.
//!
//! Names are rendered from an [`OutputSpec`](stockcrew_models::OutputSpec)
//! pattern. Every interpolated value is sanitized: ASCII letters, ASCII
//! digits, `-` and `_` are kept, any other character becomes `_`, and an
//! empty value becomes `_`. The literal parts of the pattern are kept as
//! written, so `{ticker}_{timestamp}.md` still ends in `.md`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::info;
use uuid::Uuid;

use crate::context::RunContext;
use crate::error::PipelineError;
use crate::prompts::placeholders;

/// Minute resolution: `MMDD_HHMM`.
pub const TIMESTAMP_FORMAT: &str = "%m%d_%H%M";

/// Placeholders an output pattern may reference.
pub const PATTERN_VARIABLES: [&str; 4] = ["ticker", "timestamp", "task", "run_id"];

/// Derives artifact file names from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNamer {
    pattern: String,
}

impl ArtifactNamer {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Reject patterns with unknown placeholders or path separators.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.pattern.trim().is_empty() {
            return Err(PipelineError::InvalidGraph(
                "artifact pattern must not be empty".to_string(),
            ));
        }
        if self.pattern.contains('/') || self.pattern.contains('\\') {
            return Err(PipelineError::InvalidGraph(format!(
                "artifact pattern {:?} must be a bare file name",
                self.pattern
            )));
        }
        for name in placeholders(&self.pattern) {
            if !PATTERN_VARIABLES.contains(&name.as_str()) {
                return Err(PipelineError::InvalidGraph(format!(
                    "artifact pattern {:?} references unknown placeholder {{{name}}}",
                    self.pattern
                )));
            }
        }
        Ok(())
    }

    /// Name for `task`'s artifact. Deterministic in its inputs; a `{run_id}`
    /// placeholder renders as `_` here, use [`name_for_run`](Self::name_for_run)
    /// to fill it.
    pub fn name(&self, ticker: &str, timestamp: NaiveDateTime, task: &str) -> String {
        self.render(ticker, timestamp, task, None)
    }

    /// Name for `task`'s artifact in the given run.
    pub fn name_for_run(&self, ctx: &RunContext, task: &str) -> String {
        self.render(
            ctx.ticker(),
            ctx.started_at().naive_local(),
            task,
            Some(ctx.run_id()),
        )
    }

    fn render(
        &self,
        ticker: &str,
        timestamp: NaiveDateTime,
        task: &str,
        run_id: Option<Uuid>,
    ) -> String {
        let timestamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
        let run_id = run_id.map(|id| id.simple().to_string()).unwrap_or_default();

        self.pattern
            .replace("{ticker}", &sanitize(ticker))
            .replace("{timestamp}", &sanitize(&timestamp))
            .replace("{task}", &sanitize(task))
            .replace("{run_id}", &sanitize(&run_id))
    }
}

impl Default for ArtifactNamer {
    fn default() -> Self {
        Self::new(stockcrew_models::DEFAULT_ARTIFACT_PATTERN)
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize(value: &str) -> String {
    if value.is_empty() {
        return "_".to_string();
    }
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Destination for persisted task outputs.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `contents` under `name`, returning where it landed.
    async fn persist(&self, name: &str, contents: &str) -> Result<PathBuf, PipelineError>;
}

/// Writes artifacts as files in a directory. The directory must exist.
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn persist(&self, name: &str, contents: &str) -> Result<PathBuf, PipelineError> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| PipelineError::ArtifactPersist {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), bytes = contents.len(), "Artifact written");
        Ok(path)
    }
}
