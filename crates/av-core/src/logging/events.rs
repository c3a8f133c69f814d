//! Stable event vocabulary for pipeline logs.
//!
//! Every pipeline event carries an `event` name from [`event_names`], the
//! [`Stage`] it belongs to and the run's correlation ID, so JSONL logs can
//! be filtered without parsing messages.

use serde::{Deserialize, Serialize};
use tracing::Span;

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the input dataset.
    Load,
    /// Computing the summary.
    Aggregate,
    /// HTML report.
    Markup,
    /// Pie chart.
    Chart,
    /// PDF report.
    Document,
    /// Run teardown and reporting.
    Finish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Aggregate => "aggregate",
            Stage::Markup => "markup",
            Stage::Chart => "chart",
            Stage::Document => "document",
            Stage::Finish => "finish",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Input
    pub const LOAD_STARTED: &str = "load.started";
    pub const LOAD_FINISHED: &str = "load.finished";
    pub const LOAD_FAILED: &str = "load.failed";
    pub const SUMMARY_COMPUTED: &str = "aggregate.summary_computed";
    pub const UNRECOGNIZED_STATUS: &str = "aggregate.unrecognized_status";

    // Artifacts
    pub const ARTIFACT_WRITTEN: &str = "artifact.written";
    pub const ARTIFACT_FAILED: &str = "artifact.failed";
    pub const ARTIFACT_SKIPPED: &str = "artifact.skipped";
}

/// Correlation context for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: String,
}

impl RunContext {
    /// Context with a freshly generated run ID.
    pub fn new() -> Self {
        Self {
            run_id: super::generate_run_id(),
        }
    }

    /// Context with a caller-chosen run ID.
    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    /// Span covering the whole run.
    pub fn span(&self) -> Span {
        tracing::info_span!("run", run_id = %self.run_id)
    }

    /// Span covering one stage of the run.
    pub fn stage_span(&self, stage: Stage) -> Span {
        tracing::debug_span!("stage", run_id = %self.run_id, stage = %stage)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
