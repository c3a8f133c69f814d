//! Report pipeline orchestration.
//!
//! Sequences load -> aggregate -> (markup | chart -> document). The summary
//! is computed once and both branches borrow it, so every artifact of a run
//! shows the same counts. Load failures abort the run before anything is
//! written; a failing branch never stops the other one.

use crate::config::Settings;
use crate::exit_codes::ExitCode;
use crate::logging::{event_names, RunContext, Stage};

use av_common::{load_results, ResultSet, Summary};
use av_report::{ChartRenderer, DocumentRenderer, MarkupRenderer, RenderContext, ReportError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Fatal pipeline errors. Renderer failures are not here; they end up in
/// the [`RunReport`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] av_common::Error),

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PipelineError::Load(e) => ExitCode::for_load_error(e),
            PipelineError::OutputDir { .. } => ExitCode::IoError,
        }
    }
}

/// Artifact produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Html,
    Chart,
    Pdf,
}

impl ArtifactKind {
    /// Human label used in console confirmations.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "HTML report",
            ArtifactKind::Chart => "Chart",
            ArtifactKind::Pdf => "PDF report",
        }
    }

    fn stage(&self) -> Stage {
        match self {
            ArtifactKind::Html => Stage::Markup,
            ArtifactKind::Chart => Stage::Chart,
            ArtifactKind::Pdf => Stage::Document,
        }
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactStatus {
    Written,
    Failed {
        /// Error kind, e.g. `render_failure`.
        error: String,
        message: String,
    },
    /// Not attempted because something it depends on failed.
    Skipped { reason: String },
    /// Not requested for this run.
    Disabled,
}

/// Outcome of one artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ArtifactStatus,
}

impl ArtifactOutcome {
    fn written(kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            status: ArtifactStatus::Written,
        }
    }

    fn failed(kind: ArtifactKind, path: PathBuf, err: &ReportError) -> Self {
        Self {
            kind,
            path,
            status: ArtifactStatus::Failed {
                error: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    fn skipped(kind: ArtifactKind, path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            status: ArtifactStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    fn disabled(kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            status: ArtifactStatus::Disabled,
        }
    }

    pub fn is_written(&self) -> bool {
        self.status == ArtifactStatus::Written
    }

    pub fn is_requested(&self) -> bool {
        self.status != ArtifactStatus::Disabled
    }

    fn log(&self, run_id: &str) {
        let path = self.path.display();
        let stage = self.kind.stage();
        match &self.status {
            ArtifactStatus::Written => info!(
                event = event_names::ARTIFACT_WRITTEN,
                %run_id, %stage, %path, "{} written", self.kind.label()
            ),
            ArtifactStatus::Failed { error, message } => error!(
                event = event_names::ARTIFACT_FAILED,
                %run_id, %stage, %path, error = %error, "{message}"
            ),
            ArtifactStatus::Skipped { reason } => warn!(
                event = event_names::ARTIFACT_SKIPPED,
                %run_id, %stage, %path, "{} skipped: {reason}", self.kind.label()
            ),
            ArtifactStatus::Disabled => debug!(%run_id, %stage, "{} disabled", self.kind.label()),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub input: PathBuf,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub summary: Summary,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl RunReport {
    /// Outcome for one artifact kind.
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactOutcome> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn written_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_written()).count()
    }

    pub fn requested_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_requested()).count()
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> ExitCode {
        let written = self.written_count();
        if written == self.requested_count() {
            ExitCode::Clean
        } else if written == 0 {
            ExitCode::AllFailed
        } else {
            ExitCode::PartialFail
        }
    }
}

/// Which branches to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub html: bool,
    /// Chart and PDF; the PDF embeds the chart.
    pub pdf: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            html: true,
            pdf: true,
        }
    }
}

/// End-to-end report pipeline for one run.
pub struct ReportPipeline {
    settings: Settings,
    selection: Selection,
    ctx: RunContext,
}

impl ReportPipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            selection: Selection::default(),
            ctx: RunContext::new(),
        }
    }

    /// Restrict the branches that run.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Use a caller-provided correlation context.
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run_id(&self) -> &str {
        &self.ctx.run_id
    }

    /// Load the input and compute its summary.
    pub fn load(&self) -> Result<(ResultSet, Summary), PipelineError> {
        let run_id = &self.ctx.run_id;
        let input = &self.settings.input;

        let results = {
            let _stage = self.ctx.stage_span(Stage::Load).entered();
            debug!(
                event = event_names::LOAD_STARTED,
                %run_id,
                path = %input.display(),
                "Loading results"
            );
            load_results(input).inspect_err(|e| {
                error!(
                    event = event_names::LOAD_FAILED,
                    %run_id,
                    error = %e,
                    "Cannot load results"
                );
            })?
        };
        info!(
            event = event_names::LOAD_FINISHED,
            %run_id,
            path = %input.display(),
            records = results.len(),
            "Results loaded"
        );

        let _stage = self.ctx.stage_span(Stage::Aggregate).entered();
        let summary = results.summarize();
        let unrecognized = results.iter().filter(|r| r.has_unrecognized_status()).count();
        if unrecognized > 0 {
            debug!(
                event = event_names::UNRECOGNIZED_STATUS,
                %run_id,
                count = unrecognized,
                "Records with a status other than PASS/FAIL/SKIP counted as skipped"
            );
        }
        info!(
            event = event_names::SUMMARY_COMPUTED,
            %run_id,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Summary computed"
        );
        Ok((results, summary))
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let run_id = &self.ctx.run_id;
        let _run = self.ctx.span().entered();
        info!(
            event = event_names::RUN_STARTED,
            %run_id,
            input = %self.settings.input.display(),
            parallel = self.settings.parallel,
            "Report run started"
        );

        let (results, summary) = self.load()?;

        let out_dir = &self.settings.output_dir;
        if self.selection.html || self.selection.pdf {
            std::fs::create_dir_all(out_dir).map_err(|source| PipelineError::OutputDir {
                path: out_dir.clone(),
                source,
            })?;
        }

        let (html, [chart, pdf]) = if self.settings.parallel {
            self.run_parallel(&results, &summary)
        } else {
            (
                self.markup_branch(&results, &summary),
                self.chart_document_branch(&results, &summary),
            )
        };

        let artifacts = vec![html, chart, pdf];
        for artifact in &artifacts {
            artifact.log(run_id);
        }

        let report = RunReport {
            run_id: run_id.clone(),
            input: self.settings.input.clone(),
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            summary,
            artifacts,
        };
        info!(
            event = event_names::RUN_FINISHED,
            %run_id,
            stage = %Stage::Finish,
            written = report.written_count(),
            requested = report.requested_count(),
            duration_ms = report.duration_ms,
            "Report run finished"
        );
        Ok(report)
    }

    fn run_parallel(
        &self,
        results: &ResultSet,
        summary: &Summary,
    ) -> (ArtifactOutcome, [ArtifactOutcome; 2]) {
        std::thread::scope(|scope| {
            let markup = scope.spawn(|| self.markup_branch(results, summary));
            let document = self.chart_document_branch(results, summary);
            let html = markup.join().unwrap_or_else(|_| {
                let err = ReportError::TemplateError("markup thread panicked".to_string());
                ArtifactOutcome::failed(ArtifactKind::Html, self.settings.html_path(), &err)
            });
            (html, document)
        })
    }

    fn markup_branch(&self, results: &ResultSet, summary: &Summary) -> ArtifactOutcome {
        let path = self.settings.html_path();
        if !self.selection.html {
            return ArtifactOutcome::disabled(ArtifactKind::Html, path);
        }
        let _stage = self.ctx.stage_span(Stage::Markup).entered();

        let config = &self.settings.report;
        let ctx = RenderContext::new(results.as_slice(), summary, config);
        match MarkupRenderer::new(config).write(&ctx, &self.settings.template, &path) {
            Ok(()) => ArtifactOutcome::written(ArtifactKind::Html, path),
            Err(e) => ArtifactOutcome::failed(ArtifactKind::Html, path, &e),
        }
    }

    fn chart_document_branch(
        &self,
        results: &ResultSet,
        summary: &Summary,
    ) -> [ArtifactOutcome; 2] {
        let chart_path = self.settings.chart_path();
        let pdf_path = self.settings.pdf_path();
        if !self.selection.pdf {
            return [
                ArtifactOutcome::disabled(ArtifactKind::Chart, chart_path),
                ArtifactOutcome::disabled(ArtifactKind::Pdf, pdf_path),
            ];
        }

        let chart = {
            let _stage = self.ctx.stage_span(Stage::Chart).entered();
            render_chart(&self.settings.report.chart, summary, &chart_path)
        };
        let chart_path = match chart {
            Ok(path) => path,
            Err(e) => {
                return [
                    ArtifactOutcome::failed(ArtifactKind::Chart, chart_path, &e),
                    ArtifactOutcome::skipped(ArtifactKind::Pdf, pdf_path, "chart was not produced"),
                ];
            }
        };

        let _stage = self.ctx.stage_span(Stage::Document).entered();
        let pdf = DocumentRenderer::new(&self.settings.report).render(
            summary,
            results.as_slice(),
            &chart_path,
            &pdf_path,
        );
        let pdf = match pdf {
            Ok(path) => ArtifactOutcome::written(ArtifactKind::Pdf, path),
            Err(e) => ArtifactOutcome::failed(ArtifactKind::Pdf, pdf_path, &e),
        };
        [ArtifactOutcome::written(ArtifactKind::Chart, chart_path), pdf]
    }
}

fn render_chart(
    config: &av_report::ChartConfig,
    summary: &Summary,
    path: &Path,
) -> av_report::Result<PathBuf> {
    ChartRenderer::new(config)?.render(summary, path)
}
