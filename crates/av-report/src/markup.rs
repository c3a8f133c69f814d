//! HTML report rendering.

use crate::config::ReportConfig;
use crate::context::RenderContext;
use crate::error::{ReportError, Result};

use askama::Template;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Identifier of a compiled report template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateId {
    /// Header, summary cards and the detailed results table.
    #[default]
    Report,
    /// Summary cards only.
    Summary,
}

impl TemplateId {
    /// All known identifiers.
    pub const ALL: [TemplateId; 2] = [TemplateId::Report, TemplateId::Summary];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Report => "report",
            TemplateId::Summary => "summary",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                ReportError::TemplateError(format!(
                    "unknown template '{s}' (expected one of: report, summary)"
                ))
            })
    }
}

#[derive(Template)]
#[template(path = "report.html")]
struct FullReportTemplate<'a> {
    ctx: &'a RenderContext,
    generated_at: String,
}

#[derive(Template)]
#[template(path = "summary.html")]
struct SummaryTemplate<'a> {
    ctx: &'a RenderContext,
    generated_at: String,
}

/// Markup renderer.
pub struct MarkupRenderer {
    minify: bool,
}

impl MarkupRenderer {
    /// Create a renderer honoring the config's minify setting.
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            minify: config.should_minify(),
        }
    }

    /// Render a context through the named template.
    pub fn render(&self, ctx: &RenderContext, template: &str) -> Result<String> {
        let id: TemplateId = template.parse()?;
        self.render_id(ctx, id)
    }

    /// Render a context through a known template.
    pub fn render_id(&self, ctx: &RenderContext, id: TemplateId) -> Result<String> {
        let generated_at = ctx.generated_at_display();
        let html = match id {
            TemplateId::Report => FullReportTemplate { ctx, generated_at }.render()?,
            TemplateId::Summary => SummaryTemplate { ctx, generated_at }.render()?,
        };

        let output = if self.minify {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        debug!(
            template = %id,
            rows = ctx.tests.len(),
            bytes = output.len(),
            "Markup rendered"
        );
        Ok(output)
    }

    /// Render and write the report to `path`.
    pub fn write(&self, ctx: &RenderContext, template: &str, path: &Path) -> Result<()> {
        let html = self.render(ctx, template)?;
        std::fs::write(path, html.as_bytes()).map_err(|source| ReportError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = html.len(), "HTML report written");
        Ok(())
    }
}
