//! Report renderers for AtlasView test results.
//!
//! Turns a loaded result set and its [`Summary`](av_common::Summary) into
//! three artifacts:
//!
//! - **Markup report**: an HTML page rendered through a compiled template
//!   selected by identifier (`report` or `summary`)
//! - **Chart**: a PNG pie chart of the passed/failed/skipped distribution
//! - **Document report**: a paginated PDF embedding the chart, a summary
//!   table and the per-test table
//!
//! Every renderer takes the summary by reference, so all artifacts of one
//! run show the same counts.
//!
//! # Example
//!
//! ```no_run
//! use av_report::{ChartRenderer, DocumentRenderer, MarkupRenderer, RenderContext, ReportConfig};
//! use std::path::Path;
//!
//! let results = av_common::load_results(Path::new("test-results.json")).unwrap();
//! let summary = results.summarize();
//! let config = ReportConfig::default();
//!
//! let ctx = RenderContext::new(results.as_slice(), &summary, &config);
//! MarkupRenderer::new(&config)
//!     .write(&ctx, "report", Path::new("test-report.html"))
//!     .unwrap();
//!
//! let chart = ChartRenderer::new(&config.chart)
//!     .unwrap()
//!     .render(&summary, Path::new("test-results-chart.png"))
//!     .unwrap();
//! DocumentRenderer::new(&config)
//!     .render(&summary, results.as_slice(), &chart, Path::new("test-report.pdf"))
//!     .unwrap();
//! ```

pub mod chart;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod markup;
pub mod sections;

pub use chart::ChartRenderer;
pub use config::{ChartConfig, DocumentConfig, ReportConfig, ReportTheme};
pub use context::RenderContext;
pub use document::DocumentRenderer;
pub use error::{ReportError, Result};
pub use markup::{MarkupRenderer, TemplateId};
