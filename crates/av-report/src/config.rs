//! Report configuration types.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Default report title used by both documents.
pub const DEFAULT_TITLE: &str = "Test Report";

/// Default text shown when a record carries no error.
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Pie chart raster settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    /// Raster width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: u32,
    /// Raster height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// Title drawn above the pie.
    #[serde(default = "default_chart_title")]
    pub title: String,
}

fn default_chart_width() -> u32 {
    600
}

fn default_chart_height() -> u32 {
    400
}

fn default_chart_title() -> String {
    "Test Results Overview".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            title: default_chart_title(),
        }
    }
}

/// PDF layout settings. Units are PDF points (1/72 inch).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    /// Display width of the embedded chart.
    #[serde(default = "default_chart_display_width")]
    pub chart_display_width: f32,
    #[serde(default = "default_page_width")]
    pub page_width: f32,
    #[serde(default = "default_page_height")]
    pub page_height: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f32,
    #[serde(default = "default_body_font_size")]
    pub body_font_size: f32,
}

fn default_chart_display_width() -> f32 {
    400.0
}

// A4 portrait.
fn default_page_width() -> f32 {
    595.0
}

fn default_page_height() -> f32 {
    842.0
}

fn default_margin() -> f32 {
    36.0
}

fn default_title_font_size() -> f32 {
    18.0
}

fn default_body_font_size() -> f32 {
    10.0
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            chart_display_width: default_chart_display_width(),
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin: default_margin(),
            title_font_size: default_title_font_size(),
            body_font_size: default_body_font_size(),
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Color theme for the HTML report.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Text rendered in place of a missing error.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Minify HTML output. `None` minifies in release builds only.
    #[serde(default)]
    pub minify: Option<bool>,
    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
    /// PDF settings.
    #[serde(default)]
    pub document: DocumentConfig,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: default_title(),
            theme: ReportTheme::default(),
            placeholder: default_placeholder(),
            minify: None,
            chart: ChartConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the missing-error placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Force minification on or off.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    /// Whether HTML output should be minified.
    pub fn should_minify(&self) -> bool {
        self.minify.unwrap_or(!cfg!(debug_assertions))
    }

    /// Reject settings no renderer can honor.
    pub fn validate(&self) -> Result<()> {
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ReportError::InvalidConfig(format!(
                "chart size must be non-zero, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        if self.placeholder.is_empty() {
            return Err(ReportError::InvalidConfig(
                "placeholder must not be empty".to_string(),
            ));
        }
        let doc = &self.document;
        if doc.chart_display_width <= 0.0 {
            return Err(ReportError::InvalidConfig(
                "chart display width must be positive".to_string(),
            ));
        }
        if doc.page_width <= 2.0 * doc.margin || doc.page_height <= 2.0 * doc.margin {
            return Err(ReportError::InvalidConfig(format!(
                "margins of {} leave no room on a {}x{} page",
                doc.margin, doc.page_width, doc.page_height
            )));
        }
        if doc.body_font_size <= 0.0 || doc.title_font_size <= 0.0 {
            return Err(ReportError::InvalidConfig(
                "font sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
