//! Configuration loading for av-core.
//!
//! Resolution order (highest to lowest priority):
//! 1. CLI flags (via [`SettingsOverrides`])
//! 2. Environment variables (`AV_INPUT`, `AV_OUTPUT_DIR`)
//! 3. Config file: `--config`, else `AV_CONFIG`, else `./atlasview.toml`
//!    when present
//! 4. Built-in defaults

use crate::logging::{event_names, Stage};

use av_report::{ReportConfig, ReportError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "atlasview.toml";

pub const ENV_CONFIG: &str = "AV_CONFIG";
pub const ENV_INPUT: &str = "AV_INPUT";
pub const ENV_OUTPUT_DIR: &str = "AV_OUTPUT_DIR";

pub const DEFAULT_INPUT: &str = "test-results.json";
pub const DEFAULT_HTML_FILE: &str = "test-report.html";
pub const DEFAULT_PDF_FILE: &str = "test-report.pdf";
pub const DEFAULT_CHART_FILE: &str = "test-results-chart.png";
pub const DEFAULT_TEMPLATE: &str = "report";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report settings: {0}")]
    Invalid(#[from] ReportError),
}

/// Shape of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub html_file: Option<PathBuf>,
    pub pdf_file: Option<PathBuf>,
    pub chart_file: Option<PathBuf>,
    pub template: Option<String>,
    pub parallel: Option<bool>,
    pub report: ReportConfig,
}

impl FileSettings {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::IoError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub html_file: Option<PathBuf>,
    pub pdf_file: Option<PathBuf>,
    pub chart_file: Option<PathBuf>,
    pub template: Option<String>,
    pub title: Option<String>,
    /// `true` forces parallel branches; `false` leaves the lower layers alone.
    pub parallel: bool,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub html_file: PathBuf,
    pub pdf_file: PathBuf,
    pub chart_file: PathBuf,
    pub template: String,
    pub parallel: bool,
    pub report: ReportConfig,
    /// Config file that contributed, if any.
    pub config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            html_file: PathBuf::from(DEFAULT_HTML_FILE),
            pdf_file: PathBuf::from(DEFAULT_PDF_FILE),
            chart_file: PathBuf::from(DEFAULT_CHART_FILE),
            template: DEFAULT_TEMPLATE.to_string(),
            parallel: false,
            report: ReportConfig::default(),
            config_path: None,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn resolve<F>(overrides: &SettingsOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        // Explicit paths must exist; the implicit one is optional.
        let config_path = match (&overrides.config, lookup(ENV_CONFIG)) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(path)) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        if let Some(path) = config_path {
            let file = FileSettings::load(&path)?;
            settings.apply_file(file);
            info!(
                event = event_names::CONFIG_LOADED,
                stage = %Stage::Init,
                config_path = %path.display(),
                "Config file loaded"
            );
            settings.config_path = Some(path);
        } else {
            debug!(
                event = event_names::CONFIG_DEFAULT_USED,
                stage = %Stage::Init,
                "No config file, using built-in defaults"
            );
        }

        if let Some(input) = lookup(ENV_INPUT).filter(|v| !v.is_empty()) {
            settings.input = PathBuf::from(input);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            settings.output_dir = PathBuf::from(dir);
        }

        settings.apply_overrides(overrides);
        settings.report.validate()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(input) = file.input {
            self.input = input;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(html) = file.html_file {
            self.html_file = html;
        }
        if let Some(pdf) = file.pdf_file {
            self.pdf_file = pdf;
        }
        if let Some(chart) = file.chart_file {
            self.chart_file = chart;
        }
        if let Some(template) = file.template {
            self.template = template;
        }
        if let Some(parallel) = file.parallel {
            self.parallel = parallel;
        }
        self.report = file.report;
    }

    fn apply_overrides(&mut self, cli: &SettingsOverrides) {
        if let Some(input) = &cli.input {
            self.input = input.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(html) = &cli.html_file {
            self.html_file = html.clone();
        }
        if let Some(pdf) = &cli.pdf_file {
            self.pdf_file = pdf.clone();
        }
        if let Some(chart) = &cli.chart_file {
            self.chart_file = chart.clone();
        }
        if let Some(template) = &cli.template {
            self.template = template.clone();
        }
        if let Some(title) = &cli.title {
            self.report.title = title.clone();
        }
        if cli.parallel {
            self.parallel = true;
        }
    }

    /// Destination of the HTML report. Absolute file names ignore the
    /// output directory.
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file)
    }

    /// Destination of the PDF report.
    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join(&self.pdf_file)
    }

    /// Destination of the chart image.
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file)
    }
}
