//! AtlasView report generator.
//!
//! The main entry point for av-core, handling:
//! - Loading a test-result dataset and computing its summary
//! - Rendering the HTML report, the pie chart and the PDF report
//! - Per-artifact confirmations or a JSON run report on stdout

use av_common::{ErrorPayload, OutputFormat};
use av_core::config::{ConfigError, Settings, SettingsOverrides};
use av_core::exit_codes::ExitCode;
use av_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use av_core::pipeline::{ArtifactStatus, PipelineError, ReportPipeline, RunReport, Selection};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// AtlasView - HTML, chart and PDF reports from test results
#[derive(Parser)]
#[command(name = "av-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (TOML); defaults to $AV_CONFIG, then ./atlasview.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML report, chart and PDF report (default)
    Generate(GenerateArgs),
    /// Load and aggregate the input without writing any artifact
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Test results JSON file
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Directory receiving the artifacts
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// HTML report file name
    #[arg(long)]
    html: Option<PathBuf>,

    /// PDF report file name
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Chart image file name
    #[arg(long)]
    chart: Option<PathBuf>,

    /// HTML template (report or summary)
    #[arg(long)]
    template: Option<String>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Render the HTML and PDF branches concurrently
    #[arg(long)]
    parallel: bool,

    /// Do not write the HTML report
    #[arg(long)]
    skip_html: bool,

    /// Do not write the chart or the PDF report
    #[arg(long)]
    skip_pdf: bool,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Test results JSON file
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    if let Err(e) = init_logging(&log_config) {
        eprintln!("warning: logging disabled: {e}");
    }

    let exit_code = match cli.command {
        None => run_generate(&cli.global, &GenerateArgs::default()),
        Some(Commands::Generate(args)) => run_generate(&cli.global, &args),
        Some(Commands::Summary(args)) => run_summary(&cli.global, &args),
        Some(Commands::Version) => print_version(&cli.global),
    };

    if exit_code.is_error() {
        tracing::debug!(exit_code = %exit_code, "Exiting with error");
    }
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_generate(global: &GlobalOpts, args: &GenerateArgs) -> ExitCode {
    let overrides = SettingsOverrides {
        config: global.config.clone(),
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        html_file: args.html.clone(),
        pdf_file: args.pdf.clone(),
        chart_file: args.chart.clone(),
        template: args.template.clone(),
        title: args.title.clone(),
        parallel: args.parallel,
    };
    let settings = match Settings::load(&overrides) {
        Ok(settings) => settings,
        Err(e) => return output_config_error(global, &e),
    };

    let pipeline = ReportPipeline::new(settings).with_selection(Selection {
        html: !args.skip_html,
        pdf: !args.skip_pdf,
    });
    match pipeline.run() {
        Ok(report) => match output_run_report(global, &report) {
            Ok(()) => report.exit_code(),
            Err(code) => code,
        },
        Err(e) => output_pipeline_error(global, &e),
    }
}

fn run_summary(global: &GlobalOpts, args: &SummaryArgs) -> ExitCode {
    let overrides = SettingsOverrides {
        config: global.config.clone(),
        input: args.input.clone(),
        ..Default::default()
    };
    let settings = match Settings::load(&overrides) {
        Ok(settings) => settings,
        Err(e) => return output_config_error(global, &e),
    };

    let pipeline = ReportPipeline::new(settings);
    let (_, summary) = match pipeline.load() {
        Ok(loaded) => loaded,
        Err(e) => return output_pipeline_error(global, &e),
    };

    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "run_id": pipeline.run_id(),
                "input": pipeline.settings().input,
                "summary": summary,
                "pass_rate_pct": summary.pass_rate_pct(),
            });
            if let Err(code) = print_json(&payload) {
                return code;
            }
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Human => {
            println!("Input: {}", pipeline.settings().input.display());
            println!("Total Tests: {}", summary.total);
            println!("Passed: {}", summary.passed);
            println!("Failed: {}", summary.failed);
            println!("Skipped: {}", summary.skipped);
        }
    }
    ExitCode::Clean
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "av_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            if let Err(code) = print_json(&payload) {
                return code;
            }
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Human => println!("av-core {}", env!("CARGO_PKG_VERSION")),
    }
    ExitCode::Clean
}

// ============================================================================
// Output helpers
// ============================================================================

/// Print a JSON payload on stdout. A payload that cannot be serialized is
/// a bug, reported as an internal error.
fn print_json<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("error: cannot serialize output: {e}");
        ExitCode::InternalError
    })?;
    println!("{json}");
    Ok(())
}

/// JSON body of a `generate` run.
#[derive(Serialize)]
struct RunOutput<'a> {
    status: &'static str,
    report: &'a RunReport,
}

fn output_run_report(global: &GlobalOpts, report: &RunReport) -> Result<(), ExitCode> {
    match global.format {
        OutputFormat::Json => print_json(&RunOutput {
            status: report.exit_code().code_name(),
            report,
        }),
        OutputFormat::Exitcode => Ok(()),
        OutputFormat::Human => {
            println!("Summary: {}", report.summary);
            for artifact in &report.artifacts {
                let label = artifact.kind.label();
                let path = artifact.path.display();
                match &artifact.status {
                    ArtifactStatus::Written => println!("{label} generated: {path}"),
                    ArtifactStatus::Failed { message, .. } => {
                        eprintln!("{label} failed: {message}")
                    }
                    ArtifactStatus::Skipped { reason } => eprintln!("{label} skipped: {reason}"),
                    ArtifactStatus::Disabled => {}
                }
            }
            if !report.exit_code().is_success() {
                eprintln!(
                    "{} of {} artifacts written",
                    report.written_count(),
                    report.requested_count()
                );
            }
            Ok(())
        }
    }
}

fn output_pipeline_error(global: &GlobalOpts, error: &PipelineError) -> ExitCode {
    let exit_code = error.exit_code();
    match global.format {
        OutputFormat::Json => {
            let payload = match error {
                PipelineError::Load(e) => serde_json::to_value(ErrorPayload::from(e)),
                PipelineError::OutputDir { .. } => Ok(serde_json::json!({
                    "message": error.to_string(),
                })),
            };
            let body = serde_json::json!({
                "status": exit_code.code_name(),
                "error": payload.unwrap_or(serde_json::Value::Null),
            });
            match serde_json::to_string_pretty(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("error: {error}"),
            }
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Human => {
            eprintln!("error: {error}");
            if let PipelineError::Load(e) = error {
                eprintln!("hint: {}", e.remediation());
            }
        }
    }
    exit_code
}

fn output_config_error(global: &GlobalOpts, error: &ConfigError) -> ExitCode {
    let exit_code = match error {
        ConfigError::IoError { .. } => ExitCode::IoError,
        _ => ExitCode::ConfigError,
    };
    match global.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "status": exit_code.code_name(),
                "error": { "message": error.to_string() },
            });
            match serde_json::to_string_pretty(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("config error: {error}"),
            }
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Human => eprintln!("config error: {error}"),
    }
    exit_code
}
