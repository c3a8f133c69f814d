//! End-to-end CLI tests for av-core.
//!
//! Every test runs the binary inside its own temp directory with the
//! AtlasView environment variables cleared, so a developer's local config
//! never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SCENARIO_PASS_FAIL: &str = r#"{"tests":[
    {"name":"t1","status":"PASS","duration":"10ms"},
    {"name":"t2","status":"FAIL","duration":"5ms","error":"boom"}
]}"#;

const SCENARIO_SKIP: &str = r#"{"tests":[
    {"name":"a","status":"PASS","duration":"1ms"},
    {"name":"b","status":"SKIP","duration":"0ms"}
]}"#;

/// Get a Command for the av-core binary, isolated in `dir`.
fn av_core(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("av-core").expect("av-core binary should exist");
    cmd.current_dir(dir)
        .env_remove("AV_CONFIG")
        .env_remove("AV_INPUT")
        .env_remove("AV_OUTPUT_DIR")
        .env_remove("AV_LOG")
        .env_remove("AV_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace(input: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test-results.json"), input).unwrap();
    dir
}

// ============================================================================
// Generate
// ============================================================================

mod generate {
    use super::*;

    #[test]
    fn writes_all_artifacts() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .arg("generate")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("HTML report generated"))
            .stdout(predicate::str::contains("PDF report generated"))
            .stdout(predicate::str::contains("total=2 passed=1 failed=1 skipped=0"));

        for name in ["test-report.html", "test-report.pdf", "test-results-chart.png"] {
            assert!(dir.path().join(name).is_file(), "{name} should exist");
        }
        let pdf = std::fs::read(dir.path().join("test-report.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn no_subcommand_defaults_to_generate() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path()).assert().code(0);
        assert!(dir.path().join("test-report.html").is_file());
    }

    #[test]
    fn skip_status_counted_as_skipped() {
        let dir = workspace(SCENARIO_SKIP);
        av_core(dir.path())
            .arg("generate")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("total=2 passed=1 failed=0 skipped=1"));

        let html = std::fs::read_to_string(dir.path().join("test-report.html")).unwrap();
        assert!(html.contains("N/A"));
    }

    #[test]
    fn custom_paths_and_title() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        std::fs::rename(
            dir.path().join("test-results.json"),
            dir.path().join("nightly.json"),
        )
        .unwrap();

        av_core(dir.path())
            .args([
                "generate",
                "--input",
                "nightly.json",
                "--output-dir",
                "out",
                "--html",
                "nightly.html",
                "--title",
                "Nightly Run",
            ])
            .assert()
            .code(0);

        let html = std::fs::read_to_string(dir.path().join("out/nightly.html")).unwrap();
        assert!(html.contains("Nightly Run"));
        assert!(dir.path().join("out/test-report.pdf").is_file());
    }

    #[test]
    fn skip_html_writes_only_document() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--skip-html"])
            .assert()
            .code(0);
        assert!(!dir.path().join("test-report.html").exists());
        assert!(dir.path().join("test-report.pdf").is_file());
    }

    #[test]
    fn skip_pdf_writes_only_markup() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--skip-pdf"])
            .assert()
            .code(0);
        assert!(dir.path().join("test-report.html").is_file());
        assert!(!dir.path().join("test-results-chart.png").exists());
        assert!(!dir.path().join("test-report.pdf").exists());
    }

    #[test]
    fn parallel_run_matches_sequential() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--parallel"])
            .assert()
            .code(0);
        assert!(dir.path().join("test-report.html").is_file());
        assert!(dir.path().join("test-report.pdf").is_file());
    }

    #[test]
    fn unknown_template_fails_markup_only() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--template", "nope"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("HTML report failed"))
            .stderr(predicate::str::contains("2 of 3 artifacts written"));
        assert!(!dir.path().join("test-report.html").exists());
        assert!(dir.path().join("test-report.pdf").is_file());
    }

    #[test]
    fn summary_template_renders() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--template", "summary"])
            .assert()
            .code(0);
        let html = std::fs::read_to_string(dir.path().join("test-report.html")).unwrap();
        assert!(!html.contains("results-table"));
    }
}

// ============================================================================
// Fatal errors
// ============================================================================

mod fatal {
    use super::*;

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        av_core(dir.path())
            .args(["generate", "--input", "missing.json"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("missing.json"));

        for name in ["test-report.html", "test-report.pdf", "test-results-chart.png"] {
            assert!(!dir.path().join(name).exists(), "{name} must not be written");
        }
    }

    #[test]
    fn malformed_input() {
        let dir = workspace("{\"tests\": 42}");
        av_core(dir.path())
            .arg("generate")
            .assert()
            .code(13)
            .stderr(predicate::str::contains("hint:"));
        assert!(!dir.path().join("test-report.html").exists());
    }

    #[test]
    fn missing_explicit_config() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "--config", "absent.toml"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("config error"));
    }

    #[test]
    fn invalid_config_value() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        std::fs::write(
            dir.path().join("atlasview.toml"),
            "[report]\nplaceholder = \"\"\n",
        )
        .unwrap();
        av_core(dir.path()).arg("generate").assert().code(11);
    }

    #[test]
    fn unknown_flag_is_args_error() {
        let dir = tempfile::tempdir().unwrap();
        av_core(dir.path())
            .arg("--nonexistent-flag")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }
}

// ============================================================================
// Config file and environment
// ============================================================================

mod layering {
    use super::*;

    #[test]
    fn implicit_config_file_applies() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        std::fs::write(
            dir.path().join("atlasview.toml"),
            "output_dir = \"reports\"\n\n[report]\ntitle = \"From File\"\n",
        )
        .unwrap();

        av_core(dir.path())
            .args(["generate", "-v", "--log-format", "jsonl"])
            .assert()
            .code(0)
            .stderr(predicate::str::contains("config.loaded"))
            .stderr(predicate::str::contains("atlasview.toml"));
        let html = std::fs::read_to_string(dir.path().join("reports/test-report.html")).unwrap();
        assert!(html.contains("From File"));
    }

    #[test]
    fn cli_overrides_environment() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .env("AV_OUTPUT_DIR", "from-env")
            .args(["generate", "--output-dir", "from-cli"])
            .assert()
            .code(0);
        assert!(dir.path().join("from-cli/test-report.html").is_file());
        assert!(!dir.path().join("from-env").exists());
    }

    #[test]
    fn environment_input() {
        let dir = workspace(SCENARIO_SKIP);
        std::fs::rename(
            dir.path().join("test-results.json"),
            dir.path().join("env.json"),
        )
        .unwrap();
        av_core(dir.path())
            .env("AV_INPUT", "env.json")
            .arg("summary")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("Skipped: 1"));
    }
}

// ============================================================================
// Machine output
// ============================================================================

mod formats {
    use super::*;

    #[test]
    fn generate_json_report() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        let output = av_core(dir.path())
            .args(["--format", "json", "generate"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["status"], "OK_CLEAN");
        assert_eq!(json["report"]["summary"]["total"], 2);
        let artifacts = json["report"]["artifacts"].as_array().unwrap();
        assert_eq!(artifacts.len(), 3);
        assert!(artifacts.iter().all(|a| a["status"] == "written"));
    }

    #[test]
    fn summary_json() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        let output = av_core(dir.path())
            .args(["summary", "--format", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["passed"], 1);
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["summary"]["skipped"], 0);
        assert_eq!(json["pass_rate_pct"], 50.0);
        assert!(!dir.path().join("test-report.html").exists());
    }

    #[test]
    fn load_error_json_on_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let output = av_core(dir.path())
            .args(["--format", "json", "generate"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(12));
        assert!(output.stdout.is_empty());

        let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
        assert_eq!(json["status"], "ERR_INPUT_NOT_FOUND");
    }

    #[test]
    fn exitcode_format_is_silent() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["--format", "exitcode", "generate"])
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn version_json() {
        let dir = tempfile::tempdir().unwrap();
        av_core(dir.path())
            .args(["version", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("av_core_version"));
    }

    #[test]
    fn jsonl_logs_on_stderr() {
        let dir = workspace(SCENARIO_PASS_FAIL);
        av_core(dir.path())
            .args(["generate", "-v", "--log-format", "jsonl"])
            .assert()
            .code(0)
            .stderr(predicate::str::contains("aggregate.summary_computed"))
            .stderr(predicate::str::contains("config.loaded").not());
    }
}
