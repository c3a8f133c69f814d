//! AtlasView core library.
//!
//! This library provides the orchestration side of report generation:
//! - Exit codes for CLI operations
//! - Configuration resolution (CLI > env > config file > defaults)
//! - Structured logging setup and the pipeline event vocabulary
//! - The report pipeline that loads, aggregates and renders
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;
