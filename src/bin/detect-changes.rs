//! Detect Changes CLI Binary
//!
//! Reports which mono-repository modules changed between the commits of the
//! current CI trigger.

use clap::{CommandFactory, Parser};
use detect_changes::cli::{map_error, Cli, RunContext};
use detect_changes::config::ConfigLoader;
use detect_changes::error::DetectError;
use detect_changes::logging::{init_logging, LoggingConfig};
use detect_changes::report::OutputSink;
use detect_changes::resolve::EventContext;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let invocation = match cli.invocation() {
        Ok(invocation) => invocation,
        Err(e) => return fail(&e),
    };

    let context = match RunContext::new(cli.repository.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            return fail(&e);
        }
    };

    let event = EventContext::from_env();
    let sink = OutputSink::from_env();
    let mut stdout = std::io::stdout().lock();

    match context.execute(&invocation, &event, &sink, &mut stdout) {
        Ok(report) => {
            info!(
                modules = report.len(),
                any_changed = report.any_changed(),
                "Change detection completed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Change detection failed: {}", e);
            fail(&e)
        }
    }
}

/// Report `e` on stderr. Usage errors also print the usage line, since
/// nothing was detected or written.
fn fail(e: &DetectError) -> ExitCode {
    eprintln!("{}", map_error(e));
    if e.is_usage() {
        eprintln!("{}", Cli::command().render_usage());
    }
    ExitCode::FAILURE
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::load(&cli.repository, cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.level = "off".to_string();
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
