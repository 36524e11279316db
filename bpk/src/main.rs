// bpk/src/main.rs
use std::fs;
use std::process;
use std::sync::Arc;

use bpk_common::config::Config;
use bpk_common::error::{BpkError, Result as BpkResult};
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

fn init_logging(cli_args: &CliArgs) {
    let level_filter = match cli_args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::WARN);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("BPK_LOG")
        .from_env_lossy();

    match (&cli_args.log_dir, cli_args.verbose > 0) {
        (Some(log_dir), true) => {
            if let Err(e) = fs::create_dir_all(log_dir) {
                eprintln!(
                    "{} Failed to create log directory {}: {}",
                    "Error:".red().bold(),
                    log_dir.display(),
                    e
                );
            }
            let file_appender = tracing_appender::rolling::daily(log_dir, "bpk.log");
            let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

            let stderr_writer = std::io::stderr.with_max_level(max_log_level);
            let file_writer = non_blocking_appender.with_max_level(max_log_level);

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(stderr_writer.and(file_writer))
                .with_ansi(true)
                .without_time()
                .try_init();

            Box::leak(Box::new(guard)); // Keep guard alive

            debug!(
                "Verbose logging enabled. Writing logs to: {}/bpk.log",
                log_dir.display()
            );
        }
        _ => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .without_time()
                .try_init();
        }
    }
}

#[tokio::main]
async fn main() -> BpkResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(&cli_args);

    let config = Config::load(cli_args.project.overrides()).map_err(|e| {
        BpkError::Config(format!("Could not load config: {e}"))
    })?;
    let registry = Arc::new(cli_args.project.registry());
    debug!("Subset hooks: {:?}", registry);

    if let Err(e) = cli_args.command.run(&config, registry).await {
        debug!("Command failed: {:#}", e);
        // Fatal run errors were already shown by the status display.
        if !e.is_fatal() {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
        }
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
