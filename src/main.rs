//! TSN Results Analyzer - command-line entry point
//!
//! Summarizes iperf3 throughput with and without traffic control, and ping
//! latency under background load, from a TSN emulation results tree.

use clap::{Parser, ValueEnum};
use std::process;
use tsn_results_analyzer::{
    cli::Cli,
    config::{display_config_summary, load_config},
    error::{AppError, ErrorReporter, Result},
    logging::Logger,
    output::OutputFormatterFactory,
    pipeline::{LatencyPipeline, ThroughputPipeline},
    Config, PKG_NAME, VERSION,
};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        let error = AppError::internal(format!("panic: {}", panic_info));
        eprintln!("{}", error.format_for_console(false));
        process::exit(error.exit_code());
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_color = cli.use_colors();
    let verbose = cli.verbose;

    let config = match load_config(cli.clone()) {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(use_color, verbose).report_error(&e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = run_application(&cli, &config) {
        ErrorReporter::new(config.enable_color, config.verbose).report_error(&e);
        process::exit(e.exit_code());
    }
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    let logger = Logger::with_config(PKG_NAME.to_string(), config);
    logger.set_session_id(uuid::Uuid::new_v4().to_string());
    if let Some(selection) = cli.pipeline.to_possible_value() {
        logger.add_context_field("pipeline", selection.get_name());
    }

    logger.debug(&format!("{} v{}", PKG_NAME, VERSION)).log();
    logger
        .debug("Configuration loaded")
        .field("summary", display_config_summary(config))
        .log();

    let formatter = OutputFormatterFactory::from_config(config);

    // A failed pipeline does not stop the other one; the first error decides the exit code.
    let mut deferred: Option<AppError> = None;
    let mut printed = false;

    if cli.pipeline.includes_throughput() {
        let rendered = ThroughputPipeline::new(config, &logger)
            .run()
            .and_then(|report| formatter.format_throughput_report(&report));
        match rendered {
            Ok(text) => {
                println!("{}", text);
                printed = true;
            }
            Err(e) => deferred = Some(e),
        }
    }

    if cli.pipeline.includes_latency() {
        let rendered = LatencyPipeline::new(config, &logger)
            .run()
            .and_then(|report| formatter.format_latency_report(&report));
        match rendered {
            Ok(text) => {
                if printed {
                    println!();
                }
                println!("{}", text);
            }
            Err(e) => {
                deferred.get_or_insert(e);
            }
        }
    }

    match deferred {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
