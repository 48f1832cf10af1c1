//! `ontomap`: ontology mapping curation from the command line.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use onto_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use onto_cli::commands::{run_edit, run_lookup, run_search, run_suggest, run_types};
use onto_cli::config::AppConfig;
use onto_cli::logging::{LogConfig, LogFormat, init_logging};
use onto_cli::summary::{
    print_edit_summary, print_entity_types, print_lookup_results, print_search_results,
    print_suggest_summary,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    match &cli.command {
        Command::Suggest(args) => print_suggest_summary(&run_suggest(args, &config)?),
        Command::Edit(args) => print_edit_summary(&run_edit(args, &config)?),
        Command::Search(args) => print_search_results(&run_search(args, &config)?),
        Command::Lookup(args) => print_lookup_results(&args.input, &run_lookup(args, &config)?),
        Command::Types(args) => print_entity_types(&run_types(args)?),
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level(cli.verbosity.tracing_level_filter())
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_log_file(cli.log_file.clone());
    if let Some(level) = cli.log_level {
        config = config.with_level(match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        });
    }
    config = config.with_format(match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    });
    config.with_ansi(match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    })
}
