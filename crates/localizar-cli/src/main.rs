//! Localizador CLI: validate and query an object repository
//!
//! ## Usage
//!
//! ```bash
//! localizador check "Object Repository"
//! localizador list "Object Repository" --scope Page_Home
//! localizador resolve "Object Repository" Page_Home/search_box --all
//! localizador match "Object Repository" Page_Home/search_box --attr tag=input
//! ```

use clap::Parser;
use localizador::{
    handlers, logging, Cli, CliConfig, CliResult, Commands, Reporter, Verbosity,
};
use localizar::LoadPolicy;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<bool> {
    let config = build_config(&cli)?;
    let use_color = config.color.should_color();
    logging::init_tracing(config.verbosity, use_color);

    let reporter = Reporter::new(use_color, config.verbosity.is_quiet());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Check(args) => {
            handlers::execute_check(&config, &reporter, &args, &mut out)?;
            Ok(true)
        }
        Commands::List(args) => {
            handlers::execute_list(&config, &reporter, &args, &mut out)?;
            Ok(true)
        }
        Commands::Show(args) => {
            handlers::execute_show(&config, &reporter, &args, &mut out)?;
            Ok(true)
        }
        Commands::Resolve(args) => {
            handlers::execute_resolve(&config, &reporter, &args, &mut out)?;
            Ok(true)
        }
        Commands::Match(args) => handlers::execute_match(&config, &reporter, &args, &mut out),
    }
}

/// Config file first, then command-line flags on top.
fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::new(),
    };

    if cli.quiet || cli.verbose > 0 {
        config = config.with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose));
    }
    if let Some(color) = cli.color {
        config = config.with_color(color.into());
    }
    if let Some(format) = cli.format {
        config = config.with_format(format.into());
    }
    if cli.skip_invalid {
        config = config.with_load_policy(LoadPolicy::SkipAndReport);
    }
    Ok(config)
}
