use std::process::ExitCode;

use clap::Parser;

mod ui;

fn main() -> ExitCode {
    let cli = ui::cli::Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();
    log::info!("Application started");

    match ui::app::launch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Exiting after fatal error: {:?}", err);
            eprintln!("pairflip: {}", err);
            ExitCode::FAILURE
        }
    }
}
