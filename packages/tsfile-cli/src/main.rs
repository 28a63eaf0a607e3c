use clap::Parser;
use tsfile::ParseOptions;

mod cli;
mod commands;
mod exit_codes;
mod output;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let options = ParseOptions {
        parallel_threshold: cli.parallel_threshold.max(1),
    };

    let exit_code = match cli.command {
        cli::Command::Validate(args) => commands::validate::execute(args, &options),
        cli::Command::Info(args) => commands::info::execute(args, &options),
        cli::Command::Convert(args) => commands::convert::execute(args, &options),
        cli::Command::Resample(args) => commands::resample::execute(args, &options),
    };

    std::process::exit(exit_code);
}
