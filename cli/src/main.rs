mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{chart, cities, domain, render};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Domain(args) => domain::run(&cli, args),
        Commands::Cities(args) => cities::run(&cli, args),
        Commands::Chart(args) => chart::run(&cli, args),
    }
}

/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> { run() }
