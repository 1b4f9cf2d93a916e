use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use tracing_subscriber::filter::LevelFilter as TraceLevel;

mod bot;
mod scores;
mod simulate;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Autoplay seeded rounds and print how each one ended
    Simulate(simulate::SimulateArgs),
    /// Read or update a score file
    #[command(subcommand)]
    Scores(scores::ScoresCommand),
}

fn init_logging(level: LevelFilter) {
    let level = match level {
        LevelFilter::Off => TraceLevel::OFF,
        LevelFilter::Error => TraceLevel::ERROR,
        LevelFilter::Warn => TraceLevel::WARN,
        LevelFilter::Info => TraceLevel::INFO,
        LevelFilter::Debug => TraceLevel::DEBUG,
        LevelFilter::Trace => TraceLevel::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());
    log::debug!("{:?}", args.command);

    match args.command {
        Command::Simulate(simulate_args) => simulate::run(&simulate_args),
        Command::Scores(command) => scores::run(command),
    }
}
