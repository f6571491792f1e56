use std::io;
use std::path::PathBuf;

use clap::Parser;

mod loader;
mod models;
mod pager;
mod prompt;
mod report;
mod session;
mod stats;

use prompt::Console;
use session::Next;

#[derive(Parser)]
#[command(name = "bikeshare-explorer")]
#[command(about = "Interactive descriptive statistics over US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("reading city data from {}", cli.data_dir.display());

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    while session::run_cycle(&mut console, &cli.data_dir)? == Next::Restart {}

    Ok(())
}
