// CLI binary entry point for tagscan

mod cli;

use clap::Parser;
use std::process;

fn main() {
    let config = cli::Config::parse();
    cli::logger::StderrLogger::setup(config.log_level());

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
