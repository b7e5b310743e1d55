mod cli;
mod error;
mod extract;
mod models;
mod parser;
mod workbook;

use clap::Parser;

use cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = cli::convert::run(&cli.source, cli.output.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
