//! phone-compare binary - browse, compare and administer the phone catalog.

use clap::Parser;
use phone_compare::cli::{run, Cli};

fn main() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
