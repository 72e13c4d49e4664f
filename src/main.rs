use clap::Parser;
use dipbuyer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
