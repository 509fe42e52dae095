use clap::Parser;
use propanalyzer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
