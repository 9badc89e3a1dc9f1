//! SIDRA municipal panel CLI.

use clap::Parser;
use sidra_cli::cli::{Cli, Command};
use sidra_cli::commands::{run_build, run_plan};
use sidra_cli::logging::init_logging;
use sidra_cli::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Build(args) => match run_build(args) {
            Ok(outcome) => {
                print_summary(&outcome, args.top);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Plan => {
            run_plan();
            0
        }
    };
    std::process::exit(exit_code);
}
