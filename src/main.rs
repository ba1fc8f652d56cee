use std::io::IsTerminal;

use clap::Parser;

use claudelint::cli::{Cli, ColorChoice, Commands};
use claudelint::commands::{run_check, run_init, run_rules};
use claudelint::logging;

fn stderr_ansi(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet, stderr_ansi(cli.color));

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(args, &cli),
        Commands::Init(args) => run_init(args),
        Commands::Rules => run_rules(),
    };

    std::process::exit(exit_code);
}
