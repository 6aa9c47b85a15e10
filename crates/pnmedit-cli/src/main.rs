use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::Parser;
use pnmedit_cli::{run, Cli, RunError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    let stdout = io::stdout().lock();
    let result = match &cli.script {
        Some(path) => File::open(path)
            .map_err(|source| RunError::Script {
                path: path.clone(),
                source,
            })
            .and_then(|file| run(BufReader::new(file), stdout)),
        None => run(io::stdin().lock(), stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pnmedit: {err}");
            ExitCode::FAILURE
        }
    }
}
