use clap::Parser;
use esteira::cli::{self, Args};
use esteira::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match logging::init(args.verbose) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("failed to initialize logging: {:#}", error);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}
