use clap::Parser; // for cli
use std::process::ExitCode;

use course_search::config::{Args, Command};
use course_search::{client, server, telemetry};

// this is main async function with tokio
#[tokio::main]
async fn main() -> ExitCode {
    // parse cli arguments
    let args = Args::parse();
    telemetry::init_tracing(args.log_format);

    let result = match args.command {
        Command::Serve(serve) => server::serve(serve).await.map_err(|e| e.to_string()),
        Command::Client(opts) => client::run(opts).await.map_err(|e| e.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting");
            ExitCode::FAILURE
        }
    }
}
