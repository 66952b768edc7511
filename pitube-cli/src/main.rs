mod cli;
mod error;
mod logging;

use crate::{cli::Args, error::Result};
use clap::Parser;
use pitube_engine::{
    DispatchOptions, DispatchSummary, Dispatcher, EnvironmentOverride, HttpManifestFetcher,
    ManifestSource, Pipeline, ProcessRunner,
};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let guard = match logging::init_logging(args.verbose, args.quiet, args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = run(args).await;
    if let Err(e) = &result {
        error!("Application error: {}", e);
    }
    let code = exit_code(&result);

    // flush file logs before exiting
    drop(guard);
    process::exit(code);
}

async fn run(args: Args) -> Result<DispatchSummary> {
    let fetcher = HttpManifestFetcher::new(args.manifest_timeout())?;
    let source = ManifestSource::new(
        args.manifest_url.as_str(),
        args.local_manifest.as_path(),
        fetcher,
    )?;

    let runner = ProcessRunner::new().with_timeout(args.stream_timeout());
    let dispatcher = Dispatcher::new(runner).with_options(DispatchOptions {
        fail_fast: args.fail_fast,
        dry_run: args.dry_run,
    });

    let pipeline = Pipeline::new(source, EnvironmentOverride::from_process(), dispatcher);
    let summary = pipeline.run().await?;
    info!("done");
    Ok(summary)
}

/// Failed streams alone do not fail the run; only errors that stop it do.
fn exit_code(result: &Result<DispatchSummary>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
