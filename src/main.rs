use log::{debug, error, LevelFilter};

use std::path::Path;

use clap::Parser;

mod args;
mod dash;

use crate::args::{Args, Command};
use crate::dash::cache::WorkbookCache;
use crate::dash::{dashboard, error_chain, run_report, server, DashResult};

fn workbook_cache(input: &str, no_cache: bool) -> WorkbookCache {
    if no_cache {
        WorkbookCache::uncached(Path::new(input))
    } else {
        WorkbookCache::new(Path::new(input))
    }
}

async fn run(args: Args) -> DashResult<()> {
    match args.command {
        Command::Serve { bind, no_cache } => {
            server::run(workbook_cache(&args.input, no_cache), &bind).await
        }
        Command::Dashboard { bind, no_cache } => {
            dashboard::run(workbook_cache(&args.input, no_cache), &bind).await
        }
        Command::Report { out, reference } => run_report(&args.input, out, reference),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    if let Err(e) = run(args).await {
        let msg = error_chain(&e);
        error!("{}", msg);
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }
}
