use std::process::ExitCode;

use bind_memoizer_bin::{run, CliArgs};
use clap::Parser;
use logger::{Level, Logger, StdioLogger};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let logger = StdioLogger::with_level(if args.verbose {
        Level::Debug
    } else {
        Level::Info
    });

    let start_time = std::time::Instant::now();
    let result = run(&args, &logger, &mut std::io::stdout().lock());
    logger.debug(format!("finished in {}ms", start_time.elapsed().as_millis()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger.error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
