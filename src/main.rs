use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use idlewatch::clock::SystemClock;
use idlewatch::collectors::system::SystemCollector;
use idlewatch::config::Cli;
use idlewatch::logging;
use idlewatch::shutdown::SystemShutdown;
use idlewatch::view::Presenter;
use idlewatch::Monitor;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("idlewatch: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = cli.config();
    debug!(?config, "resolved configuration");

    let mut monitor = Monitor::new(
        config,
        SystemCollector::new(),
        SystemShutdown,
        SystemClock,
        Presenter::stdout(cli.output_format()),
    );

    match monitor.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
