use colored::Colorize;
use std::io::{self, Write};
use std::process;

use ocsight::cli::{self, Dispatcher, VERSION};
use ocsight::config::Config;
use ocsight::error::FAILURE_EXIT_CODE;
use ocsight::file_discovery::FileDiscovery;
use ocsight::logging::init_logging;
use ocsight::runner::{RuntimeRunner, SystemSpawner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    // Help, version and usage errors never depend on configuration
    let parsed = cli::parse_invocation(std::env::args_os().skip(1));
    let request = match cli::answer(parsed, VERSION, &mut stdout, &mut stderr) {
        Ok(request) => request,
        Err(code) => {
            let _ = stdout.flush();
            process::exit(code);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Configuration error:".red(), e);
            process::exit(FAILURE_EXIT_CODE);
        }
    };

    let guard = init_logging(&config);

    let locator = FileDiscovery::new(config.resolver.clone());
    let runner = RuntimeRunner::new(
        SystemSpawner::new(config.runtime.forward_signals),
        config.runtime.candidates.clone(),
    );
    let dispatcher = Dispatcher::new(locator, runner);

    let code = dispatcher.execute(&request, &mut stderr).await;

    // process::exit skips destructors
    let _ = stdout.flush();
    drop(guard);
    process::exit(code);
}
