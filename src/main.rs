use clap::Parser;
use quickshare::cli::CliArgs;
use quickshare::config::Config;
use quickshare::{driver, logging};
use std::process;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Load configuration for the run
    let mut config = match Config::load_with_override(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            if args.config.is_some() {
                eprintln!("{e}");
                process::exit(1);
            }
            eprintln!("Warning: Failed to load configuration ({e}), using defaults");
            Config::default()
        }
    };

    config.apply_cli(&args);

    if let Err(e) = config.validate() {
        eprintln!("{e}");
        process::exit(1);
    }

    if let Err(e) = logging::init_logging(&config, args.verbose) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    if let Err(e) = driver::run(config).await {
        eprintln!("{e}");
        process::exit(1);
    }
}
