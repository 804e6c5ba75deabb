//! posture - export compliance dashboard data as XLSX and PDF files.

mod cli;
mod commands;
mod config;
mod logging;
mod samples;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::Exporters;
use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::config_path()?,
    };
    let (config, origin) = AppConfig::load_from_path(&config_path)?;

    // Logging failures are not fatal; exports still run.
    let _guard = match AppConfig::logs_dir()
        .and_then(|dir| logging::init_logging(&dir, &config.log_level))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };
    origin.log(&config_path);

    let out_dir = match cli.out_dir {
        Some(dir) => dir,
        None => config.resolved_output_dir()?,
    };
    let exporters = Exporters::from_config(&config, out_dir);

    let saved = match cli.command {
        Commands::Sheet { input, name } => commands::sheet(&exporters, &input, name)?,
        Commands::Report { input } => commands::report(&exporters, &input).await?,
        Commands::Sample => commands::sample(&exporters).await?,
    };

    for path in saved {
        println!("{}", path.display());
    }
    Ok(())
}
