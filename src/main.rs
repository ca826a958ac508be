mod cli;
mod commands;
mod config;
mod constants;
mod downloader;
mod error;
mod manifest;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Init => commands::init::init()?,
        Commands::Add {
            name,
            source,
            version,
            downloader,
        } => commands::add::add(name, source, version, downloader)?,
        Commands::Remove { name } => commands::remove::remove(&name)?,
        Commands::Fetch {
            name,
            version,
            dry_run,
        } => commands::fetch::fetch(&name, version, dry_run).await?,
        Commands::Sync { dry_run } => commands::sync::sync(dry_run).await?,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
