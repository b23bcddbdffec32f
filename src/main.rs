use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sleephq_uploader::{api, archive, config, context, core::Orchestrator, logging, setup};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sleephq-uploader")]
#[command(about = "Uploads therapy device data to SleepHQ", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the import pipeline once: hash, upload, process, poll
    Run(RunArgs),
    /// Interactive first-run configuration
    Setup,
    /// Copy device files from the SD card into the dated archive and data dir
    Archive,
}

#[derive(Args, Serialize)]
struct RunArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    device_serial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    verbose: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    json_logs: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => {
            let config = config::AppConfig::load(&cli.config, Some(args))?;
            logging::init(logging::LogConfig {
                json: config.json_logs,
                verbose: config.verbose,
            });
            let ctx = context::AppContext::new(config);
            // The orchestrator reports its failure through the notification
            // sink; exit directly so the text is not printed a second time.
            if run_import(ctx).await.is_err() {
                std::process::exit(1);
            }
        }
        Commands::Setup => {
            logging::init(logging::LogConfig::default());
            setup::run(&cli.config).await.context("Setup failed")?
        }
        Commands::Archive => {
            let config = config::AppConfig::load::<()>(&cli.config, None)?;
            logging::init(logging::LogConfig {
                json: config.json_logs,
                verbose: config.verbose,
            });
            run_archive(&config)?
        }
    }

    Ok(())
}

async fn run_import(ctx: context::AppContext) -> Result<()> {
    let client = api::SleepHqClient::new(ctx.config.api_base.clone());
    Orchestrator::new(
        client,
        ctx.notifier.clone(),
        ctx.config.credentials(),
        ctx.config.data_dir.clone(),
    )
    .run()
    .await
}

fn run_archive(config: &config::AppConfig) -> Result<()> {
    let archive_config = config
        .archive
        .as_ref()
        .context("config has no [archive] section")?;
    let archived = archive::archive_device_files(archive_config, &config.data_dir)?;
    for path in archived {
        println!("Archived {}", path.display());
    }
    Ok(())
}
