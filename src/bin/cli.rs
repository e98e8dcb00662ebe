//! alepe-watch CLI
//!
//! Local execution entry point. For the HTTP trigger surface, use
//! `alepe-watch-serve`.

use std::path::PathBuf;

use alepe_watch::{
    config,
    error::Result,
    models::{RunStatus, SourceMode},
    pipeline,
    storage::{LocalStateStore, StateStore},
};
use clap::{Parser, Subcommand};

/// alepe-watch - ALEPE proposition change watcher
#[derive(Parser, Debug)]
#[command(
    name = "alepe-watch",
    version,
    about = "Watches a legislative proposition and emails a summary when it changes"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the fetch → compare → notify → save pipeline once
    Run {
        /// Use the open-data API instead of page scraping
        #[arg(long)]
        opendata: bool,

        /// Document id (page mode)
        #[arg(long)]
        docid: Option<String>,

        /// Proposition type code (page mode)
        #[arg(long)]
        tipoprop: Option<String>,

        /// Proposition category, e.g. "projetos" (opendata mode)
        #[arg(long)]
        proposicao: Option<String>,

        /// Proposition number (opendata mode)
        #[arg(long)]
        numero: Option<String>,

        /// Proposition year (opendata mode)
        #[arg(long)]
        ano: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show the last persisted state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            opendata,
            docid,
            tipoprop,
            proposicao,
            numero,
            ano,
        } => {
            let mut cfg = config::load(&cli.config);

            if opendata {
                cfg.watch.source = SourceMode::Opendata;
            }
            if docid.is_some() {
                cfg.watch.docid = docid;
            }
            if tipoprop.is_some() {
                cfg.watch.tipoprop = tipoprop;
            }
            if proposicao.is_some() {
                cfg.watch.proposicao = proposicao;
            }
            if numero.is_some() {
                cfg.watch.numero = numero;
            }
            if ano.is_some() {
                cfg.watch.ano = ano;
            }

            let result = pipeline::run_once(&cfg).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if result.status == RunStatus::Error {
                std::process::exit(1);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let cfg = config::load(&cli.config);
            if let Err(e) = cfg.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", cfg.proposition_id()?.label());
        }

        Command::Info => {
            let cfg = config::load(&cli.config);
            let store = LocalStateStore::new(&cfg.watch.state_path);
            log::info!("State file: {}", cfg.watch.state_path);

            if store.path().exists() {
                let state = store.load().await?;
                log::info!("Histórico: {} chars", state.historico.len());
                log::info!(
                    "Informações complementares: {} chars",
                    state.info_complementar.len()
                );
            } else {
                log::info!("No state recorded yet (first run pending).");
            }
        }
    }

    Ok(())
}
