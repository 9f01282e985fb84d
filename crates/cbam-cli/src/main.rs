#![forbid(unsafe_code)]

//! CBAM CLI
//!
//! Serve the estimator over HTTP, run one-off estimates, or list the
//! reference catalogs.

use anyhow::Result;
use cbam_core::RawEstimateRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::CatalogKind;
use config::{CbamConfig, Overrides};

/// CBAM CO₂ emissions estimator
#[derive(Parser, Debug)]
#[command(name = "cbam", author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CBAM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reference data directory
    #[arg(long, env = "EMISSIONS_FILE", global = true)]
    emissions: Option<PathBuf>,

    /// Trade API subscription key
    #[arg(long, env = "COMTRADE_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Estimate emissions for one selection
    Estimate {
        /// Four-digit year
        #[arg(long, default_value = "2021")]
        year: String,
        /// Reporter as `Name|ID`
        #[arg(long)]
        reporter: String,
        /// `M` (import) or `X` (export)
        #[arg(long, default_value = "M")]
        flow: String,
        /// Commodity as `Code|Description`
        #[arg(long)]
        hs: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a reference catalog
    Catalog {
        /// Which catalog
        #[arg(value_enum)]
        kind: CatalogKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "debug"
    } else {
        "info,cbam=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut overrides = Overrides {
        emissions: args.emissions,
        api_key: args.api_key,
        ..Overrides::default()
    };
    if let Command::Serve { host, port } = &args.command {
        overrides.host = host.clone();
        overrides.port = *port;
    }
    let config = CbamConfig::load(args.config.as_deref())?.apply(overrides);

    match args.command {
        Command::Serve { .. } => commands::serve(config).await,
        Command::Estimate {
            year,
            reporter,
            flow,
            hs,
            json,
        } => {
            let raw = RawEstimateRequest {
                year,
                reporter,
                flow_code: flow,
                hs_code_desc: hs,
            };
            commands::estimate(config, raw, json).await
        }
        Command::Catalog { kind } => commands::catalog(&config, kind),
    }
}
