//! GeoNetwork connectivity and catalog state tool
//!
//! Usage:
//!   gn-ping ping
//!   gn-ping --url http://catalog:8080/geonetwork --gn-version 2.10 count --expect 0
//!   gn-ping purge
//!
//! Connection settings default to the `GN_*` environment variables.

use clap::{Parser, Subcommand};
use env_logger::Env;
use geonetwork_manager::geonetwork::client::{connect_from_config, CatalogClient};
use geonetwork_manager::geonetwork::config::GnConfig;
use geonetwork_manager::geonetwork::error::GnResult;
use geonetwork_manager::geonetwork::search::SearchRequest;
use geonetwork_manager::geonetwork::test_harness::{remove_all_metadata, DelayedSearch};
use geonetwork_manager::geonetwork::version::GnVersion;
use log::error;
use serde_json::json;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gn-ping")]
#[command(about = "Check and reset GeoNetwork catalogs")]
#[command(version)]
struct Cli {
    /// Service base URL (overrides GN_SERVICE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// User name (overrides GN_USERNAME)
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password (overrides GN_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Server version: V26, V28, V210, V3 (overrides GN_VERSION)
    #[arg(long, global = true)]
    gn_version: Option<String>,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and run the health check
    Ping,

    /// Count all metadata records
    Count {
        /// Wait (with retries) until the catalog holds this many records
        #[arg(long)]
        expect: Option<usize>,
    },

    /// Delete all metadata records and wait until the index is empty
    Purge,
}

fn load_config(cli: &Cli) -> GnResult<GnConfig> {
    let mut config = GnConfig::from_env()?;
    if let Some(url) = &cli.url {
        config = config.with_service_url(url.as_str());
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(tag) = &cli.gn_version {
        config = config.with_version(tag.parse::<GnVersion>()?);
    }
    Ok(config)
}

fn run(cli: &Cli) -> GnResult<serde_json::Value> {
    let config = load_config(cli)?;
    log::info!("{}", config.summary());

    let mut client = connect_from_config(&config)?;
    let verifier = DelayedSearch::with_policy(config.search_retry.clone())?.with_label("gn-ping");

    let result = match &cli.command {
        Commands::Ping => json!({
            "status": "ok",
            "url": config.service_url,
            "version": config.version,
        }),
        Commands::Count { expect: None } => {
            let response = client.search(&SearchRequest::new())?;
            json!({ "count": response.count() })
        }
        Commands::Count {
            expect: Some(expected),
        } => {
            let report = verifier.assert_count(*expected, &mut client, &SearchRequest::new())?;
            json!({ "count": expected, "report": report })
        }
        Commands::Purge => {
            let removed = remove_all_metadata(&mut client, &verifier)?;
            json!({ "removed": removed })
        }
    };

    Ok(result)
}

fn print_text(value: &serde_json::Value) {
    if let Some(map) = value.as_object() {
        for (key, v) in map {
            println!("{}: {}", key, v);
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(value) => {
            if cli.output == "json" {
                match serde_json::to_string_pretty(&value) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        error!("Failed to render output: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_text(&value);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            if cli.output == "json" {
                println!("{}", json!({ "status": "error", "message": e.to_string() }));
            }
            ExitCode::FAILURE
        }
    }
}
