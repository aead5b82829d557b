//! Activity fan-out CLI
//!
//! Replays route payloads through the dispatcher against an in-memory store.
//!
//! ## Usage
//!
//! ```bash
//! # Replay flat activity payloads and print the resulting records
//! activity-fanout replay --users users.json --actions actions.json
//!
//! # Resolve the mentions in a piece of content
//! activity-fanout mentions --users users.json "thanks user/alice"
//!
//! # Print the effective configuration
//! activity-fanout --config fanout.toml config
//! ```
//!
//! `users.json` is an array of `{ "id": <number>, "username": <string> }`.
//! `actions.json` is an array of flat activity payloads in route form.

use activity_dispatch::{ActivityArgs, ActivityDispatcher, DispatcherConfig};
use activity_model::User;
use activity_store::InMemoryStore;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "activity-fanout")]
#[command(version, about = "Replay governance activity through the fan-out dispatcher")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "ACTIVITY_FANOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch a list of flat activity payloads
    Replay {
        /// JSON array of users to seed
        #[arg(long)]
        users: PathBuf,

        /// JSON array of activity payloads
        #[arg(long)]
        actions: PathBuf,

        /// Network used for payloads that omit one
        #[arg(long, env = "ACTIVITY_NETWORK")]
        network: Option<String>,
    },

    /// Print the user ids mentioned in content
    Mentions {
        /// JSON array of users to seed
        #[arg(long)]
        users: PathBuf,

        content: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = match &cli.config {
        Some(path) => DispatcherConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DispatcherConfig::default(),
    };

    match cli.command {
        Command::Replay { users, actions, network } => replay(config, &users, &actions, network).await,
        Command::Mentions { users, content } => mentions(config, &users, &content).await,
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn seeded_dispatcher(config: DispatcherConfig, users: &Path) -> anyhow::Result<(Arc<InMemoryStore>, ActivityDispatcher)> {
    let users: Vec<User> = read_json(users)?;
    let store = Arc::new(InMemoryStore::with_max_batch_ops(config.max_batch_ops));
    store.seed_users_into(&config.users_collection, &users);
    info!("Seeded {} users into '{}'", users.len(), config.users_collection);

    let dispatcher = ActivityDispatcher::from_config(store.clone(), config)?;
    Ok((store, dispatcher))
}

async fn replay(
    config: DispatcherConfig,
    users: &Path,
    actions: &Path,
    network: Option<String>,
) -> anyhow::Result<()> {
    let (store, dispatcher) = seeded_dispatcher(config, users)?;
    let payloads: Vec<ActivityArgs> = read_json(actions)?;

    let mut failed = 0usize;
    for (index, mut args) in payloads.into_iter().enumerate() {
        if args.network.trim().is_empty() {
            if let Some(default) = &network {
                args.network.clone_from(default);
            }
        }

        match dispatcher.record(args).await {
            Ok(report) => {
                println!("#{index}: {report}");
                for outcome in report.outcomes() {
                    println!("  {outcome}");
                }
                failed += report.failures().count();
            }
            Err(e) => {
                println!("#{index}: rejected ({e})");
                failed += 1;
            }
        }
    }

    let collection = &dispatcher.config().activities_collection;
    let records: Vec<_> = store
        .documents(collection)
        .into_iter()
        .map(|doc| serde_json::json!({ "id": doc.id.as_str(), "data": doc.data }))
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);

    if failed > 0 {
        anyhow::bail!("{failed} branch(es) failed");
    }
    Ok(())
}

async fn mentions(config: DispatcherConfig, users: &Path, content: &str) -> anyhow::Result<()> {
    let (_store, dispatcher) = seeded_dispatcher(config, users)?;
    let ids = dispatcher
        .mentions()
        .resolve(content)
        .await
        .context("resolving mentions")?;

    println!("{}", serde_json::to_string(&ids)?);
    Ok(())
}

