//! Ensign CLI
//!
//! Command-line interface for resolving addresses, ENS names, token-import
//! input and preference records.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ensign_core::types::{Chain, IdentityState, InputKind, PreferenceState, TokenState};
use ensign_resolve::{classify, BasicNormalizer, EnsignResolver, LatestSlot, ResolverConfig};

/// Ensign - address and ENS resolution for DEX frontends
#[derive(Parser)]
#[command(name = "ensign")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Connected chain id
    #[arg(long, global = true, default_value_t = 1)]
    chain: u64,

    /// Mainnet RPC URL
    #[arg(long, global = true, env = "ETH_RPC_URL")]
    rpc_url: Option<String>,

    /// Extra RPC endpoint as CHAIN_ID=URL (repeatable)
    #[arg(long = "rpc", global = true, value_parser = parse_rpc_endpoint)]
    rpc: Vec<(u64, String)>,

    /// JSON configuration file
    #[arg(long, global = true, env = "ENSIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Disable the ENS lookup cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify input as an address, an ENS name, or invalid
    Classify {
        /// Address or ENS name
        input: String,
    },

    /// Resolve an address or ENS name with avatar and social records
    Identity {
        /// Address or ENS name
        input: String,
    },

    /// Resolve token-import input and check it is an ERC-20 contract
    Token {
        /// Token address or ENS name
        input: String,
    },

    /// Read the preference records of an ENS name
    Prefs {
        /// ENS name
        name: String,
    },

    /// Resolve identities from stdin lines, debounced
    Watch,
}

fn parse_rpc_endpoint(raw: &str) -> std::result::Result<(u64, String), String> {
    let (id, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CHAIN_ID=URL, got `{raw}`"))?;
    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid chain id `{id}`: {e}"))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(format!("empty RPC URL for chain {id}"));
    }
    Ok((id, url.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ensign=debug,ensign_resolve=debug,info"
    } else {
        "ensign=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let chain = Chain::from_id(cli.chain);

    match &cli.command {
        Commands::Classify { input } => cmd_classify(input, cli.json),
        Commands::Identity { input } => {
            let resolver = build_resolver(&cli, chain)?;
            cmd_identity(&resolver, input, chain, cli.json).await
        }
        Commands::Token { input } => {
            let resolver = build_resolver(&cli, chain)?;
            cmd_token(&resolver, input, chain, cli.json).await
        }
        Commands::Prefs { name } => {
            let resolver = build_resolver(&cli, chain)?;
            cmd_prefs(&resolver, name, chain, cli.json).await
        }
        Commands::Watch => {
            let resolver = build_resolver(&cli, chain)?;
            cmd_watch(resolver, chain, cli.json).await
        }
    }
}

fn build_resolver(cli: &Cli, chain: Chain) -> Result<EnsignResolver> {
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    if let Some(url) = &cli.rpc_url {
        config = config.with_endpoint(Chain::Ethereum, url.clone());
    }
    for (id, url) in &cli.rpc {
        config = config.with_endpoint(Chain::from_id(*id), url.clone());
    }
    if cli.no_cache {
        config = config.no_cache();
    }

    if config.rpc.endpoint(chain).is_none() {
        eprintln!(
            "{} no RPC endpoint for {} (pass --rpc {}=URL); contract checks will fail",
            "⚠️ ".yellow(),
            chain,
            chain.id()
        );
    }

    EnsignResolver::with_config(config).context("Failed to build resolver")
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn yes_no(value: bool) -> ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}

/// Classify input without any lookups
fn cmd_classify(input: &str, json: bool) -> Result<()> {
    let kind = classify(input, &BasicNormalizer);
    if json {
        return print_json(&kind);
    }

    match kind {
        InputKind::Address(address) => {
            println!("{} {}", "Address:".green().bold(), address.to_checksum(None))
        }
        InputKind::EnsName(name) => println!("{} {}", "ENS name:".green().bold(), name),
        InputKind::Invalid => println!("{}", "Invalid input".red().bold()),
    }
    Ok(())
}

/// Resolve an identity
async fn cmd_identity(resolver: &EnsignResolver, input: &str, chain: Chain, json: bool) -> Result<()> {
    let pb = spinner(format!("Resolving {input}"))?;
    let state = resolver.identity().resolve(input, true, chain).await;
    pb.finish_and_clear();

    if json {
        return print_json(&state);
    }
    print_identity(&state);
    Ok(())
}

fn print_identity(state: &IdentityState) {
    let label = state
        .identity
        .display_name()
        .unwrap_or_else(|| state.key.clone());

    if !state.is_valid {
        println!("{} {}", "❌ Not found:".red().bold(), label);
        return;
    }

    println!("{} {}", "✅".green(), label.bold());
    if let Some(address) = &state.identity.address {
        println!("   {} {}", "Address:".dimmed(), address.to_checksum(None));
    }
    if let Some(avatar) = &state.identity.avatar {
        println!("   {} {}", "Avatar:".dimmed(), avatar);
    }
    for (key, value) in state.socials.iter() {
        println!("   {} {}", format!("{}:", key.record_key()).dimmed(), value);
    }
}

/// Resolve token-import input
async fn cmd_token(resolver: &EnsignResolver, input: &str, chain: Chain, json: bool) -> Result<()> {
    let pb = spinner(format!("Resolving token {input} on {chain}"))?;
    let state = resolver.token().resolve(input, true, chain).await;
    pb.finish_and_clear();

    if json {
        return print_json(&state);
    }
    print_token(&state);
    Ok(())
}

fn print_token(state: &TokenState) {
    let resolution = &state.resolution;
    let Some(address) = resolution.address else {
        println!("{} {}", "❌ No token address for:".red().bold(), state.key);
        return;
    };

    if state.is_valid {
        println!("{} {}", "✅ Token:".green().bold(), address.to_checksum(None));
    } else {
        println!("{} {}", "❌ Not an ERC-20 contract:".red().bold(), address.to_checksum(None));
    }
    if state.is_ens {
        println!("   {} {}", "Token record:".dimmed(), yes_no(resolution.has_token_record));
    }
    if let Some(decimals) = resolution.decimals {
        println!("   {} {}", "Decimals:".dimmed(), decimals);
    }
}

/// Read preference records
async fn cmd_prefs(resolver: &EnsignResolver, name: &str, chain: Chain, json: bool) -> Result<()> {
    let pb = spinner(format!("Reading preferences of {name}"))?;
    let state = resolver.preferences().resolve(name, true, chain).await;
    pb.finish_and_clear();

    if json {
        return print_json(&state);
    }
    print_prefs(&state);
    Ok(())
}

fn print_prefs(state: &PreferenceState) {
    if !state.preferences.has_any_preferences() {
        println!("{} {}", "No preferences set for".yellow(), state.key);
        return;
    }

    println!("{} {}", "⚙️  Preferences of".cyan().bold(), state.key);
    for (key, value) in state.preferences.to_text_records() {
        println!("   {} {}", format!("{key}:").dimmed(), value);
    }
}

/// Resolve identities as lines arrive on stdin
async fn cmd_watch(resolver: EnsignResolver, chain: Chain, json: bool) -> Result<()> {
    println!(
        "{} (quiet period {:?}, Ctrl+D to stop)",
        "👀 Reading names from stdin".cyan().bold(),
        resolver.config().debounce()
    );

    let (input_tx, input_rx) = watch::channel(String::new());
    let (mut settled, _debounce) = resolver.debouncer().spawn(input_rx);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<IdentityState>();
    let slot = LatestSlot::<IdentityState>::new();
    let identity = Arc::clone(resolver.identity());

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            input_tx.send_replace(line);
        }
    });

    let report = |state: IdentityState| -> Result<()> {
        let key = state.key.clone();
        if !slot.offer(&key, state) {
            debug!(key = %key, "Dropping stale result");
            return Ok(());
        }
        let Some(state) = slot.get() else {
            return Ok(());
        };
        if json {
            print_json(&state)
        } else {
            print_identity(&state);
            Ok(())
        }
    };

    loop {
        tokio::select! {
            changed = settled.changed() => {
                if changed.is_err() {
                    break;
                }
                let input = settled.borrow_and_update().clone();
                if input.trim().is_empty() {
                    continue;
                }

                let mut watch = identity.spawn(&input, true, chain);
                slot.set_key(watch.receiver.borrow().key.clone());

                let done = done_tx.clone();
                tokio::spawn(async move {
                    let state = watch
                        .receiver
                        .wait_for(IdentityState::is_settled)
                        .await
                        .map(|s| s.clone());
                    if let Ok(state) = state {
                        let _ = done.send(state);
                    }
                });
            }
            Some(state) = done_rx.recv() => report(state)?,
        }
    }

    drop(done_tx);
    while let Some(state) = done_rx.recv().await {
        report(state)?;
    }
    Ok(())
}
