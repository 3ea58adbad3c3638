//! Guildxp - Entry Point
//!
//! Command-line host for the ledger. Group data lives in a directory of JSON
//! files, options come from a RON config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use guildxp::config::{self, ConfigReport};
use guildxp::store::{file, JsonFileStore};
use guildxp::{Ledger, LedgerError};

#[derive(Parser, Debug)]
#[command(name = "guildxp", version, about = "Experience and level ledger for guilds")]
struct Cli {
    /// Directory holding the group files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// RON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert between a level and xp
    Curve {
        #[arg(long, conflicts_with = "xp")]
        level: Option<u64>,
        #[arg(long)]
        xp: Option<u64>,
    },
    /// XP needed to reach the next level
    Next { xp: u64 },
    CreateGroup { group: String },
    DeleteGroup { group: String },
    ShowGroup { group: String },
    CreateMember { group: String, member: String },
    DeleteMember { group: String, member: String },
    ShowMember { group: String, member: String },
    SetXp { group: String, member: String, xp: u64 },
    SetLevel { group: String, member: String, level: u64 },
    AddXp { group: String, member: String, amount: f64 },
    AddLevel { group: String, member: String, amount: f64 },
    SubtractXp { group: String, member: String, amount: f64 },
    SubtractLevel { group: String, member: String, amount: f64 },
    ResetMember { group: String, member: String },
    Leaderboard {
        group: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Write the default config file
    ExportConfig,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);

    if let Command::ExportConfig = cli.command {
        config::export_default_config(&config_path).map_err(anyhow::Error::msg)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let report: ConfigReport = config::load_config(&config_path);
    for rejected in &report.rejected {
        eprintln!("warning: option {} ignored ({}), using {}", rejected.key, rejected.reason, rejected.fallback);
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(file::default_directory);
    let store = JsonFileStore::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", data_dir))?;
    log::info!("Using group store at {}", store.root().display());
    let ledger = Ledger::new(store, report.into_config());

    let result = run(&ledger, cli.command).await;
    if let Err(ref e) = result {
        log::error!("Command failed: {}", e);
        if e.downcast_ref::<LedgerError>().is_some_and(LedgerError::is_caller_error) {
            std::process::exit(2);
        }
    }
    result
}

async fn run(ledger: &Ledger<JsonFileStore>, command: Command) -> Result<()> {
    match command {
        Command::Curve { level, xp } => match (level, xp) {
            (Some(level), _) => print_json(&ledger.xp_for_level(level))?,
            (None, Some(xp)) => print_json(&ledger.level_for_xp(xp))?,
            (None, None) => anyhow::bail!("pass --level or --xp"),
        },
        Command::Next { xp } => print_json(&ledger.xp_for_next(xp))?,
        Command::CreateGroup { group } => ledger.create_group(group).await?,
        Command::DeleteGroup { group } => ledger.delete_group(group).await?,
        Command::ShowGroup { group } => print_json(&ledger.get_group(group).await?)?,
        Command::CreateMember { group, member } => ledger.create_member(group, member).await?,
        Command::DeleteMember { group, member } => ledger.delete_member(group, member).await?,
        Command::ShowMember { group, member } => print_json(&ledger.get_member(group, member).await?)?,
        Command::SetXp { group, member, xp } => ledger.set_xp(group, member, xp).await?,
        Command::SetLevel { group, member, level } => ledger.set_level(group, member, level).await?,
        Command::AddXp { group, member, amount } => print_json(&ledger.add_xp(group, member, amount).await?)?,
        Command::AddLevel { group, member, amount } => {
            print_json(&ledger.add_level(group, member, amount).await?)?
        }
        Command::SubtractXp { group, member, amount } => {
            print_json(&ledger.subtract_xp(group, member, amount).await?)?
        }
        Command::SubtractLevel { group, member, amount } => {
            print_json(&ledger.subtract_level(group, member, amount).await?)?
        }
        Command::ResetMember { group, member } => ledger.reset_member(group, member).await?,
        Command::Leaderboard { group, limit, offset } => {
            print_json(&ledger.get_leaderboard(group, limit, offset).await?)?
        }
        // Handled before the store is opened
        Command::ExportConfig => {}
    }
    Ok(())
}
