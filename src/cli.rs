use crate::score::aggregate::parse_completion_date;
use crate::types::address::Address;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "repute",
    version,
    about = "Reputation oracle for professional credential NFTs"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger with the owner as updater and whitelisted client
    Deploy(DeployCommand),
    /// Grant or revoke minting rights for a client
    Whitelist(WhitelistCommand),
    /// Mint a credential token to a worker
    Mint(MintCommand),
    SetUpdater(SetUpdaterCommand),
    SetReputation(SetReputationCommand),
    /// Record a pending reputation refresh for a user
    Request(RequestCommand),
    /// Recompute a user's reputation from credential metadata and store it
    Update(UpdateCommand),
    Reputation(UserQueryCommand),
    MaxLoan(UserQueryCommand),
    Tokens(TokensCommand),
    Status(StatusCommand),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct DeployCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub owner: Address,
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct WhitelistCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub client: Address,
    #[arg(long)]
    pub revoke: bool,
}

#[derive(Args)]
pub struct MintCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub to: Address,
    #[arg(long)]
    pub uri: String,
}

#[derive(Args)]
pub struct SetUpdaterCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub updater: Address,
}

#[derive(Args)]
pub struct SetReputationCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub user: Address,
    #[arg(long)]
    pub score: u64,
}

#[derive(Args)]
pub struct RequestCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub user: Address,
}

#[derive(Args)]
pub struct UpdateCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub user: Address,
    /// Evaluate recency as of this date (YYYY-MM-DD or RFC 3339) instead of now
    #[arg(long, value_parser = parse_as_of)]
    pub as_of: Option<DateTime<Utc>>,
    /// Compute and report without writing to the ledger
    #[arg(long)]
    pub dry_run: bool,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct UserQueryCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub user: Address,
}

#[derive(Args)]
pub struct TokensCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub owner: Address,
}

#[derive(Args)]
pub struct StatusCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_completion_date(raw)
        .ok_or_else(|| format!("expected YYYY-MM-DD or an RFC 3339 timestamp, got {raw:?}"))
}
