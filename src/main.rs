mod cli;
mod collect;
mod config;
mod error;
mod ledger;
mod oracle;
mod report;
mod score;
mod types;

use crate::collect::gateway::Gateway;
use crate::collect::http::HttpFetcher;
use crate::error::ReputeError;
use crate::ledger::store::LedgerStore;
use crate::ledger::{Ledger, ReputationStore};
use crate::types::config::ReputeConfig;
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const UNAUTHORIZED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open_workspace(path: &Path) -> Result<(ReputeConfig, LedgerStore), ReputeError> {
    if !path.exists() {
        return Err(ReputeError::PathNotFound(path.display().to_string()));
    }
    let config = config::load_config(path)?;
    let store = LedgerStore::for_workspace(path, &config);
    Ok((config, store))
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run(cli: cli::Cli) -> Result<i32, ReputeError> {
    match cli.command {
        cli::Commands::Deploy(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let mut ledger = Ledger::new(cmd.owner.clone());
            ledger.set_oracle_updater(&cmd.owner, &cmd.owner)?;
            ledger.set_whitelisted_client(&cmd.owner, &cmd.owner, true)?;
            store.create(&ledger, cmd.force)?;

            println!("ledger deployed: {}", store.path().display());
            println!("credential: {} ({})", ledger.name, ledger.symbol);
            println!("owner: {}", ledger.owner);
            println!("oracle updater: {}", cmd.owner);
            println!("whitelisted client: {}", cmd.owner);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Whitelist(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let allowed = !cmd.revoke;
            store.update(|ledger| {
                ledger.set_whitelisted_client(&cmd.from, &cmd.client, allowed)
            })?;
            if allowed {
                println!("client whitelisted: {}", cmd.client);
            } else {
                println!("client removed from whitelist: {}", cmd.client);
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Mint(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let (token_id, holder) = store.update(|ledger| {
                let token_id = ledger.mint_credential(&cmd.from, &cmd.to, &cmd.uri)?;
                Ok((token_id, ledger.owner_of(token_id)?.clone()))
            })?;
            println!("minted token {token_id} to {holder}");
            println!("token uri: {}", cmd.uri);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::SetUpdater(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            store.update(|ledger| ledger.set_oracle_updater(&cmd.from, &cmd.updater))?;
            println!("oracle updater set to: {}", cmd.updater);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::SetReputation(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            store.update(|ledger| ledger.set_reputation(&cmd.from, &cmd.user, cmd.score))?;
            println!("reputation for {} set to: {}", cmd.user, cmd.score);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Request(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            store.update(|ledger| {
                ledger.request_reputation_update(&cmd.from, &cmd.user);
                Ok(())
            })?;
            println!("reputation update requested for: {}", cmd.user);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Update(cmd) => {
            let (config, store) = open_workspace(&cmd.path)?;
            let mut ledger = store.load()?;
            let fetcher = HttpFetcher::new(&config.http_settings())?;
            let gateway = Gateway::from_config(&config);
            let request = oracle::UpdateRequest {
                updater: &cmd.from,
                user: &cmd.user,
                now: cmd.as_of.unwrap_or_else(Utc::now),
                dry_run: cmd.dry_run,
            };

            let score_report =
                oracle::update_reputation(&mut ledger, &fetcher, &gateway, &request)?;
            if score_report.written {
                store.save(&ledger)?;
            }

            let rendered = report::render_score(&score_report, output_format(cmd.format))?;
            println!("{rendered}");

            if score_report.has_skipped() {
                eprintln!(
                    "warning: {} credential(s) skipped; see report for reasons",
                    score_report.skipped.len()
                );
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Reputation(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let ledger = store.load()?;
            println!("{}", ledger.get_reputation(&cmd.user));
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::MaxLoan(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let ledger = store.load()?;
            println!("{}", ledger.get_max_loan_amount(&cmd.user));
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Tokens(cmd) => {
            let (config, store) = open_workspace(&cmd.path)?;
            let ledger = store.load()?;
            let gateway = Gateway::from_config(&config);
            let mut listed = 0usize;
            for token in ledger.tokens_of(&cmd.owner) {
                println!(
                    "{}\t{}\t{}",
                    token.token_id,
                    token.uri,
                    gateway.resolve(&token.uri)
                );
                listed += 1;
            }
            if listed == 0 {
                println!("tokens: none");
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Status(cmd) => {
            let (_, store) = open_workspace(&cmd.path)?;
            let ledger = store.load()?;
            let rendered =
                report::render_status(&oracle::status(&ledger), output_format(cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_authorization() {
                std::process::exit(exit_code::UNAUTHORIZED);
            }
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
