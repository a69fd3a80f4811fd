use crate::collect::gateway::Gateway;
use crate::collect::{self, MetadataFetch};
use crate::error::Result;
use crate::ledger::{Ledger, ReputationStore, TokenEnumeration};
use crate::score;
use crate::types::address::Address;
use crate::types::report::{LedgerStatus, ScoreReport};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UpdateRequest<'a> {
    pub updater: &'a Address,
    pub user: &'a Address,
    pub now: DateTime<Utc>,
    pub dry_run: bool,
}

/// Collect, aggregate, score, and (unless dry-running) write the score.
///
/// The updater is checked before any metadata is fetched, so an unauthorized
/// run fails without network traffic and without touching the ledger.
pub fn update_reputation<L, F>(
    ledger: &mut L,
    fetcher: &F,
    gateway: &Gateway,
    request: &UpdateRequest<'_>,
) -> Result<ScoreReport>
where
    L: TokenEnumeration + ReputationStore + ?Sized,
    F: MetadataFetch + ?Sized,
{
    ledger.authorize_update(request.updater)?;

    let collection = collect::collect(&*ledger, fetcher, gateway, request.user)?;
    let stats = score::aggregate(collection.records(), request.now);
    let score = score::reputation_score(&stats);
    let previous_score = ledger.get_reputation(request.user);

    tracing::info!(
        user = %request.user,
        projects = stats.project_count,
        skipped = collection.skipped.len(),
        score,
        previous_score,
        "computed reputation"
    );

    if !request.dry_run {
        ledger.set_reputation(request.updater, request.user, score)?;
    }

    Ok(ScoreReport {
        user: request.user.clone(),
        as_of: request.now,
        stats,
        score,
        previous_score,
        max_loan_amount: score::max_loan_amount(score),
        written: !request.dry_run,
        credentials: collection.credentials,
        skipped: collection.skipped,
    })
}

pub fn status(ledger: &Ledger) -> LedgerStatus {
    LedgerStatus {
        name: ledger.name.clone(),
        symbol: ledger.symbol.clone(),
        owner: ledger.owner.clone(),
        oracle_updater: ledger.oracle_updater.clone(),
        deployed_at: ledger.deployed_at,
        whitelisted_clients: ledger.whitelisted_clients.iter().cloned().collect(),
        token_count: ledger.tokens.len(),
        scored_users: ledger.reputation.len(),
        pending_requests: ledger.pending_requests.iter().cloned().collect(),
        event_count: ledger.events.len(),
        last_event: ledger
            .events
            .last()
            .map(|event| format!("{} {}", event.kind.name(), event.tx_hash)),
    }
}
