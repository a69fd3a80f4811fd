use crate::collect::{CollectedCredential, SkippedToken};
use crate::types::address::Address;
use crate::types::credential::AggregateStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub user: Address,
    pub as_of: DateTime<Utc>,
    pub stats: AggregateStats,
    pub score: u64,
    pub previous_score: u64,
    pub max_loan_amount: u128,
    pub written: bool,
    pub credentials: Vec<CollectedCredential>,
    pub skipped: Vec<SkippedToken>,
}

impl ScoreReport {
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatus {
    pub name: String,
    pub symbol: String,
    pub owner: Address,
    pub oracle_updater: Option<Address>,
    pub deployed_at: DateTime<Utc>,
    pub whitelisted_clients: Vec<Address>,
    pub token_count: usize,
    pub scored_users: usize,
    pub pending_requests: Vec<Address>,
    pub event_count: usize,
    pub last_event: Option<String>,
}
