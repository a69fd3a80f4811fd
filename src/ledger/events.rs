use crate::types::address::Address;
use crate::types::credential::TokenId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EventKind {
    CredentialMinted {
        token_id: TokenId,
        to: Address,
        uri: String,
    },
    ClientWhitelisted {
        client: Address,
        allowed: bool,
    },
    OracleUpdaterSet {
        updater: Address,
    },
    ReputationUpdated {
        user: Address,
        score: u64,
    },
    ReputationRequested {
        user: Address,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CredentialMinted { .. } => "CredentialMinted",
            Self::ClientWhitelisted { .. } => "ClientWhitelisted",
            Self::OracleUpdaterSet { .. } => "OracleUpdaterSet",
            Self::ReputationUpdated { .. } => "ReputationUpdated",
            Self::ReputationRequested { .. } => "ReputationRequested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub seq: u64,
    pub tx_hash: String,
    pub caller: Address,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl LedgerEvent {
    pub fn new(seq: u64, caller: Address, kind: EventKind) -> Self {
        let timestamp = Utc::now();
        let tx_hash = tx_hash(seq, &caller, &timestamp, &kind);
        Self {
            seq,
            tx_hash,
            caller,
            timestamp,
            kind,
        }
    }
}

/// SHA-256 over the canonical JSON of the event body, `0x`-prefixed.
fn tx_hash(seq: u64, caller: &Address, timestamp: &DateTime<Utc>, kind: &EventKind) -> String {
    let body = serde_json::json!({
        "seq": seq,
        "caller": caller,
        "timestamp": timestamp.to_rfc3339(),
        "kind": kind,
    });
    let digest = Sha256::digest(body.to_string().as_bytes());
    format!("0x{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_json_flattens_kind_with_tag() {
        let caller: Address = "0x0000000000000000000000000000000000000001"
            .parse()
            .expect("address");
        let event = LedgerEvent::new(
            3,
            caller.clone(),
            EventKind::ReputationUpdated {
                user: caller,
                score: 42,
            },
        );

        let json = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(json["event"], "ReputationUpdated");
        assert_eq!(json["score"], 42);
        assert_eq!(json["seq"], 3);
        assert_eq!(event.tx_hash.len(), 66);

        let back: LedgerEvent = serde_json::from_value(json).expect("event should deserialize");
        assert_eq!(back, event);
        assert_eq!(back.kind.name(), "ReputationUpdated");
    }
}
