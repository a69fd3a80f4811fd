pub mod events;
pub mod store;

use crate::error::{ReputeError, Result};
use crate::score;
use crate::types::address::Address;
use crate::types::credential::TokenId;
use chrono::{DateTime, Utc};
use events::{EventKind, LedgerEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const CREDENTIAL_NAME: &str = "ProfessionalCredential";
pub const CREDENTIAL_SYMBOL: &str = "PCNFT";

/// Read side of the credential registry, as the collector needs it.
pub trait TokenEnumeration {
    fn balance_of(&self, owner: &Address) -> Result<u64>;
    fn token_of_owner_by_index(&self, owner: &Address, index: u64) -> Result<TokenId>;
    fn token_uri(&self, token_id: TokenId) -> Result<String>;
}

/// Reputation read/write capability keyed by address.
pub trait ReputationStore {
    fn get_reputation(&self, user: &Address) -> u64;

    /// Fails unless `caller` may write reputation scores.
    fn authorize_update(&self, caller: &Address) -> Result<()>;

    fn set_reputation(&mut self, caller: &Address, user: &Address, score: u64) -> Result<()>;

    fn get_max_loan_amount(&self, user: &Address) -> u128 {
        score::max_loan_amount(self.get_reputation(user))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialToken {
    pub token_id: TokenId,
    pub owner: Address,
    pub uri: String,
    pub minted_by: Address,
}

/// Credential registry, reputation oracle and lending pool sharing one state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub owner: Address,
    pub name: String,
    pub symbol: String,
    pub deployed_at: DateTime<Utc>,
    #[serde(default)]
    pub whitelisted_clients: BTreeSet<Address>,
    #[serde(default)]
    pub tokens: Vec<CredentialToken>,
    pub oracle_updater: Option<Address>,
    #[serde(default)]
    pub reputation: BTreeMap<Address, u64>,
    #[serde(default)]
    pub pending_requests: BTreeSet<Address>,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
}

impl Ledger {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            name: CREDENTIAL_NAME.to_string(),
            symbol: CREDENTIAL_SYMBOL.to_string(),
            deployed_at: Utc::now(),
            whitelisted_clients: BTreeSet::new(),
            tokens: Vec::new(),
            oracle_updater: None,
            reputation: BTreeMap::new(),
            pending_requests: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    pub fn is_whitelisted(&self, client: &Address) -> bool {
        self.whitelisted_clients.contains(client)
    }

    pub fn set_whitelisted_client(
        &mut self,
        caller: &Address,
        client: &Address,
        allowed: bool,
    ) -> Result<()> {
        self.require_owner(caller)?;
        if allowed {
            self.whitelisted_clients.insert(client.clone());
        } else {
            self.whitelisted_clients.remove(client);
        }
        self.emit(
            caller,
            EventKind::ClientWhitelisted {
                client: client.clone(),
                allowed,
            },
        );
        Ok(())
    }

    pub fn mint_credential(&mut self, caller: &Address, to: &Address, uri: &str) -> Result<TokenId> {
        if !self.is_whitelisted(caller) {
            return Err(ReputeError::NotWhitelisted(caller.to_string()));
        }
        let token_id = self.tokens.len() as TokenId;
        self.tokens.push(CredentialToken {
            token_id,
            owner: to.clone(),
            uri: uri.to_string(),
            minted_by: caller.clone(),
        });
        self.emit(
            caller,
            EventKind::CredentialMinted {
                token_id,
                to: to.clone(),
                uri: uri.to_string(),
            },
        );
        Ok(token_id)
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<&Address> {
        self.token(token_id).map(|token| &token.owner)
    }

    pub fn tokens_of(&self, owner: &Address) -> impl Iterator<Item = &CredentialToken> + '_ {
        let owner = owner.clone();
        self.tokens.iter().filter(move |token| token.owner == owner)
    }

    pub fn set_oracle_updater(&mut self, caller: &Address, updater: &Address) -> Result<()> {
        self.require_owner(caller)?;
        self.oracle_updater = Some(updater.clone());
        self.emit(
            caller,
            EventKind::OracleUpdaterSet {
                updater: updater.clone(),
            },
        );
        Ok(())
    }

    /// Anyone may ask for a refresh; the request stays pending until the
    /// user's reputation is next written.
    pub fn request_reputation_update(&mut self, caller: &Address, user: &Address) {
        self.pending_requests.insert(user.clone());
        self.emit(caller, EventKind::ReputationRequested { user: user.clone() });
    }

    fn token(&self, token_id: TokenId) -> Result<&CredentialToken> {
        usize::try_from(token_id)
            .ok()
            .and_then(|index| self.tokens.get(index))
            .ok_or(ReputeError::TokenNotFound(token_id))
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(ReputeError::NotOwner(caller.to_string()))
        }
    }

    fn emit(&mut self, caller: &Address, kind: EventKind) {
        let event = LedgerEvent::new(self.events.len() as u64, caller.clone(), kind);
        tracing::debug!(seq = event.seq, tx = %event.tx_hash, "ledger event");
        self.events.push(event);
    }
}

impl TokenEnumeration for Ledger {
    fn balance_of(&self, owner: &Address) -> Result<u64> {
        Ok(self.tokens_of(owner).count() as u64)
    }

    fn token_of_owner_by_index(&self, owner: &Address, index: u64) -> Result<TokenId> {
        let found = usize::try_from(index)
            .ok()
            .and_then(|index| self.tokens_of(owner).nth(index));
        match found {
            Some(token) => Ok(token.token_id),
            None => Err(ReputeError::IndexOutOfRange {
                owner: owner.to_string(),
                index,
                balance: self.balance_of(owner)?,
            }),
        }
    }

    fn token_uri(&self, token_id: TokenId) -> Result<String> {
        self.token(token_id).map(|token| token.uri.clone())
    }
}

impl ReputationStore for Ledger {
    fn get_reputation(&self, user: &Address) -> u64 {
        self.reputation.get(user).copied().unwrap_or(0)
    }

    fn authorize_update(&self, caller: &Address) -> Result<()> {
        match &self.oracle_updater {
            Some(updater) if updater == caller => Ok(()),
            _ => Err(ReputeError::Unauthorized(caller.to_string())),
        }
    }

    fn set_reputation(&mut self, caller: &Address, user: &Address, score: u64) -> Result<()> {
        self.authorize_update(caller)?;
        self.reputation.insert(user.clone(), score);
        self.pending_requests.remove(user);
        self.emit(
            caller,
            EventKind::ReputationUpdated {
                user: user.clone(),
                score,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn addr(last: u8) -> Address {
        format!("0x{:040x}", last).parse().expect("test address should parse")
    }

    #[test]
    fn new_ledger_carries_credential_name_and_symbol() {
        let ledger = Ledger::new(addr(1));
        assert_eq!(ledger.name, "ProfessionalCredential");
        assert_eq!(ledger.symbol, "PCNFT");
        assert!(ledger.oracle_updater.is_none());
    }

    #[test]
    fn owner_whitelists_client_and_client_mints() {
        let (owner, client, worker) = (addr(1), addr(2), addr(3));
        let mut ledger = Ledger::new(owner.clone());
        ledger
            .set_whitelisted_client(&owner, &client, true)
            .expect("owner should whitelist");
        assert!(ledger.is_whitelisted(&client));

        let token_id = ledger
            .mint_credential(&client, &worker, "ipfs://test")
            .expect("whitelisted client should mint");
        assert_eq!(token_id, 0);
        assert_eq!(ledger.owner_of(0).expect("token should exist"), &worker);
        assert_eq!(ledger.token_uri(0).expect("uri should exist"), "ipfs://test");
        assert_eq!(ledger.balance_of(&worker).expect("balance"), 1);
    }

    #[test]
    fn non_whitelisted_client_cannot_mint() {
        let mut ledger = Ledger::new(addr(1));
        let result = ledger.mint_credential(&addr(2), &addr(3), "ipfs://test");
        assert!(matches!(result, Err(ReputeError::NotWhitelisted(_))));
        assert!(ledger.tokens.is_empty());
    }

    #[test]
    fn only_owner_manages_whitelist_and_updater() {
        let mut ledger = Ledger::new(addr(1));
        assert!(matches!(
            ledger.set_whitelisted_client(&addr(2), &addr(2), true),
            Err(ReputeError::NotOwner(_))
        ));
        assert!(matches!(
            ledger.set_oracle_updater(&addr(2), &addr(2)),
            Err(ReputeError::NotOwner(_))
        ));
    }

    #[test]
    fn revoking_a_client_blocks_further_mints() {
        let (owner, client) = (addr(1), addr(2));
        let mut ledger = Ledger::new(owner.clone());
        ledger
            .set_whitelisted_client(&owner, &client, true)
            .expect("whitelist");
        ledger
            .set_whitelisted_client(&owner, &client, false)
            .expect("revoke");
        assert!(ledger.mint_credential(&client, &addr(3), "ipfs://x").is_err());
    }

    #[test]
    fn enumeration_follows_mint_order_per_owner() {
        let (owner, alice, bob) = (addr(1), addr(2), addr(3));
        let mut ledger = Ledger::new(owner.clone());
        ledger
            .set_whitelisted_client(&owner, &owner, true)
            .expect("whitelist");
        ledger.mint_credential(&owner, &alice, "a0").expect("mint");
        ledger.mint_credential(&owner, &bob, "b0").expect("mint");
        ledger.mint_credential(&owner, &alice, "a1").expect("mint");

        assert_eq!(ledger.balance_of(&alice).expect("balance"), 2);
        assert_eq!(ledger.token_of_owner_by_index(&alice, 0).expect("idx"), 0);
        assert_eq!(ledger.token_of_owner_by_index(&alice, 1).expect("idx"), 2);
        assert!(matches!(
            ledger.token_of_owner_by_index(&alice, 2),
            Err(ReputeError::IndexOutOfRange { balance: 2, .. })
        ));
    }

    #[test]
    fn updater_sets_reputation_and_loan_follows() {
        let (owner, updater, user) = (addr(1), addr(2), addr(3));
        let mut ledger = Ledger::new(owner.clone());
        ledger
            .set_oracle_updater(&owner, &updater)
            .expect("owner sets updater");

        ledger
            .set_reputation(&updater, &user, 100)
            .expect("updater should write");
        assert_eq!(ledger.get_reputation(&user), 100);
        assert_eq!(ledger.get_max_loan_amount(&user), 1000);
    }

    #[test]
    fn non_updater_write_fails_and_keeps_prior_value() {
        let (owner, updater, user) = (addr(1), addr(2), addr(3));
        let mut ledger = Ledger::new(owner.clone());
        ledger.set_oracle_updater(&owner, &updater).expect("set");
        ledger.set_reputation(&updater, &user, 50).expect("write");

        let result = ledger.set_reputation(&user, &user, 100);
        assert!(matches!(result, Err(ReputeError::Unauthorized(_))));
        assert_eq!(ledger.get_reputation(&user), 50);
        assert_eq!(ledger.get_max_loan_amount(&user), 500);
    }

    #[test]
    fn unset_updater_rejects_everyone() {
        let owner = addr(1);
        let mut ledger = Ledger::new(owner.clone());
        assert!(ledger.set_reputation(&owner, &addr(2), 1).is_err());
    }

    #[test]
    fn unknown_user_has_zero_reputation_and_zero_loan() {
        let ledger = Ledger::new(addr(1));
        assert_eq!(ledger.get_reputation(&addr(9)), 0);
        assert_eq!(ledger.get_max_loan_amount(&addr(9)), 0);
    }

    #[test]
    fn reputation_write_clears_pending_request() {
        let (owner, user) = (addr(1), addr(3));
        let mut ledger = Ledger::new(owner.clone());
        ledger.set_oracle_updater(&owner, &owner).expect("set");
        ledger.request_reputation_update(&user, &user);
        assert!(ledger.pending_requests.contains(&user));

        ledger.set_reputation(&owner, &user, 7).expect("write");
        assert!(ledger.pending_requests.is_empty());
    }

    #[test]
    fn events_are_sequenced_with_distinct_hashes() {
        let owner = addr(1);
        let mut ledger = Ledger::new(owner.clone());
        ledger.set_oracle_updater(&owner, &owner).expect("set");
        ledger.set_reputation(&owner, &addr(2), 5).expect("write");

        assert_eq!(ledger.events.len(), 2);
        assert_eq!(ledger.events[0].seq, 0);
        assert_eq!(ledger.events[1].seq, 1);
        assert_ne!(ledger.events[0].tx_hash, ledger.events[1].tx_hash);
    }
}
