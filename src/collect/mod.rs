pub mod gateway;
pub mod http;

use crate::error::Result;
use crate::ledger::TokenEnumeration;
use crate::types::address::Address;
use crate::types::credential::{CredentialRecord, TokenId};
use gateway::Gateway;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Per-token metadata failure. Never fatal to a collection pass.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected http status {status}")]
    Status { status: u16 },

    #[error("invalid json: {0}")]
    InvalidJson(String),

    #[error("metadata is not a JSON object")]
    NotAnObject,
}

pub trait MetadataFetch {
    fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectedCredential {
    pub token_id: TokenId,
    pub uri: String,
    pub url: String,
    pub record: CredentialRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedToken {
    pub token_id: TokenId,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub enum TokenOutcome {
    Collected(CollectedCredential),
    Skipped(SkippedToken),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Collection {
    pub credentials: Vec<CollectedCredential>,
    pub skipped: Vec<SkippedToken>,
}

impl Collection {
    pub fn records(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.credentials.iter().map(|credential| &credential.record)
    }
}

/// Walks an owner's tokens in index order, fetching one at a time.
///
/// Yields `Err` only for ledger enumeration failures, after which the stream
/// is exhausted. Metadata failures come through as `TokenOutcome::Skipped`.
pub struct CredentialStream<'a, T: ?Sized, F: ?Sized> {
    tokens: &'a T,
    fetcher: &'a F,
    gateway: &'a Gateway,
    owner: &'a Address,
    next_index: u64,
    balance: Option<u64>,
    done: bool,
}

impl<'a, T, F> CredentialStream<'a, T, F>
where
    T: TokenEnumeration + ?Sized,
    F: MetadataFetch + ?Sized,
{
    pub fn new(tokens: &'a T, fetcher: &'a F, gateway: &'a Gateway, owner: &'a Address) -> Self {
        Self {
            tokens,
            fetcher,
            gateway,
            owner,
            next_index: 0,
            balance: None,
            done: false,
        }
    }

    fn step(&mut self) -> Result<Option<TokenOutcome>> {
        let balance = match self.balance {
            Some(balance) => balance,
            None => {
                let balance = self.tokens.balance_of(self.owner)?;
                tracing::info!(owner = %self.owner, balance, "enumerating credentials");
                self.balance = Some(balance);
                balance
            }
        };
        if self.next_index >= balance {
            return Ok(None);
        }

        let token_id = self
            .tokens
            .token_of_owner_by_index(self.owner, self.next_index)?;
        self.next_index += 1;
        let uri = self.tokens.token_uri(token_id)?;
        let url = self.gateway.resolve(&uri);

        let fetched = self.fetcher.fetch(&url).and_then(|document| {
            CredentialRecord::from_metadata(document).ok_or(FetchError::NotAnObject)
        });
        let outcome = match fetched {
            Ok(record) => {
                tracing::debug!(token_id, %url, "fetched credential metadata");
                TokenOutcome::Collected(CollectedCredential {
                    token_id,
                    uri,
                    url,
                    record,
                })
            }
            Err(e) => {
                tracing::warn!(token_id, %url, error = %e, "skipping credential: metadata unavailable");
                TokenOutcome::Skipped(SkippedToken {
                    token_id,
                    url,
                    reason: e.to_string(),
                })
            }
        };
        Ok(Some(outcome))
    }
}

impl<T, F> Iterator for CredentialStream<'_, T, F>
where
    T: TokenEnumeration + ?Sized,
    F: MetadataFetch + ?Sized,
{
    type Item = Result<TokenOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(outcome)) => Some(Ok(outcome)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Drains the stream; the result only exists once every fetch has resolved.
pub fn collect<T, F>(
    tokens: &T,
    fetcher: &F,
    gateway: &Gateway,
    owner: &Address,
) -> Result<Collection>
where
    T: TokenEnumeration + ?Sized,
    F: MetadataFetch + ?Sized,
{
    let mut collection = Collection::default();
    for outcome in CredentialStream::new(tokens, fetcher, gateway, owner) {
        match outcome? {
            TokenOutcome::Collected(credential) => collection.credentials.push(credential),
            TokenOutcome::Skipped(skipped) => collection.skipped.push(skipped),
        }
    }
    Ok(collection)
}
