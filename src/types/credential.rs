use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

pub type TokenId = u64;

/// Off-chain metadata attached to a credential token.
///
/// Built leniently: a field with the wrong JSON type is treated as absent so
/// that one bad field never discards the rest of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CredentialRecord {
    pub client_rating: Option<f64>,
    pub payment_amount: Option<String>,
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl CredentialRecord {
    /// Returns `None` when the document is not a JSON object.
    pub fn from_metadata(document: Value) -> Option<Self> {
        let Value::Object(mut fields) = document else {
            return None;
        };

        let client_rating = fields.remove("client_rating").and_then(|v| v.as_f64());
        let payment_amount = fields
            .remove("payment_amount")
            .and_then(|v| v.as_str().map(str::to_string));
        let completion_date = fields
            .remove("completion_date")
            .and_then(|v| v.as_str().map(str::to_string));

        Some(Self {
            client_rating,
            payment_amount,
            completion_date,
            extra: fields,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub project_count: u64,
    pub avg_rating: f64,
    pub total_payment: f64,
    pub recency_days: i64,
    pub latest_completion: Option<NaiveDate>,
}
