use crate::types::credential::{AggregateStats, CredentialRecord};
use chrono::{DateTime, NaiveDate, Utc};

/// Recency reported when no record carries a usable completion date.
pub const STALE_RECENCY_DAYS: i64 = 9999;

/// Single pass over the records. `now` is injected so the result is a pure
/// function of its inputs.
pub fn aggregate<'a, I>(records: I, now: DateTime<Utc>) -> AggregateStats
where
    I: IntoIterator<Item = &'a CredentialRecord>,
{
    let mut project_count = 0u64;
    let mut total_rating = 0.0;
    let mut total_payment = 0.0;
    let mut latest: Option<DateTime<Utc>> = None;

    for record in records {
        project_count += 1;
        total_rating += record.client_rating.unwrap_or(0.0);
        total_payment += record
            .payment_amount
            .as_deref()
            .map(parse_payment)
            .unwrap_or(0.0);
        if let Some(completed) = record
            .completion_date
            .as_deref()
            .and_then(parse_completion_date)
        {
            latest = Some(latest.map_or(completed, |current| current.max(completed)));
        }
    }

    let avg_rating = if project_count == 0 {
        0.0
    } else {
        total_rating / project_count as f64
    };
    let recency_days = latest
        .map(|latest| now.signed_duration_since(latest).num_days().max(0))
        .unwrap_or(STALE_RECENCY_DAYS);

    AggregateStats {
        project_count,
        avg_rating,
        total_payment,
        recency_days,
        latest_completion: latest.map(|latest| latest.date_naive()),
    }
}

/// Numeric part of `"<amount> <currency>"`: the longest decimal literal at
/// the start of the first space-separated token. Anything unusable counts as 0.
pub fn parse_payment(amount: &str) -> f64 {
    amount
        .split(' ')
        .next()
        .and_then(leading_number)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Longest `[+-]digits[.digits][e[+-]digits]` prefix after leading whitespace.
fn leading_number(token: &str) -> Option<f64> {
    let text = token.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_digits = digits_from(end);
    end += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// `YYYY-MM-DD` as midnight UTC, or a full RFC 3339 timestamp.
pub fn parse_completion_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
