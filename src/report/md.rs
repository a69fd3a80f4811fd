use crate::types::report::{LedgerStatus, ScoreReport};

pub fn score_markdown(report: &ScoreReport) -> String {
    let mut output = String::new();
    output.push_str("# Reputation Report\n\n");
    output.push_str(&format!("User: {}\n", report.user));
    output.push_str(&format!(
        "As of: {}\n\n",
        report.as_of.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "Score: {} (previous {}){}\n",
        report.score,
        report.previous_score,
        if report.written { "" } else { " [dry run, not written]" }
    ));
    output.push_str(&format!("Max loan amount: {}\n\n", report.max_loan_amount));

    output.push_str("## Aggregate\n\n");
    output.push_str(&format!(
        "- projects: {}\n- avg_rating: {:.2}\n- total_payment: {:.2}\n- recency_days: {}\n\n",
        report.stats.project_count,
        report.stats.avg_rating,
        report.stats.total_payment,
        report.stats.recency_days
    ));

    output.push_str("## Credentials\n\n");
    if report.credentials.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for credential in &report.credentials {
            output.push_str(&format!(
                "- #{} rating {} / payment {} / completed {}\n",
                credential.token_id,
                credential
                    .record
                    .client_rating
                    .map(|rating| rating.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                credential.record.payment_amount.as_deref().unwrap_or("-"),
                credential.record.completion_date.as_deref().unwrap_or("-")
            ));
        }
        output.push('\n');
    }

    output.push_str("## Skipped\n\n");
    if report.skipped.is_empty() {
        output.push_str("- none\n");
    } else {
        for skipped in &report.skipped {
            output.push_str(&format!(
                "- #{} {}: {}\n",
                skipped.token_id, skipped.url, skipped.reason
            ));
        }
    }

    output
}

pub fn status_markdown(status: &LedgerStatus) -> String {
    let mut output = String::new();
    output.push_str("# Ledger Status\n\n");
    output.push_str(&format!("- credential: {} ({})\n", status.name, status.symbol));
    output.push_str(&format!("- owner: {}\n", status.owner));
    output.push_str(&format!(
        "- oracle updater: {}\n",
        status
            .oracle_updater
            .as_ref()
            .map(|updater| updater.to_string())
            .unwrap_or_else(|| "unset".to_string())
    ));
    output.push_str(&format!("- deployed at: {}\n", status.deployed_at.to_rfc3339()));
    output.push_str(&format!("- tokens minted: {}\n", status.token_count));
    output.push_str(&format!("- scored users: {}\n", status.scored_users));
    output.push_str(&format!("- events: {}\n", status.event_count));
    output.push_str(&format!(
        "- last event: {}\n\n",
        status.last_event.as_deref().unwrap_or("none")
    ));

    output.push_str("## Whitelisted Clients\n\n");
    push_addresses(&mut output, &status.whitelisted_clients);
    output.push('\n');
    output.push_str("## Pending Reputation Requests\n\n");
    push_addresses(&mut output, &status.pending_requests);
    output
}

fn push_addresses(output: &mut String, addresses: &[crate::types::address::Address]) {
    if addresses.is_empty() {
        output.push_str("- none\n");
    }
    for address in addresses {
        output.push_str(&format!("- {address}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::SkippedToken;
    use crate::types::credential::AggregateStats;
    use chrono::Utc;

    #[test]
    fn markdown_report_contains_sections_and_skips() {
        let report = ScoreReport {
            user: "0x00000000000000000000000000000000000000aa"
                .parse()
                .expect("address"),
            as_of: Utc::now(),
            stats: AggregateStats {
                project_count: 0,
                avg_rating: 0.0,
                total_payment: 0.0,
                recency_days: 9999,
                latest_completion: None,
            },
            score: 0,
            previous_score: 0,
            max_loan_amount: 0,
            written: false,
            credentials: vec![],
            skipped: vec![SkippedToken {
                token_id: 0,
                url: "https://ipfs.io/ipfs/dead".to_string(),
                reason: "request failed".to_string(),
            }],
        };

        let rendered = score_markdown(&report);
        assert!(rendered.contains("# Reputation Report"));
        assert!(rendered.contains("## Aggregate"));
        assert!(rendered.contains("[dry run, not written]"));
        assert!(rendered.contains("#0 https://ipfs.io/ipfs/dead: request failed"));
    }
}
