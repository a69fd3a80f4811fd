pub mod aggregate;

use crate::types::credential::AggregateStats;

pub use aggregate::aggregate;

pub const PROJECT_WEIGHT: f64 = 10.0;
pub const RATING_WEIGHT: f64 = 20.0;
pub const PAYMENT_WEIGHT: f64 = 0.1;
pub const RECENCY_BONUS_CAP: f64 = 100.0;
pub const LOAN_MULTIPLIER: u128 = 10;

/// Weighted composite of the aggregate, rounded half-up. Not clamped above.
pub fn reputation_score(stats: &AggregateStats) -> u64 {
    let raw = stats.project_count as f64 * PROJECT_WEIGHT
        + stats.avg_rating * RATING_WEIGHT
        + stats.total_payment * PAYMENT_WEIGHT
        + (RECENCY_BONUS_CAP - stats.recency_days as f64).max(0.0);
    round_half_up(raw)
}

/// `f64::round` is half-up for every non-negative input; the cast saturates,
/// so negative totals floor at 0.
fn round_half_up(raw: f64) -> u64 {
    raw.round() as u64
}

pub fn max_loan_amount(reputation: u64) -> u128 {
    u128::from(reputation) * LOAN_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(
        project_count: u64,
        avg_rating: f64,
        total_payment: f64,
        recency_days: i64,
    ) -> AggregateStats {
        AggregateStats {
            project_count,
            avg_rating,
            total_payment,
            recency_days,
            latest_completion: None,
        }
    }

    #[test]
    fn empty_aggregate_scores_zero() {
        assert_eq!(reputation_score(&stats(0, 0.0, 0.0, 9999)), 0);
    }

    #[test]
    fn weighted_formula_matches_worked_example() {
        // 20 + 90 + 30 + 99
        assert_eq!(reputation_score(&stats(2, 4.5, 300.0, 1)), 239);
    }

    #[test]
    fn recency_bonus_stops_at_zero() {
        assert_eq!(reputation_score(&stats(1, 0.0, 0.0, 100)), 10);
        assert_eq!(reputation_score(&stats(1, 0.0, 0.0, 400)), 10);
        assert_eq!(reputation_score(&stats(1, 0.0, 0.0, 0)), 110);
    }

    #[test]
    fn halves_round_up() {
        // 5 * 0.1 = 0.5
        assert_eq!(reputation_score(&stats(0, 0.0, 5.0, 9999)), 1);
        assert_eq!(reputation_score(&stats(0, 0.0, 4.0, 9999)), 0);
    }

    #[test]
    fn rounding_does_not_inflate_values_just_below_half() {
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(238.5), 239);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497);
    }

    #[test]
    fn negative_totals_floor_at_zero() {
        assert_eq!(round_half_up(-3.7), 0);
        assert_eq!(reputation_score(&stats(0, 0.0, -500.0, 9999)), 0);
    }

    #[test]
    fn large_inputs_are_not_clamped() {
        assert_eq!(reputation_score(&stats(50, 5.0, 100_000.0, 0)), 10_700);
    }

    #[test]
    fn max_loan_is_ten_times_reputation() {
        assert_eq!(max_loan_amount(0), 0);
        assert_eq!(max_loan_amount(50), 500);
        assert_eq!(max_loan_amount(100), 1000);
        assert_eq!(max_loan_amount(u64::MAX), u128::from(u64::MAX) * 10);
    }
}
