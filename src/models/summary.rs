//! Derived rating aggregate for a product.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregate rating statistics for one product.
///
/// Never stored: recomputed from the review set on every request, so there
/// are no cache invalidation concerns.
///
/// # JSON Example
///
/// ```json
/// {
///   "product_id": "p1",
///   "average_rating": 4.33,
///   "total_reviews": 3,
///   "rating_distribution": {"1": 0, "2": 0, "3": 1, "4": 0, "5": 2},
///   "last_updated": "2026-08-29T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub product_id: String,

    /// Mean of all counted ratings, rounded to 2 decimals; 0.0 for a product
    /// with no reviews (not an error)
    pub average_rating: f64,

    pub total_reviews: u64,

    /// Count per rating value 1 through 5, zero counts included
    pub rating_distribution: BTreeMap<String, u64>,

    /// When this summary was computed (always fresh)
    pub last_updated: DateTime<Utc>,
}

impl RatingSummary {
    /// Build a summary from per-rating counts (`counts[0]` is 1-star).
    pub fn from_counts(product_id: String, counts: [u64; 5]) -> Self {
        let total_reviews: u64 = counts.iter().sum();
        let rating_sum: u64 = counts
            .iter()
            .enumerate()
            .map(|(i, count)| (i as u64 + 1) * count)
            .sum();

        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            let mean = rating_sum as f64 / total_reviews as f64;
            (mean * 100.0).round() / 100.0
        };

        let rating_distribution = counts
            .iter()
            .enumerate()
            .map(|(i, count)| ((i + 1).to_string(), *count))
            .collect();

        Self {
            product_id,
            average_rating,
            total_reviews,
            rating_distribution,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_product_yields_zeroed_summary() {
        let summary = RatingSummary::from_counts("p1".into(), [0; 5]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.rating_distribution.len(), 5);
        assert!(summary.rating_distribution.values().all(|&c| c == 0));
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        // one 3-star and two 5-star reviews: mean 13/3 = 4.333...
        let summary = RatingSummary::from_counts("p1".into(), [0, 0, 1, 0, 2]);
        assert_eq!(summary.average_rating, 4.33);
        assert_eq!(summary.total_reviews, 3);
    }

    #[test]
    fn distribution_sums_to_total() {
        let summary = RatingSummary::from_counts("p1".into(), [2, 0, 1, 4, 7]);
        let sum: u64 = summary.rating_distribution.values().sum();
        assert_eq!(sum, summary.total_reviews);
        assert_eq!(summary.rating_distribution["5"], 7);
    }
}
