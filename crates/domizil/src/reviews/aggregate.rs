use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::domain::Review;
use crate::residences::ResidenceId;

/// Average rating and review count for one residence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: u32,
}

impl RatingSummary {
    /// Average rounded to one decimal, e.g. `4.3`.
    pub fn display_average(&self) -> String {
        format!("{:.1}", self.average_rating)
    }

    /// Stars to fill when rendering the average.
    pub fn filled_stars(&self) -> u8 {
        self.average_rating.round().clamp(0.0, 5.0) as u8
    }

    pub fn is_empty(&self) -> bool {
        self.total_reviews == 0
    }
}

/// Fold reviews into a summary. Empty input yields `(0, 0)`.
pub fn summarize<'a, I>(reviews: I) -> RatingSummary
where
    I: IntoIterator<Item = &'a Review>,
{
    let (sum, count) = reviews
        .into_iter()
        .fold((0u64, 0u32), |(sum, count), review| {
            (sum + u64::from(review.rating.value()), count + 1)
        });

    if count == 0 {
        return RatingSummary::default();
    }

    RatingSummary {
        average_rating: sum as f64 / f64::from(count),
        total_reviews: count,
    }
}

/// Server reviews for `residence` followed by session-local reviews the server
/// does not know about yet. Duplicate ids are kept once.
pub fn merge_reviews(
    residence: &ResidenceId,
    server: &[Review],
    local: &[Review],
) -> Vec<Review> {
    let mut seen = HashSet::new();

    server
        .iter()
        .chain(local.iter())
        .filter(|review| &review.residence_id == residence)
        .filter(|review| seen.insert(review.id.clone()))
        .cloned()
        .collect()
}

/// Stable sort by timestamp, newest first.
pub fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    reviews
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::domain::{Language, Rating, ReviewId};
    use chrono::{TimeZone, Utc};

    fn review(id: &str, residence: &str, rating: u8, minute: u32) -> Review {
        Review {
            id: ReviewId(id.to_string()),
            residence_id: ResidenceId::new(residence),
            author: "Gast".to_string(),
            content: "Wunderbar".to_string(),
            rating: Rating::new(rating).expect("valid rating"),
            language: Language::De,
            timestamp: Utc
                .with_ymd_and_hms(2024, 7, 1, 12, minute, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn empty_input_summarizes_to_zero() {
        let none: Vec<Review> = Vec::new();
        let summary = summarize(&none);
        assert_eq!(summary, RatingSummary::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn averages_ratings() {
        let reviews = [review("a", "x", 5, 0), review("b", "x", 3, 1)];
        let summary = summarize(&reviews);
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.total_reviews, 2);
    }

    #[test]
    fn order_does_not_change_summary() {
        let mut reviews = vec![
            review("a", "x", 5, 0),
            review("b", "x", 2, 1),
            review("c", "x", 4, 2),
        ];
        let forward = summarize(&reviews);
        reviews.reverse();
        assert_eq!(forward, summarize(&reviews));
    }

    #[test]
    fn keeps_full_precision_until_display() {
        let reviews = [
            review("a", "x", 5, 0),
            review("b", "x", 4, 1),
            review("c", "x", 4, 2),
        ];
        let summary = summarize(&reviews);
        assert!((summary.average_rating - 13.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(summary.display_average(), "4.3");
        assert_eq!(summary.filled_stars(), 4);
    }

    #[test]
    fn merge_filters_residence_and_dedupes_by_id() {
        let server = vec![
            review("r1", "waldhaus-tannenhof", 4, 0),
            review("r2", "waldhaus-tannenhof", 5, 1),
            review("r9", "domizil-fichtenberg", 1, 2),
        ];
        let local = vec![
            review("r2", "waldhaus-tannenhof", 5, 1),
            review("r3", "waldhaus-tannenhof", 3, 3),
        ];

        let merged = merge_reviews(&ResidenceId::new("waldhaus-tannenhof"), &server, &local);
        let ids: Vec<_> = merged.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);

        let summary = summarize(&merged);
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.average_rating, 4.0);
    }

    #[test]
    fn newest_first_sorts_descending() {
        let sorted = newest_first(vec![
            review("old", "x", 3, 0),
            review("new", "x", 3, 30),
            review("mid", "x", 3, 15),
        ]);
        let ids: Vec<_> = sorted.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
