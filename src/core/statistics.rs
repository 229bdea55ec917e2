use crate::domain::model::{RatingHistogram, Referee};
use std::collections::BTreeMap;

pub fn mean(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
}

/// Copy of `referee` with `average_rating` derived from its club ratings.
pub fn compute_average(referee: &Referee) -> Referee {
    let mut annotated = referee.clone();
    annotated.statistics.average_rating = mean(&referee.statistics.club_ratings);
    annotated
}

/// Counts each rating value 1 through 5. Values outside that range are
/// skipped, not clamped.
pub fn compute_histogram(referee: &Referee) -> RatingHistogram {
    let mut counts_by_rating: BTreeMap<u8, u32> = (1..=5).map(|r| (r, 0)).collect();

    for rating in &referee.statistics.club_ratings {
        if let Ok(key) = u8::try_from(*rating) {
            if let Some(count) = counts_by_rating.get_mut(&key) {
                *count += 1;
            }
        }
    }

    RatingHistogram {
        total_matches: referee.matches_officiated,
        counts_by_rating,
    }
}

pub fn compute_total_matches(referees: &[Referee]) -> u64 {
    referees
        .iter()
        .map(|referee| referee.matches_officiated as u64)
        .sum()
}
