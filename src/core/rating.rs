use crate::core::statistics::mean;
use crate::domain::model::{Match, RatingSubmission, Referee};
use crate::domain::ports::RefereeGateway;
use crate::utils::error::{RosterError, Result};
use std::collections::VecDeque;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Reads the leading integer of `raw`, the way form input is read:
/// "4" and "4.7" and "4 stars" all give 4, "abc" gives nothing.
pub fn parse_rating(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Pins a numeric rating field into 1..=5. Non-numeric text is returned
/// trimmed but otherwise as typed.
pub fn clamp_rating(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_rating(trimmed) {
        Some(value) if value < MIN_RATING => MIN_RATING.to_string(),
        Some(value) if value > MAX_RATING => MAX_RATING.to_string(),
        _ => trimmed.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Team1(String),
    Team2(String),
    Rating(String),
}

/// Rating form of one card.
///
/// Each field keeps its settled values in arrival order; the n-th
/// submission is built from the n-th value of every field. A field that
/// runs ahead waits for its partners until they arrive or the form is
/// cancelled.
#[derive(Debug, Clone)]
pub struct RatingForm {
    referee_id: u64,
    team1: VecDeque<String>,
    team2: VecDeque<String>,
    rating: VecDeque<String>,
}

impl RatingForm {
    pub fn new(referee_id: u64) -> Self {
        Self {
            referee_id,
            team1: VecDeque::new(),
            team2: VecDeque::new(),
            rating: VecDeque::new(),
        }
    }

    pub fn push(&mut self, field: FormField) -> Option<RatingSubmission> {
        match field {
            FormField::Team1(value) => self.team1.push_back(value),
            FormField::Team2(value) => self.team2.push_back(value),
            FormField::Rating(value) => self.rating.push_back(value),
        }

        if self.team1.is_empty() || self.team2.is_empty() || self.rating.is_empty() {
            return None;
        }

        Some(RatingSubmission {
            referee_id: self.referee_id,
            team1: self.team1.pop_front()?,
            team2: self.team2.pop_front()?,
            rating: self.rating.pop_front()?,
        })
    }

    pub fn is_pending(&self) -> bool {
        !(self.team1.is_empty() && self.team2.is_empty() && self.rating.is_empty())
    }

    /// Drops every unmatched value; returns how many were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.team1.len() + self.team2.len() + self.rating.len();
        self.team1.clear();
        self.team2.clear();
        self.rating.clear();
        dropped
    }
}

/// Records one match on `referee` and brings its aggregates back in line.
pub fn apply_rating(referee: &mut Referee, team1: &str, team2: &str, rating: i64) {
    referee.statistics.club_ratings.push(rating);
    referee.matches.push(Match {
        team1: team1.to_string(),
        team2: team2.to_string(),
        referee_rating: rating,
    });
    referee.statistics.average_rating = mean(&referee.statistics.club_ratings);
    referee.matches_officiated = referee.statistics.club_ratings.len() as u32;
}

/// Read-modify-write of one referee: fetch, append the rated match,
/// persist the whole record. Nothing is sent when the fetch fails or the
/// rating is not a number.
pub async fn add_match(
    gateway: &dyn RefereeGateway,
    submission: &RatingSubmission,
) -> Result<Referee> {
    let rating = parse_rating(&clamp_rating(&submission.rating)).ok_or_else(|| {
        RosterError::ValidationError {
            message: format!("rating '{}' is not a number", submission.rating),
        }
    })?;

    let mut referee = gateway.fetch_one(submission.referee_id).await?;
    apply_rating(&mut referee, &submission.team1, &submission.team2, rating);

    gateway.update(submission.referee_id, &referee).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, Statistics};

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating("7"), "5");
        assert_eq!(clamp_rating("0"), "1");
        assert_eq!(clamp_rating("-4"), "1");
        assert_eq!(clamp_rating("3"), "3");
        assert_eq!(clamp_rating(" 4 "), "4");
        assert_eq!(clamp_rating("12abc"), "5");
        assert_eq!(clamp_rating("abc"), "abc");
        assert_eq!(clamp_rating(""), "");
    }

    #[test]
    fn test_parse_rating_reads_leading_integer() {
        assert_eq!(parse_rating("3"), Some(3));
        assert_eq!(parse_rating("4.7"), Some(4));
        assert_eq!(parse_rating("  2 goals"), Some(2));
        assert_eq!(parse_rating("+5"), Some(5));
        assert_eq!(parse_rating("-1"), Some(-1));
        assert_eq!(parse_rating("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_rating("x3"), None);
        assert_eq!(parse_rating("-"), None);
    }

    #[test]
    fn test_form_pairs_values_by_position() {
        let mut form = RatingForm::new(9);

        assert_eq!(form.push(FormField::Team1("Radnicki".into())), None);
        assert_eq!(form.push(FormField::Team1("Vozdovac".into())), None);
        assert_eq!(form.push(FormField::Team2("Partizan".into())), None);
        assert!(form.is_pending());

        let first = form.push(FormField::Rating("4".into())).unwrap();
        assert_eq!(first.referee_id, 9);
        assert_eq!(first.team1, "Radnicki");
        assert_eq!(first.team2, "Partizan");
        assert_eq!(first.rating, "4");

        assert_eq!(form.push(FormField::Rating("2".into())), None);
        let second = form.push(FormField::Team2("Cukaricki".into())).unwrap();
        assert_eq!(second.team1, "Vozdovac");
        assert_eq!(second.team2, "Cukaricki");
        assert_eq!(second.rating, "2");
        assert!(!form.is_pending());
    }

    #[test]
    fn test_form_without_rating_never_submits() {
        let mut form = RatingForm::new(1);
        assert_eq!(form.push(FormField::Team1("A".into())), None);
        assert_eq!(form.push(FormField::Team2("B".into())), None);
        assert!(form.is_pending());
    }

    #[test]
    fn test_cancel_clears_unmatched_values() {
        let mut form = RatingForm::new(1);
        form.push(FormField::Team1("A".into()));
        form.push(FormField::Team2("B".into()));

        assert_eq!(form.cancel(), 2);
        assert!(!form.is_pending());
        assert_eq!(form.push(FormField::Rating("5".into())), None);
    }

    #[test]
    fn test_apply_rating_keeps_aggregates_consistent() {
        let mut referee = Referee {
            id: 1,
            first_name: "Marko".into(),
            last_name: "Petrovic".into(),
            category: Category::HeadReferee,
            birth_year: 1984,
            years_experience: 11,
            matches_officiated: 3,
            statistics: Statistics {
                club_ratings: vec![3, 4, 5],
                average_rating: Some(4.0),
            },
            matches: vec![],
        };

        apply_rating(&mut referee, "A", "B", 5);

        assert_eq!(referee.statistics.club_ratings, vec![3, 4, 5, 5]);
        assert_eq!(referee.matches_officiated, 4);
        assert_eq!(referee.statistics.average_rating, Some(4.25));
        assert_eq!(
            referee.matches,
            vec![Match {
                team1: "A".into(),
                team2: "B".into(),
                referee_rating: 5
            }]
        );
    }
}
