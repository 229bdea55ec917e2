use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Head Referee")]
    HeadReferee,
    #[serde(rename = "Assistant Referee")]
    AssistantReferee,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::HeadReferee => write!(f, "Head Referee"),
            Category::AssistantReferee => write!(f, "Assistant Referee"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub club_ratings: Vec<i64>,
    /// Mean of `club_ratings`; absent while no rating has been recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub team1: String,
    pub team2: String,
    pub referee_rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub category: Category,
    pub birth_year: i32,
    pub years_experience: u32,
    pub matches_officiated: u32,
    pub statistics: Statistics,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Referee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One completed rating form, assembled from the three debounced fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSubmission {
    pub referee_id: u64,
    pub team1: String,
    pub team2: String,
    /// Clamped text of the rating field; parsed when the write runs.
    pub rating: String,
}

/// Per-rating frequencies behind a card's bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingHistogram {
    pub total_matches: u32,
    /// Always holds keys 1 through 5.
    pub counts_by_rating: BTreeMap<u8, u32>,
}

impl RatingHistogram {
    pub fn count(&self, rating: u8) -> u32 {
        self.counts_by_rating.get(&rating).copied().unwrap_or(0)
    }

    /// Bar height for `rating` as a share of all officiated matches.
    pub fn percentage(&self, rating: u8) -> Option<f64> {
        if self.total_matches == 0 {
            return None;
        }
        Some(self.count(rating) as f64 / self.total_matches as f64 * 100.0)
    }
}

/// Everything a renderer needs to draw one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub referee: Referee,
    pub histogram: RatingHistogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterState {
    #[default]
    All,
    Head,
    Assistant,
}

impl FilterState {
    pub fn matches(&self, referee: &Referee) -> bool {
        match self {
            FilterState::All => true,
            FilterState::Head => referee.category == Category::HeadReferee,
            FilterState::Assistant => referee.category == Category::AssistantReferee,
        }
    }
}

impl FromStr for FilterState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterState::All),
            "head" => Ok(FilterState::Head),
            "assistant" => Ok(FilterState::Assistant),
            other => Err(format!(
                "unknown filter '{}', expected one of: all, head, assistant",
                other
            )),
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterState::All => write!(f, "all"),
            FilterState::Head => write!(f, "head"),
            FilterState::Assistant => write!(f, "assistant"),
        }
    }
}
