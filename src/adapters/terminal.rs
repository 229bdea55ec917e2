use crate::domain::model::{CardView, FilterState};
use crate::domain::ports::RenderSink;
use chrono::Datelike;

const BAR_WIDTH: usize = 20;

/// Draws the roster as plain text on stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

pub fn format_card(card: &CardView, current_year: i32) -> String {
    let referee = &card.referee;
    let average = referee
        .statistics
        .average_rating
        .map(|avg| format!("{:.2}", avg))
        .unwrap_or_else(|| "n/a".to_string());

    let mut lines = vec![
        format!("[#{}] {}", referee.id, referee.full_name()),
        format!("  Category: {}", referee.category),
        format!(
            "  Born: {} (age {}), {} years of experience",
            referee.birth_year,
            current_year - referee.birth_year,
            referee.years_experience
        ),
        format!("  Club ratings: {:?}", referee.statistics.club_ratings),
        format!("  Average rating: {}", average),
    ];

    for rating in 1..=5u8 {
        let share = card.histogram.percentage(rating).unwrap_or(0.0);
        let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
        lines.push(format!(
            "  {} | {:<width$} {:>5.1}%",
            rating,
            "#".repeat(filled.min(BAR_WIDTH)),
            share,
            width = BAR_WIDTH
        ));
    }

    lines.join("\n")
}

impl RenderSink for TerminalRenderer {
    fn render_banner(&self, total_matches: u64) {
        println!(
            "Total matches officiated by all referees of our association: {}",
            total_matches
        );
    }

    fn render_cards(&self, cards: &[CardView], filter: FilterState) {
        println!("=== {} referee(s), filter: {} ===", cards.len(), filter);
        if cards.is_empty() {
            println!("No referees.");
        }
        let year = chrono::Local::now().year();
        for card in cards {
            println!("{}", format_card(card, year));
            println!("  Availability: available | rate: locked");
        }
    }

    fn set_availability(&self, referee_id: u64, available: bool) {
        let marker = if available { "available" } else { "unavailable" };
        println!("[#{}] Availability: {}", referee_id, marker);
    }

    fn set_rate_enabled(&self, referee_id: u64, enabled: bool) {
        let marker = if enabled { "unlocked" } else { "locked" };
        println!("[#{}] Rate control {}", referee_id, marker);
    }

    fn set_form_visible(&self, referee_id: u64, visible: bool) {
        let marker = if visible { "opened" } else { "closed" };
        println!("[#{}] Rating form {}", referee_id, marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statistics::{compute_average, compute_histogram};
    use crate::domain::model::{Category, Referee, Statistics};

    fn referee(ratings: Vec<i64>) -> Referee {
        Referee {
            id: 4,
            first_name: "Ana".to_string(),
            last_name: "Ilic".to_string(),
            category: Category::AssistantReferee,
            birth_year: 1990,
            years_experience: 6,
            matches_officiated: ratings.len() as u32,
            statistics: Statistics {
                club_ratings: ratings,
                average_rating: None,
            },
            matches: vec![],
        }
    }

    #[test]
    fn test_format_card_with_ratings() {
        let referee = compute_average(&referee(vec![5, 5, 3, 4]));
        let card = CardView {
            histogram: compute_histogram(&referee),
            referee,
        };

        let text = format_card(&card, 2026);
        assert!(text.contains("[#4] Ana Ilic"));
        assert!(text.contains("Assistant Referee"));
        assert!(text.contains("age 36"));
        assert!(text.contains("Average rating: 4.25"));
        assert!(text.contains(" 50.0%"));
    }

    #[test]
    fn test_format_card_without_ratings_shows_no_average() {
        let referee = compute_average(&referee(vec![]));
        let card = CardView {
            histogram: compute_histogram(&referee),
            referee,
        };

        let text = format_card(&card, 2026);
        assert!(text.contains("Average rating: n/a"));
        assert!(!text.contains("NaN"));
    }
}
