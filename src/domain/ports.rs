use crate::domain::model::{CardView, FilterState, Referee};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Access to the referee REST service.
///
/// Read operations never fail: transport and status errors are logged by
/// the implementation and surface as an empty list. `fetch_one` and
/// `update` propagate their errors because the write flow must tell a
/// missing referee apart from a found one.
#[async_trait]
pub trait RefereeGateway: Send + Sync {
    async fn fetch_all(&self) -> Vec<Referee>;
    async fn find_by_first_name(&self, name: &str) -> Vec<Referee>;
    async fn find_by_last_name(&self, name: &str) -> Vec<Referee>;
    async fn fetch_one(&self, id: u64) -> Result<Referee>;
    async fn update(&self, id: u64, referee: &Referee) -> Result<Referee>;
}

/// Where the roster is drawn. `render_cards` always replaces the whole
/// list; the per-card setters address a card of the current render by
/// referee id. Freshly rendered cards are available, with the rate
/// control disabled and the rating form hidden.
pub trait RenderSink: Send + Sync {
    fn render_banner(&self, total_matches: u64);
    fn render_cards(&self, cards: &[CardView], filter: FilterState);
    fn set_availability(&self, referee_id: u64, available: bool);
    fn set_rate_enabled(&self, referee_id: u64, enabled: bool);
    fn set_form_visible(&self, referee_id: u64, visible: bool);
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn first_name_url(&self) -> &str;
    fn last_name_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}
