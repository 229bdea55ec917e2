pub mod availability;
pub mod card;
pub mod controller;
pub mod rating;
pub mod search;
pub mod statistics;
pub mod streams;

pub use crate::domain::model::{CardView, FilterState, RatingSubmission, Referee};
pub use crate::domain::ports::{ConfigProvider, RefereeGateway, RenderSink};
pub use crate::utils::error::Result;
