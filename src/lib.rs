pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{HttpGateway, TerminalRenderer};
pub use config::{PipelineTimings, RosterConfig};
pub use crate::core::card::CardHandle;
pub use crate::core::controller::{PageHandle, RenderContext, RosterController};
pub use domain::model::{Category, FilterState, Match, RatingSubmission, Referee, Statistics};
pub use domain::ports::{RefereeGateway, RenderSink};
pub use utils::error::{Result, RosterError};
