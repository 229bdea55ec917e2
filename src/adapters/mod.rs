// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod terminal;

pub use http::HttpGateway;
pub use terminal::TerminalRenderer;
