mod config;
mod document;
mod error;
mod event;
mod query;
mod types;

pub use config::{config, config_into, dash_case, parse_int};
pub use document::Document;
pub use error::{ConfigError, DomError};
pub use event::{Event, EventTarget, Listener, ListenerId};
pub use query::SelectorList;
pub use types::{Id, Rect};

#[cfg(test)]
mod tests;
