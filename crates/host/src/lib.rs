//! Element to widget registry plus the event routing a page would otherwise
//! do with DOM listeners.

mod error;
mod event;
mod widget_host;

pub use error::HostError;
pub use event::HostEvent;
pub use widget_host::WidgetHost;
