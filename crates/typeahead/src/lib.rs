pub mod behaviours;
pub mod cache;
pub mod css;
mod error;
pub mod options;
pub mod pipeline;
pub mod registry;
mod suggestion;
mod typeahead;

pub use behaviours::{Behaviour, Role};
pub use cache::SuggestionCache;
pub use error::{BehaviourError, FetchError, RegistryError, TypeaheadError};
pub use options::{BehaviourNames, PREFIX, TypeaheadOptions};
pub use pipeline::{CancelToken, FetchBatch, FetchContext, FetchReply, PendingFetch};
pub use registry::{BehaviourRegistry, register_behaviour};
pub use suggestion::{RawItem, Suggestion};
pub use typeahead::{CloseReason, SelectOutcome, Typeahead};
