use crate::behaviours::Role;
use dom::{ConfigError, DomError};
use net::NetError;
use thiserror::Error;

/// Why a fetch produced no batch. The pipeline treats every variant as "no
/// suggestions" and closes the dropdown.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("list option must be {expected}")]
    ListShape { expected: &'static str },
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("fetch failed: {0}")]
    Failed(String),
    #[error("fetch worker exited without a reply")]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BehaviourError {
    #[error("cannot coerce {0} into a suggestion")]
    Uncoercible(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{name:?} was registered as a {expected} behaviour but is a {actual} behaviour")]
    RoleMismatch {
        name: String,
        expected: Role,
        actual: Role,
    },
}

#[derive(Debug, Error)]
pub enum TypeaheadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no {role} behaviour named {name:?}")]
    UnknownBehaviour { role: Role, name: String },
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Behaviour(#[from] BehaviourError),
    #[error("typeahead is not initialized")]
    NotInitialized,
}
