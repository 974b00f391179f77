use dom::{ConfigError, DomError};
use thiserror::Error;
use typeahead::BehaviourError;

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no {role} behaviour named {name:?}")]
    UnknownBehaviour { role: &'static str, name: String },
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Behaviour(#[from] BehaviourError),
    #[error("token data is malformed: {0}")]
    MalformedToken(#[from] serde_json::Error),
    #[error("tokenizer is not initialized")]
    NotInitialized,
}
