use crate::Id;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(Id),
    #[error("node {0:?} is not an element")]
    WrongNodeKind(Id),
    #[error("node {0:?} cannot have children")]
    InvalidParent(Id),
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: Id, child: Id },
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: Id, child: Id },
    #[error("node {0:?} holds the document body and cannot be removed")]
    Protected(Id),
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}
