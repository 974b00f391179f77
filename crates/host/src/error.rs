use dom::{DomError, Id};
use thiserror::Error;
use tokenizer::TokenizerError;
use typeahead::TypeaheadError;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Typeahead(#[from] TypeaheadError),
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("{0:?} already has a {1} attached")]
    AlreadyAttached(Id, &'static str),
}
