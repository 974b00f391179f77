pub mod behaviours;
pub mod css;
mod error;
pub mod options;
mod tokenizer;

pub use behaviours::TokenizerBehaviours;
pub use error::TokenizerError;
pub use options::{PREFIX, TokenizerBehaviourNames, TokenizerOptions};
pub use tokenizer::{Token, Tokenizer};

#[cfg(test)]
mod tests;
