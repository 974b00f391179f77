//! Class names forming the styling contract of the chip list.

pub const TOKENIZER: &str = "mh-tokenizer";
pub const TOKEN: &str = "mh-token";
pub const LABEL: &str = "mh-token__label";
pub const REMOVE: &str = "mh-token__remove";
