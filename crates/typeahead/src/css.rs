//! Class names forming the styling contract of the dropdown.

pub const TYPEAHEAD: &str = "mh-typeahead";
pub const OPEN: &str = "mh-typeahead--open";
pub const SUGGESTION: &str = "mh-typeahead__suggestion";
pub const FOCUSED: &str = "mh-typeahead__suggestion--focused";
