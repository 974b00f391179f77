use crate::error::BehaviourError;
use crate::suggestion::{RawItem, Suggestion};
use crate::typeahead::Typeahead;

pub fn pass_through(_: &Typeahead, item: RawItem) -> Result<Suggestion, BehaviourError> {
    item.into_shaped()
}

pub fn value_only(_: &Typeahead, item: RawItem) -> Result<Suggestion, BehaviourError> {
    item.into_value_only()
}
