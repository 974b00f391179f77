//! Named strategies, one table per role. Swapping the name chosen for a role
//! is the extension mechanism; see [`crate::registry`].

pub mod coerce;
pub mod element;
pub mod fetch;
pub mod filter;
pub mod input;
pub mod query;
pub mod sort;

use crate::error::BehaviourError;
use crate::pipeline::{CancelToken, FetchContext, FetchReply};
use crate::suggestion::{RawItem, Suggestion};
use crate::typeahead::Typeahead;
use dom::{Document, DomError, Id};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Coerce,
    Element,
    Fetch,
    Filter,
    Input,
    Query,
    Sort,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Coerce,
        Role::Element,
        Role::Fetch,
        Role::Filter,
        Role::Input,
        Role::Query,
        Role::Sort,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Coerce => "coerce",
            Role::Element => "element",
            Role::Fetch => "fetch",
            Role::Filter => "filter",
            Role::Input => "input",
            Role::Query => "query",
            Role::Sort => "sort",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type CoerceFn =
    Arc<dyn Fn(&Typeahead, RawItem) -> Result<Suggestion, BehaviourError> + Send + Sync>;
pub type ElementFn =
    Arc<dyn Fn(&Typeahead, &mut Document, &Suggestion, &str) -> Result<Id, DomError> + Send + Sync>;
pub type FetchFn = Arc<dyn Fn(&FetchContext<'_>, &str, CancelToken) -> FetchReply + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&Typeahead, &Suggestion, &str) -> bool + Send + Sync>;
pub type InputFn =
    Arc<dyn Fn(&Typeahead, &mut Document, Option<&Suggestion>) -> Result<(), DomError> + Send + Sync>;
pub type QueryFn = Arc<dyn Fn(&Typeahead, &Document) -> String + Send + Sync>;
pub type SortFn = Arc<dyn Fn(&Typeahead, &str, &Suggestion, &Suggestion) -> Ordering + Send + Sync>;

/// A strategy tagged with the role whose signature it implements.
#[derive(Clone)]
pub enum Behaviour {
    Coerce(CoerceFn),
    Element(ElementFn),
    Fetch(FetchFn),
    Filter(FilterFn),
    Input(InputFn),
    Query(QueryFn),
    Sort(SortFn),
}

impl Behaviour {
    pub fn role(&self) -> Role {
        match self {
            Behaviour::Coerce(_) => Role::Coerce,
            Behaviour::Element(_) => Role::Element,
            Behaviour::Fetch(_) => Role::Fetch,
            Behaviour::Filter(_) => Role::Filter,
            Behaviour::Input(_) => Role::Input,
            Behaviour::Query(_) => Role::Query,
            Behaviour::Sort(_) => Role::Sort,
        }
    }

    pub fn coerce<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, RawItem) -> Result<Suggestion, BehaviourError> + Send + Sync + 'static,
    {
        Behaviour::Coerce(Arc::new(f))
    }

    pub fn element<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, &mut Document, &Suggestion, &str) -> Result<Id, DomError>
            + Send
            + Sync
            + 'static,
    {
        Behaviour::Element(Arc::new(f))
    }

    pub fn fetch<F>(f: F) -> Self
    where
        F: Fn(&FetchContext<'_>, &str, CancelToken) -> FetchReply + Send + Sync + 'static,
    {
        Behaviour::Fetch(Arc::new(f))
    }

    pub fn filter<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, &Suggestion, &str) -> bool + Send + Sync + 'static,
    {
        Behaviour::Filter(Arc::new(f))
    }

    pub fn input<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, &mut Document, Option<&Suggestion>) -> Result<(), DomError>
            + Send
            + Sync
            + 'static,
    {
        Behaviour::Input(Arc::new(f))
    }

    pub fn query<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, &Document) -> String + Send + Sync + 'static,
    {
        Behaviour::Query(Arc::new(f))
    }

    pub fn sort<F>(f: F) -> Self
    where
        F: Fn(&Typeahead, &str, &Suggestion, &Suggestion) -> Ordering + Send + Sync + 'static,
    {
        Behaviour::Sort(Arc::new(f))
    }
}

impl fmt::Debug for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behaviour::{}", self.role())
    }
}
