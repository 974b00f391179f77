use crate::behaviours::{
    Behaviour, CoerceFn, ElementFn, FetchFn, FilterFn, InputFn, QueryFn, Role, SortFn, coerce,
    element, fetch, filter, input, query, sort,
};
use crate::error::{RegistryError, TypeaheadError};
use crate::options::BehaviourNames;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Behaviours by role and name.
#[derive(Clone, Debug, Default)]
pub struct BehaviourRegistry {
    table: HashMap<(Role, String), Behaviour>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in behaviour set.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins = [
            ("passThrough", Behaviour::coerce(coerce::pass_through)),
            ("valueOnly", Behaviour::coerce(coerce::value_only)),
            ("default", Behaviour::element(element::default)),
            ("ajax", Behaviour::fetch(fetch::ajax)),
            ("array", Behaviour::fetch(fetch::array)),
            ("csv", Behaviour::fetch(fetch::string)),
            ("dataList", Behaviour::fetch(fetch::data_list)),
            ("elements", Behaviour::fetch(fetch::elements)),
            ("json", Behaviour::fetch(fetch::json)),
            ("string", Behaviour::fetch(fetch::string)),
            ("contains", Behaviour::filter(filter::contains)),
            ("startswith", Behaviour::filter(filter::starts_with)),
            ("setHidden", Behaviour::input(input::set_hidden)),
            ("setValue", Behaviour::input(input::set_value)),
            ("tokenizer", Behaviour::input(input::tokenizer)),
            ("value", Behaviour::query(query::value)),
            ("length", Behaviour::sort(sort::length)),
        ];
        for (name, behaviour) in builtins {
            registry
                .table
                .insert((behaviour.role(), name.to_string()), behaviour);
        }
        registry
    }

    /// Adds or replaces `name` for `role`. The behaviour's signature must be
    /// the one `role` calls for.
    pub fn register(
        &mut self,
        role: Role,
        name: &str,
        behaviour: Behaviour,
    ) -> Result<(), RegistryError> {
        if behaviour.role() != role {
            return Err(RegistryError::RoleMismatch {
                name: name.to_string(),
                expected: role,
                actual: behaviour.role(),
            });
        }
        log::debug!(target: "typeahead", "registering {role} behaviour {name:?}");
        self.table.insert((role, name.to_string()), behaviour);
        Ok(())
    }

    pub fn unregister(&mut self, role: Role, name: &str) -> Option<Behaviour> {
        self.table.remove(&(role, name.to_string()))
    }

    pub fn get(&self, role: Role, name: &str) -> Option<&Behaviour> {
        self.table.get(&(role, name.to_string()))
    }

    /// Registered names for `role`, sorted.
    pub fn names(&self, role: Role) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .table
            .keys()
            .filter(|(r, _)| *r == role)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Looks every selected name up once. Missing names are remembered and
    /// reported when the role is first used.
    pub fn resolve(&self, names: &BehaviourNames) -> ResolvedBehaviours {
        ResolvedBehaviours {
            coerce: self.slot(Role::Coerce, &names.coerce, |b| match b {
                Behaviour::Coerce(f) => Some(f.clone()),
                _ => None,
            }),
            element: self.slot(Role::Element, &names.element, |b| match b {
                Behaviour::Element(f) => Some(f.clone()),
                _ => None,
            }),
            fetch: self.slot(Role::Fetch, &names.fetch, |b| match b {
                Behaviour::Fetch(f) => Some(f.clone()),
                _ => None,
            }),
            filter: self.slot(Role::Filter, &names.filter, |b| match b {
                Behaviour::Filter(f) => Some(f.clone()),
                _ => None,
            }),
            input: self.slot(Role::Input, &names.input, |b| match b {
                Behaviour::Input(f) => Some(f.clone()),
                _ => None,
            }),
            query: self.slot(Role::Query, &names.query, |b| match b {
                Behaviour::Query(f) => Some(f.clone()),
                _ => None,
            }),
            sort: self.slot(Role::Sort, &names.sort, |b| match b {
                Behaviour::Sort(f) => Some(f.clone()),
                _ => None,
            }),
        }
    }

    fn slot<F>(&self, role: Role, name: &str, pick: impl Fn(&Behaviour) -> Option<F>) -> Slot<F> {
        let found = self.get(role, name).and_then(pick);
        if found.is_none() {
            log::warn!(target: "typeahead", "no {role} behaviour named {name:?}");
        }
        Slot {
            role,
            name: name.to_string(),
            found,
        }
    }
}

#[derive(Clone)]
struct Slot<F> {
    role: Role,
    name: String,
    found: Option<F>,
}

impl<F: Clone> Slot<F> {
    fn get(&self) -> Result<F, TypeaheadError> {
        self.found
            .clone()
            .ok_or_else(|| TypeaheadError::UnknownBehaviour {
                role: self.role,
                name: self.name.clone(),
            })
    }
}

/// One instance's behaviour table, fixed at construction.
#[derive(Clone)]
pub struct ResolvedBehaviours {
    coerce: Slot<CoerceFn>,
    element: Slot<ElementFn>,
    fetch: Slot<FetchFn>,
    filter: Slot<FilterFn>,
    input: Slot<InputFn>,
    query: Slot<QueryFn>,
    sort: Slot<SortFn>,
}

impl ResolvedBehaviours {
    pub fn coerce(&self) -> Result<CoerceFn, TypeaheadError> {
        self.coerce.get()
    }

    pub fn element(&self) -> Result<ElementFn, TypeaheadError> {
        self.element.get()
    }

    pub fn fetch(&self) -> Result<FetchFn, TypeaheadError> {
        self.fetch.get()
    }

    pub fn filter(&self) -> Result<FilterFn, TypeaheadError> {
        self.filter.get()
    }

    pub fn input(&self) -> Result<InputFn, TypeaheadError> {
        self.input.get()
    }

    pub fn query(&self) -> Result<QueryFn, TypeaheadError> {
        self.query.get()
    }

    pub fn sort(&self) -> Result<SortFn, TypeaheadError> {
        self.sort.get()
    }
}

static GLOBAL: OnceLock<RwLock<BehaviourRegistry>> = OnceLock::new();

/// The process-wide registry instances resolve against by default. Starts
/// out as [`BehaviourRegistry::builtin`].
pub fn global() -> &'static RwLock<BehaviourRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(BehaviourRegistry::builtin()))
}

/// Registers a behaviour in the [`global`] registry.
pub fn register_behaviour(
    role: Role,
    name: &str,
    behaviour: Behaviour,
) -> Result<(), RegistryError> {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(role, name, behaviour)
}

/// Runs `f` with read access to the [`global`] registry.
pub fn with_global<R>(f: impl FnOnce(&BehaviourRegistry) -> R) -> R {
    let registry = global().read().unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}
