use crate::Document;
use crate::types::Id;
use serde_json::Value;

/// Where a notification is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(Id),
}

impl From<Id> for EventTarget {
    fn from(id: Id) -> Self {
        EventTarget::Node(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A bubbling notification. Events are cancelable unless built with
/// [`Event::non_cancelable`].
#[derive(Clone, Debug)]
pub struct Event {
    name: String,
    target: EventTarget,
    current_target: EventTarget,
    detail: Value,
    cancelable: bool,
    default_prevented: bool,
}

impl Event {
    pub fn new(name: impl Into<String>, target: impl Into<EventTarget>) -> Self {
        let target = target.into();
        Self {
            name: name.into(),
            target,
            current_target: target,
            detail: Value::Null,
            cancelable: true,
            default_prevented: false,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    pub fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type Listener = Box<dyn FnMut(&mut Event)>;

pub(crate) struct ListenerEntry {
    id: ListenerId,
    pub(crate) target: EventTarget,
    names: Vec<String>,
    callback: Listener,
}

impl Document {
    /// Registers `callback` for every whitespace-separated name in `names`.
    pub fn listen<F>(&mut self, target: impl Into<EventTarget>, names: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerEntry {
            id,
            target: target.into(),
            names: names.split_ascii_whitespace().map(str::to_string).collect(),
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a listener; returns whether it was registered.
    pub fn ignore(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers `event` to listeners on its target and then on each ancestor.
    /// Returns `false` when a listener prevented the default action.
    pub fn dispatch(&mut self, mut event: Event) -> bool {
        let path = self.propagation_path(event.target);
        let name = event.name.clone();
        log::trace!(target: "dom.event", "dispatch {name} on {:?}", event.target);

        // Listeners only see the event, never the document, so the list can be
        // lent out for the duration of the walk.
        let mut listeners = std::mem::take(&mut self.listeners);
        for current in path {
            event.current_target = current;
            for entry in listeners
                .iter_mut()
                .filter(|l| l.target == current && l.names.iter().any(|n| *n == name))
            {
                (entry.callback)(&mut event);
            }
        }
        self.listeners = listeners;
        !event.default_prevented
    }

    /// Shorthand for dispatching a named event with a detail payload on a node.
    pub fn dispatch_on(&mut self, target: Id, name: &str, detail: Value) -> bool {
        self.dispatch(Event::new(name, target).with_detail(detail))
    }

    fn propagation_path(&self, target: EventTarget) -> Vec<EventTarget> {
        match target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Node(id) => {
                let mut path = Vec::new();
                let mut cursor = Some(id);
                while let Some(current) = cursor {
                    path.push(EventTarget::Node(current));
                    cursor = self.parent(current);
                }
                path
            }
        }
    }
}
