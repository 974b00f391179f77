use core_types::NodeId;
use serde_json::Value;
use std::collections::HashMap;

/// Handle to a node owned by a [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

/// Screen rectangle in CSS pixels, relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn left(&self) -> f32 {
        self.x
    }
}

pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<Id>,
    pub(crate) children: Vec<Id>,
}

impl NodeRecord {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
    }
}

pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text { text: String },
}

pub(crate) struct ElementData {
    pub(crate) name: String,
    /// Attribute order is preserved; `None` marks a valueless attribute.
    pub(crate) attributes: Vec<(String, Option<String>)>,
    pub(crate) style: Vec<(String, String)>,
    /// Live `value` property (form controls).
    pub(crate) value: String,
    /// Script-side properties hung off the element (`elm._token` and friends).
    pub(crate) data: HashMap<String, Value>,
    pub(crate) rect: Rect,
}

impl ElementData {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Vec::new(),
            value: String::new(),
            data: HashMap::new(),
            rect: Rect::default(),
        }
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}
