use crate::error::DomError;
use crate::event::ListenerEntry;
use crate::types::{ElementData, Id, NodeKind, NodeRecord, Rect, is_void_element};
use serde_json::Value;

/// Headless document: an arena of nodes addressed by [`Id`].
///
/// Detached nodes stay allocated so widgets may keep handles to their own
/// subtrees across removal and re-insertion. [`Document::remove_subtree`]
/// frees a subtree for good; its ids go back on a free list and are handed
/// out again by later allocations.
pub struct Document {
    nodes: Vec<Option<NodeRecord>>,
    free: Vec<Id>,
    root: Id,
    body: Id,
    scroll: (f32, f32),
    pub(crate) listeners: Vec<ListenerEntry>,
    pub(crate) next_listener: u64,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Some(NodeRecord::new(NodeKind::Document))],
            free: Vec::new(),
            root: Id(0),
            body: Id(0),
            scroll: (0.0, 0.0),
            listeners: Vec::new(),
            next_listener: 0,
        };
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        // Fresh nodes under a fresh root; linking cannot fail.
        let _ = doc.append_child(doc.root, html);
        let _ = doc.append_child(html, body);
        doc.body = body;
        doc
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn body(&self) -> Id {
        self.body
    }

    fn alloc(&mut self, kind: NodeKind) -> Id {
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
                *slot = Some(NodeRecord::new(kind));
                return id;
            }
        }
        let id = Id(self.nodes.len() as core_types::NodeId);
        self.nodes.push(Some(NodeRecord::new(kind)));
        id
    }

    /// Number of allocated nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn create_element(&mut self, name: &str) -> Id {
        self.alloc(NodeKind::Element(ElementData::new(name)))
    }

    /// Creates an element with attributes in one go. A `value` attribute also
    /// seeds the live value property.
    pub fn create(&mut self, name: &str, attributes: &[(&str, &str)]) -> Id {
        let mut data = ElementData::new(name);
        for (k, v) in attributes {
            if k.eq_ignore_ascii_case("value") {
                data.value = (*v).to_string();
            }
            data.attributes
                .push((k.to_ascii_lowercase(), Some((*v).to_string())));
        }
        self.alloc(NodeKind::Element(data))
    }

    pub fn create_text(&mut self, text: &str) -> Id {
        self.alloc(NodeKind::Text {
            text: text.to_string(),
        })
    }

    pub(crate) fn record(&self, id: Id) -> Result<&NodeRecord, DomError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(DomError::UnknownNode(id))
    }

    fn record_mut(&mut self, id: Id) -> Result<&mut NodeRecord, DomError> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element(&self, id: Id) -> Result<&ElementData, DomError> {
        match &self.record(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(DomError::WrongNodeKind(id)),
        }
    }

    fn element_mut(&mut self, id: Id) -> Result<&mut ElementData, DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(DomError::WrongNodeKind(id)),
        }
    }

    pub fn is_element(&self, id: Id) -> bool {
        self.element(id).is_ok()
    }

    /// Lower-cased tag name, `None` for non-elements.
    pub fn tag_name(&self, id: Id) -> Option<&str> {
        self.element(id).ok().map(|e| e.name.as_str())
    }

    // --- tree ---

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).ok().and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: Id) -> Vec<Id> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// True when `node` is `ancestor` or sits somewhere below it.
    pub fn contains(&self, ancestor: Id, node: Id) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_connected(&self, id: Id) -> bool {
        self.contains(self.root, id)
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` ahead of `before` (or last). A node that
    /// already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: Id,
        child: Id,
        before: Option<Id>,
    ) -> Result<(), DomError> {
        if !self.record(parent)?.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        self.record(child)?;
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if let Some(before) = before {
            if before == child {
                return Ok(());
            }
            if self.parent(before) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: before,
                });
            }
        }
        self.detach(child)?;
        let siblings = &mut self.record_mut(parent)?.children;
        let at = before
            .and_then(|b| siblings.iter().position(|c| *c == b))
            .unwrap_or(siblings.len());
        siblings.insert(at, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Unlinks `id` from its parent, if it has one.
    pub fn detach(&mut self, id: Id) -> Result<(), DomError> {
        let Some(parent) = self.record(id)?.parent else {
            return Ok(());
        };
        self.record_mut(parent)?.children.retain(|c| *c != id);
        self.record_mut(id)?.parent = None;
        Ok(())
    }

    /// Detaches `id` and frees it with every node below it. Listeners on the
    /// freed nodes are dropped; later lookups of the ids fail with
    /// [`DomError::UnknownNode`] until they are reused.
    pub fn remove_subtree(&mut self, id: Id) -> Result<(), DomError> {
        if self.contains(id, self.body) {
            return Err(DomError::Protected(id));
        }
        self.detach(id)?;
        let mut stack = vec![id];
        let mut freed = Vec::new();
        while let Some(current) = stack.pop() {
            let Some(record) = self
                .nodes
                .get_mut(current.0 as usize)
                .and_then(Option::take)
            else {
                continue;
            };
            stack.extend(record.children);
            freed.push(current);
        }
        self.listeners
            .retain(|l| !matches!(l.target, crate::EventTarget::Node(n) if freed.contains(&n)));
        self.free.extend(freed);
        Ok(())
    }

    /// Frees every child subtree of `parent`, leaving it empty.
    pub fn discard_children(&mut self, parent: Id) -> Result<(), DomError> {
        let children = self.record(parent)?.children.clone();
        for child in children {
            self.remove_subtree(child)?;
        }
        Ok(())
    }

    // --- attributes ---

    pub fn attribute(&self, id: Id, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| e.attribute(name))
    }

    pub fn has_attribute(&self, id: Id, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        let name = name.to_ascii_lowercase();
        match element.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = Some(value.to_string()),
            None => element.attributes.push((name, Some(value.to_string()))),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: Id, name: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        element
            .attributes
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    // --- classes ---

    pub fn has_class(&self, id: Id, class: &str) -> bool {
        self.element(id).is_ok_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: Id, class: &str) -> Result<(), DomError> {
        if self.element(id)?.has_class(class) {
            return Ok(());
        }
        let joined = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &joined)
    }

    pub fn remove_class(&mut self, id: Id, class: &str) -> Result<(), DomError> {
        let Some(existing) = self.attribute(id, "class") else {
            self.element(id)?;
            return Ok(());
        };
        let kept = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &kept)
    }

    // --- inline style ---

    pub fn style(&self, id: Id, property: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| {
            e.style
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn set_style(&mut self, id: Id, property: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        match element.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => element
                .style
                .push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    // --- properties ---

    /// The live `value` property of a form control.
    pub fn value(&self, id: Id) -> &str {
        self.element(id).map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: Id, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.value = value.to_string();
        Ok(())
    }

    pub fn data(&self, id: Id, key: &str) -> Option<&Value> {
        self.element(id).ok().and_then(|e| e.data.get(key))
    }

    pub fn set_data(&mut self, id: Id, key: &str, value: Value) -> Result<(), DomError> {
        self.element_mut(id)?.data.insert(key.to_string(), value);
        Ok(())
    }

    pub fn take_data(&mut self, id: Id, key: &str) -> Option<Value> {
        self.element_mut(id).ok().and_then(|e| e.data.remove(key))
    }

    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: Id, out: &mut String) {
        let Ok(record) = self.record(id) else {
            return;
        };
        if let NodeKind::Text { text } = &record.kind {
            out.push_str(text);
        }
        for child in &record.children {
            self.collect_text(*child, out);
        }
    }

    /// Replaces every child of `id` with a single text node.
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        self.discard_children(id)?;
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    // --- geometry ---

    pub fn bounding_rect(&self, id: Id) -> Rect {
        self.element(id).map(|e| e.rect).unwrap_or_default()
    }

    /// Layout is owned by the embedder; it reports element boxes here.
    pub fn set_bounding_rect(&mut self, id: Id, rect: Rect) -> Result<(), DomError> {
        self.element_mut(id)?.rect = rect;
        Ok(())
    }

    /// Page scroll offsets `(scrollX, scrollY)`.
    pub fn scroll_offset(&self) -> (f32, f32) {
        self.scroll
    }

    pub fn set_scroll_offset(&mut self, x: f32, y: f32) {
        self.scroll = (x, y);
    }

    // --- serialization ---

    pub fn outer_html(&self, id: Id) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    pub fn inner_html(&self, id: Id) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize(*child, &mut out);
        }
        out
    }

    fn serialize(&self, id: Id, out: &mut String) {
        let Ok(record) = self.record(id) else {
            return;
        };
        match &record.kind {
            NodeKind::Document => {
                for child in &record.children {
                    self.serialize(*child, out);
                }
            }
            NodeKind::Text { text } => escape_into(text, false, out),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (k, v) in &element.attributes {
                    out.push(' ');
                    out.push_str(k);
                    if let Some(v) = v {
                        out.push_str("=\"");
                        escape_into(v, true, out);
                        out.push('"');
                    }
                }
                if !element.style.is_empty() {
                    let style: Vec<String> = element
                        .style
                        .iter()
                        .map(|(k, v)| format!("{k}: {v};"))
                        .collect();
                    out.push_str(" style=\"");
                    escape_into(&style.join(" "), true, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&element.name) {
                    return;
                }
                for child in &record.children {
                    self.serialize(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }

    /// Element descendants of `scope` in document order, `scope` excluded.
    pub(crate) fn descendants(&self, scope: Id) -> Vec<Id> {
        let mut out = Vec::new();
        let mut stack: Vec<Id> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
