//! A small selector engine: type, `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]` compounds joined by descendant or `>` combinators, with
//! `,` separated alternatives.

use crate::error::DomError;
use crate::types::Id;
use crate::Document;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList(Vec<Complex>);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    /// Rightmost compound last; `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        !self.universal
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let fail = |reason: &str| DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };
        let mut list = Vec::new();
        for part in split_list(selector) {
            list.push(parse_complex(part).map_err(fail)?);
        }
        Ok(Self(list))
    }

    pub fn matches(&self, doc: &Document, element: Id) -> bool {
        self.0.iter().any(|c| c.matches(doc, element))
    }
}

/// Splits a selector list on commas that sit outside quotes and brackets.
fn split_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    for (at, ch) in selector.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&selector[start..at]);
                start = at + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn parse_complex(input: &str) -> Result<Complex, &'static str> {
    let mut chars = input.trim().chars().peekable();
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = Compound::default();
    let mut pending: Option<Combinator> = None;

    if chars.peek().is_none() {
        return Err("empty selector");
    }

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' | '\n' | '>' => {
                let mut combinator = Combinator::Descendant;
                while let Some(&c) = chars.peek() {
                    match c {
                        '>' => combinator = Combinator::Child,
                        c if c.is_whitespace() => {}
                        _ => break,
                    }
                    chars.next();
                }
                if current.is_empty() {
                    return Err("combinator without a left-hand compound");
                }
                compounds.push(std::mem::take(&mut current));
                pending = Some(combinator);
            }
            '#' | '.' => {
                chars.next();
                let name = take_ident(&mut chars);
                if name.is_empty() {
                    return Err("expected a name after `#` or `.`");
                }
                if ch == '#' {
                    current.id = Some(name);
                } else {
                    current.classes.push(name);
                }
            }
            '[' => {
                chars.next();
                let name = take_ident(&mut chars).to_ascii_lowercase();
                if name.is_empty() {
                    return Err("expected an attribute name");
                }
                let value = match chars.next() {
                    Some(']') => None,
                    Some('=') => {
                        let value = match chars.peek() {
                            Some(&q) if q == '"' || q == '\'' => {
                                chars.next();
                                let mut value = String::new();
                                loop {
                                    match chars.next() {
                                        Some(c) if c == q => break,
                                        Some(c) => value.push(c),
                                        None => return Err("unterminated attribute value"),
                                    }
                                }
                                value
                            }
                            _ => take_ident(&mut chars),
                        };
                        if chars.next() != Some(']') {
                            return Err("expected `]`");
                        }
                        Some(value)
                    }
                    _ => return Err("unsupported attribute operator"),
                };
                current.attributes.push((name, value));
            }
            '*' => {
                chars.next();
                if !current.is_empty() {
                    return Err("universal selector must start a compound");
                }
                current.universal = true;
            }
            c if is_ident_char(c) => {
                if !current.is_empty() {
                    return Err("type selector must start a compound");
                }
                current.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
            }
            _ => return Err("unexpected character"),
        }
        if let Some(combinator) = pending.take() {
            if chars.peek().is_none() {
                return Err("dangling combinator");
            }
            combinators.push(combinator);
        }
    }

    if current.is_empty() && !compounds.is_empty() {
        return Err("dangling combinator");
    }
    compounds.push(current);
    Ok(Complex {
        compounds,
        combinators,
    })
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

impl Compound {
    fn matches(&self, doc: &Document, element: Id) -> bool {
        let Ok(data) = doc.element(element) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|t| *t != data.name) {
            return false;
        }
        if self
            .id
            .as_ref()
            .is_some_and(|id| data.attribute("id") != Some(id.as_str()))
        {
            return false;
        }
        if !self.classes.iter().all(|c| data.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|(name, value)| {
            match (data.attribute(name), value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            }
        })
    }
}

impl Complex {
    fn matches(&self, doc: &Document, element: Id) -> bool {
        self.matches_at(doc, self.compounds.len() - 1, element)
    }

    fn matches_at(&self, doc: &Document, index: usize, element: Id) -> bool {
        if !self.compounds[index].matches(doc, element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(element)
                .is_some_and(|p| self.matches_at(doc, index - 1, p)),
            Combinator::Descendant => {
                let mut cursor = doc.parent(element);
                while let Some(ancestor) = cursor {
                    if self.matches_at(doc, index - 1, ancestor) {
                        return true;
                    }
                    cursor = doc.parent(ancestor);
                }
                false
            }
        }
    }
}

impl Document {
    /// First element below `scope` (the whole document when `None`) matching
    /// `selector`, in document order.
    pub fn one(&self, selector: &str, scope: Option<Id>) -> Result<Option<Id>, DomError> {
        let list = SelectorList::parse(selector)?;
        let scope = scope.unwrap_or(self.root());
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|id| list.matches(self, *id)))
    }

    /// Every element below `scope` matching `selector`, in document order.
    pub fn many(&self, selector: &str, scope: Option<Id>) -> Result<Vec<Id>, DomError> {
        let list = SelectorList::parse(selector)?;
        let scope = scope.unwrap_or(self.root());
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|id| list.matches(self, *id))
            .collect())
    }
}
