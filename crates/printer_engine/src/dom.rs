//! Thread-safe in-memory element tree with mutation notifications.
//!
//! Every change to a node is broadcast on that node and on all of its ancestors, so a
//! receiver obtained from [`ContentElement::observe`] sees the whole subtree.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};
use tokio::sync::broadcast;

use crate::host::ContentElement;
use crate::types::{MutationKind, MutationRecord};

const EVENT_CAPACITY: usize = 256;
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "col", "wbr"];

#[derive(Clone)]
pub struct MemoryElement {
    node: Arc<Node>,
}

struct Node {
    tag: String,
    state: Mutex<NodeState>,
    parent: Mutex<Weak<Node>>,
    events: broadcast::Sender<MutationRecord>,
}

#[derive(Default)]
struct NodeState {
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<Child>,
}

enum Child {
    Element(Arc<Node>),
    Text(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            node: Arc::new(Node {
                tag: tag.to_ascii_lowercase(),
                state: Mutex::new(NodeState::default()),
                parent: Mutex::new(Weak::new()),
                events,
            }),
        }
    }

    pub fn with_class(tag: &str, class: &str) -> Self {
        let element = Self::new(tag);
        lock(&element.node.state)
            .attributes
            .push(("class".to_string(), class.to_string()));
        element
    }

    pub fn tag(&self) -> &str {
        &self.node.tag
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        lock(&self.node.state)
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        {
            let mut state = lock(&self.node.state);
            match state.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => state
                    .attributes
                    .push((name.to_string(), value.to_string())),
            }
        }
        self.notify(MutationKind::Attributes);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Appends `child`, detaching it from any previous parent first.
    pub fn append_child(&self, child: &MemoryElement) {
        child.detach();
        *lock(&child.node.parent) = Arc::downgrade(&self.node);
        lock(&self.node.state)
            .children
            .push(Child::Element(child.node.clone()));
        self.notify(MutationKind::ChildList);
    }

    pub fn append_text(&self, text: &str) {
        lock(&self.node.state)
            .children
            .push(Child::Text(text.to_string()));
        self.notify(MutationKind::ChildList);
    }

    /// Replaces the content of a single text child, or all children with one text node.
    pub fn set_text(&self, text: &str) {
        let kind = {
            let mut state = lock(&self.node.state);
            match state.children.as_mut_slice() {
                [Child::Text(existing)] => {
                    *existing = text.to_string();
                    MutationKind::CharacterData
                }
                _ => {
                    orphan_all(&mut state.children);
                    state.children.push(Child::Text(text.to_string()));
                    MutationKind::ChildList
                }
            }
        };
        self.notify(kind);
    }

    /// Parses `html` and appends the resulting nodes, one notification per top-level node.
    pub fn append_html(&self, html: &str) {
        for child in parse_fragment(html) {
            match child {
                Parsed::Element(element) => self.append_child(&element),
                Parsed::Text(text) => self.append_text(&text),
            }
        }
    }

    pub fn clear(&self) {
        {
            let mut state = lock(&self.node.state);
            if state.children.is_empty() {
                return;
            }
            orphan_all(&mut state.children);
        }
        self.notify(MutationKind::ChildList);
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        lock(&self.node.state)
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(node) => Some(MemoryElement { node: node.clone() }),
                Child::Text(_) => None,
            })
            .collect()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.node, &mut out);
        out
    }

    /// Depth-first search, self included.
    pub fn find(&self, class: &str) -> Option<MemoryElement> {
        if self.has_class(class) {
            return Some(self.clone());
        }
        self.children().into_iter().find_map(|child| child.find(class))
    }

    fn detach(&self) {
        let parent = lock(&self.node.parent).upgrade();
        if let Some(parent) = parent {
            lock(&parent.state)
                .children
                .retain(|child| !matches!(child, Child::Element(node) if Arc::ptr_eq(node, &self.node)));
            *lock(&self.node.parent) = Weak::new();
            MemoryElement { node: parent }.notify(MutationKind::ChildList);
        }
    }

    fn notify(&self, kind: MutationKind) {
        let record = MutationRecord {
            kind,
            target: self.node.tag.clone(),
        };
        let mut current = Some(self.node.clone());
        while let Some(node) = current {
            // No receivers just means nobody is observing right now.
            let _ = node.events.send(record.clone());
            current = lock(&node.parent).upgrade();
        }
    }
}

impl ContentElement for MemoryElement {
    fn find_by_class(&self, class: &str) -> Option<Arc<dyn ContentElement>> {
        self.find(class)
            .map(|element| Arc::new(element) as Arc<dyn ContentElement>)
    }

    fn observe(&self) -> broadcast::Receiver<MutationRecord> {
        self.node.events.subscribe()
    }

    fn style(&self, property: &str) -> Option<String> {
        lock(&self.node.state)
            .styles
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.clone())
    }

    fn set_style(&self, property: &str, value: Option<&str>) {
        let changed = {
            let mut state = lock(&self.node.state);
            let position = state.styles.iter().position(|(key, _)| key == property);
            match (position, value) {
                (Some(idx), Some(value)) if state.styles[idx].1 == value => false,
                (Some(idx), Some(value)) => {
                    state.styles[idx].1 = value.to_string();
                    true
                }
                (Some(idx), None) => {
                    state.styles.remove(idx);
                    true
                }
                (None, Some(value)) => {
                    state.styles.push((property.to_string(), value.to_string()));
                    true
                }
                (None, None) => false,
            }
        };
        if changed {
            self.notify(MutationKind::Attributes);
        }
    }

    fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize(&self.node, &mut out);
        out
    }
}

fn orphan_all(children: &mut Vec<Child>) {
    for child in children.drain(..) {
        if let Child::Element(node) = child {
            *lock(&node.parent) = Weak::new();
        }
    }
}

fn collect_text(node: &Node, out: &mut String) {
    for child in &lock(&node.state).children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(node) => collect_text(node, out),
        }
    }
}

fn serialize(node: &Node, out: &mut String) {
    let state = lock(&node.state);
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &state.attributes {
        out.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
    }
    if !state.styles.is_empty() {
        let style = state
            .styles
            .iter()
            .map(|(key, value)| format!("{key}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(" style=\"{}\"", escape_attribute(&style)));
    }
    out.push('>');
    if VOID_TAGS.contains(&node.tag.as_str()) {
        return;
    }
    for child in &state.children {
        match child {
            Child::Text(text) => out.push_str(&escape_text(text)),
            Child::Element(child) => serialize(child, out),
        }
    }
    out.push_str(&format!("</{}>", node.tag));
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

enum Parsed {
    Element(MemoryElement),
    Text(String),
}

fn parse_fragment(html: &str) -> Vec<Parsed> {
    let document = Html::parse_fragment(html);
    let mut parsed = Vec::new();
    for child in document.root_element().children() {
        collect_parsed(child, &mut parsed);
    }
    parsed
}

fn collect_parsed(node: NodeRef<'_, HtmlNode>, out: &mut Vec<Parsed>) {
    match node.value() {
        HtmlNode::Text(text) => out.push(Parsed::Text(text.to_string())),
        HtmlNode::Element(element) => {
            let built = MemoryElement::new(element.name());
            {
                let mut state = lock(&built.node.state);
                for (key, value) in element.attrs() {
                    if key == "style" {
                        state.styles.extend(parse_style(value));
                    } else {
                        state.attributes.push((key.to_string(), value.to_string()));
                    }
                }
            }
            let mut children = Vec::new();
            for child in node.children() {
                collect_parsed(child, &mut children);
            }
            // Built silently: the subtree is detached until the caller appends it.
            {
                let mut state = lock(&built.node.state);
                for child in children {
                    match child {
                        Parsed::Element(element) => {
                            *lock(&element.node.parent) = Arc::downgrade(&built.node);
                            state.children.push(Child::Element(element.node));
                        }
                        Parsed::Text(text) => state.children.push(Child::Text(text)),
                    }
                }
            }
            out.push(Parsed::Element(built));
        }
        _ => {
            for child in node.children() {
                collect_parsed(child, out);
            }
        }
    }
}

fn parse_style(style: &str) -> impl Iterator<Item = (String, String)> + '_ {
    style.split(';').filter_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        let key = key.trim();
        let value = value.trim();
        (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
    })
}
