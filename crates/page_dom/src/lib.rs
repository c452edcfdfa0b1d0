//! In-memory document tree that page behaviors read from and write to.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Every node is an element;
//! text content is carried on the element itself. Element ids are fixed at
//! creation so the id index never goes stale.

use std::collections::{BTreeMap, HashMap};

use shared::{
    domain::{NodeId, Rect},
    error::DomError,
};

mod fixture;

pub use fixture::ElementSpec;

pub type Result<T> = std::result::Result<T, DomError>;

pub const ID_ATTR: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    value: String,
    checked: bool,
    disabled: bool,
    text: String,
    layout: Option<Rect>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            text: String::new(),
            layout: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds every whitespace-separated class in `classes`.
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    /// An `id` attribute becomes the element's id.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name == ID_ATTR {
            self.id = Some(value.into());
        } else {
            self.attrs.insert(name, value.into());
        }
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_layout(mut self, layout: Rect) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        if name == ID_ATTR {
            return self.id();
        }
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The id is fixed once the element exists; `id` is ignored here.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name != ID_ATTR {
            self.attrs.insert(name, value.into());
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn is_required(&self) -> bool {
        self.has_attr("required")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_any_class(&self, classes: &[&str]) -> bool {
        classes.iter().any(|class| self.has_class(class))
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Text content. Elements whose markup was replaced wholesale keep that
    /// markup here verbatim.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn layout(&self) -> Option<Rect> {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Option<Rect>) {
        self.layout = layout;
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                element: Element::new("body"),
            }],
            body: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element. Ids are unique across the whole arena.
    pub fn create_element(&mut self, element: Element) -> Result<NodeId> {
        let node_id = NodeId(self.nodes.len());
        if let Some(id) = element.id() {
            if self.id_index.contains_key(id) {
                return Err(DomError::DuplicateId(id.to_string()));
            }
            self.id_index.insert(id.to_string(), node_id);
        }
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            element,
        });
        Ok(node_id)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.contains(child, parent) {
            return Err(DomError::CyclicAppend(child));
        }
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Creates `element` and appends it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> Result<NodeId> {
        self.node(parent)?;
        let child = self.create_element(element)?;
        self.append_child(parent, child)?;
        Ok(child)
    }

    pub fn element(&self, node: NodeId) -> Result<&Element> {
        self.node(node).map(|n| &n.element)
    }

    pub fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.nodes
            .get_mut(node.0)
            .map(|n| &mut n.element)
            .ok_or(DomError::UnknownNode(node))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index
            .get(id)
            .copied()
            .filter(|node| self.is_connected(*node))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    /// Inclusive: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Nearest inclusive ancestor matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            let element = self.element(current).ok()?;
            if pred(element) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn query_all_within(
        &self,
        root: NodeId,
        pred: impl Fn(&Element) -> bool,
    ) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.element(*node).map(&pred).unwrap_or(false))
            .collect()
    }

    pub fn query_within(&self, root: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|node| self.element(*node).map(&pred).unwrap_or(false))
    }

    /// Every connected element matching `pred`, in document order.
    pub fn query_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        let body = self.body;
        let mut out = Vec::new();
        if self.element(body).map(&pred).unwrap_or(false) {
            out.push(body);
        }
        out.extend(self.query_all_within(body, pred));
        out
    }

    pub fn query(&self, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.query_all(pred).into_iter().next()
    }

    fn node(&self, node: NodeId) -> Result<&Node> {
        self.nodes.get(node.0).ok_or(DomError::UnknownNode(node))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
