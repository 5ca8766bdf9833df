//! # In-Memory Document
//!
//! Arena-backed [`Dom`] with just enough layout to answer geometry queries.
//! Elements can be given an explicit viewport rect; elements without one are
//! placed as a zero-size box right after their previous sibling, following the
//! parent's [`Flow`].

use crate::{Dom, Rect};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Direction children without explicit rects are laid out in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Column,
    Row,
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    style: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Option<Rect>,
    flow: Flow,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            style: String::new(),
            parent: None,
            children: Vec::new(),
            rect: None,
            flow: Flow::Column,
        }
    }
}

#[derive(Debug)]
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    body: NodeId,
    scroll_y: RefCell<f64>,
    document_size: RefCell<(f64, f64)>,
    scrolled: RefCell<Vec<NodeId>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeData::new("body")]),
            body: NodeId(0),
            scroll_y: RefCell::new(0.0),
            document_size: RefCell::new((1280.0, 800.0)),
            scrolled: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> NodeId {
        self.body
    }

    /// Create an element and append it to `parent`.
    pub fn element(&self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc(tag);
        self.append_child(&parent, &id);
        id
    }

    pub fn with_attribute(&self, node: NodeId, name: &str, value: &str) -> NodeId {
        self.set_attribute(&node, name, value);
        node
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = Some(rect);
    }

    pub fn set_flow(&self, node: NodeId, flow: Flow) {
        self.nodes.borrow_mut()[node.0].flow = flow;
    }

    pub fn set_scroll_y(&self, scroll_y: f64) {
        *self.scroll_y.borrow_mut() = scroll_y;
    }

    pub fn set_document_size(&self, width: f64, height: f64) {
        *self.document_size.borrow_mut() = (width, height);
    }

    pub fn style(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].style.clone()
    }

    /// Reachable from the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(&self.body, &node)
    }

    /// Attached elements carrying `class`
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(&self.body)
            .into_iter()
            .filter(|n| self.has_class(n, class))
            .collect()
    }

    /// Every node passed to `scroll_into_view`, oldest first
    pub fn scrolled_into_view(&self) -> Vec<NodeId> {
        self.scrolled.borrow().clone()
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData::new(tag));
        NodeId(nodes.len() - 1)
    }

    fn detach(nodes: &mut [NodeData], node: NodeId) {
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        self.nodes.borrow_mut()[node.0].attributes.remove(name);
    }

    fn class_name(&self, node: &NodeId) -> String {
        self.attribute(node, "class").unwrap_or_default()
    }

    fn set_class_name(&self, node: &NodeId, value: &str) {
        self.set_attribute(node, "class", value);
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.nodes.borrow()[node.0].text.clone();
        for child in self.children(node) {
            text.push_str(&self.text_content(&child));
        }
        text
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        let children = {
            let mut nodes = self.nodes.borrow_mut();
            nodes[node.0].text = text.to_string();
            std::mem::take(&mut nodes[node.0].children)
        };
        let mut nodes = self.nodes.borrow_mut();
        for child in children {
            nodes[child.0].parent = None;
        }
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let (explicit, parent) = {
            let nodes = self.nodes.borrow();
            (nodes[node.0].rect, nodes[node.0].parent)
        };
        if let Some(rect) = explicit {
            return rect;
        }
        let Some(parent) = parent else {
            return Rect::default();
        };

        let (previous, flow) = {
            let nodes = self.nodes.borrow();
            let siblings = &nodes[parent.0].children;
            let position = siblings.iter().position(|c| c == node);
            let previous = position.and_then(|p| p.checked_sub(1)).map(|p| siblings[p]);
            (previous, nodes[parent.0].flow)
        };

        match previous {
            Some(previous) => {
                let anchor = self.bounding_rect(&previous);
                match flow {
                    Flow::Row => Rect::new(anchor.right, anchor.top, 0.0, 0.0),
                    Flow::Column => Rect::new(anchor.left, anchor.bottom, 0.0, 0.0),
                }
            }
            None => {
                let anchor = self.bounding_rect(&parent);
                Rect::new(anchor.left, anchor.top, 0.0, 0.0)
            }
        }
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        Some(self.alloc(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, *child);
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
    }

    fn remove(&self, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, *node);
    }

    fn set_style(&self, node: &NodeId, css: &str) {
        self.nodes.borrow_mut()[node.0].style = css.to_string();
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn scroll_y(&self) -> f64 {
        *self.scroll_y.borrow()
    }

    fn document_size(&self) -> (f64, f64) {
        *self.document_size.borrow()
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolled.borrow_mut().push(*node);
    }

    fn is_content_editable(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(candidate) = current {
            match self.attribute(&candidate, "contenteditable").as_deref() {
                Some("false") => return false,
                Some(_) => return true,
                None => current = self.parent(&candidate),
            }
        }
        false
    }
}
