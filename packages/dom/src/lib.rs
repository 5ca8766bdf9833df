//! # DOM Boundary
//!
//! The builder never talks to a browser directly. Everything it needs from the
//! page goes through [`Dom`], which the wasm crate implements over web-sys and
//! [`MemoryDom`] implements in process for tests and headless use.

mod memory;
mod rect;

pub use memory::{Flow, MemoryDom, NodeId};
pub use rect::{Point, Rect};

/// Minimal document surface the builder reads and mutates.
///
/// Handles are cheap to clone and compare by identity.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn class_name(&self, node: &Self::Node) -> String;
    fn set_class_name(&self, node: &Self::Node, value: &str);

    fn text_content(&self, node: &Self::Node) -> String;
    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Viewport-relative box, like `getBoundingClientRect()`
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Detach from the document
    fn remove(&self, node: &Self::Node);

    /// Replace the inline style
    fn set_style(&self, node: &Self::Node, css: &str);

    fn body(&self) -> Option<Self::Node>;
    fn scroll_y(&self) -> f64;

    /// Viewport width and document height
    fn document_size(&self) -> (f64, f64);

    /// Smooth, vertically centered
    fn scroll_into_view(&self, node: &Self::Node);

    fn is_content_editable(&self, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.class_name(node)
            .split_whitespace()
            .any(|c| c == class)
    }

    fn add_class(&self, node: &Self::Node, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let current = self.class_name(node);
        let next = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim(), class)
        };
        self.set_class_name(node, &next);
    }

    fn remove_class(&self, node: &Self::Node, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let next = self
            .class_name(node)
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_class_name(node, &next);
    }

    /// `ancestor` is `node` or one of its ancestors
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if &candidate == ancestor {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    /// Nearest inclusive ancestor matching `predicate`
    fn closest<F>(&self, node: &Self::Node, mut predicate: F) -> Option<Self::Node>
    where
        F: FnMut(&Self::Node) -> bool,
    {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if predicate(&candidate) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    fn closest_with_attribute(&self, node: &Self::Node, name: &str) -> Option<Self::Node> {
        self.closest(node, |n| self.attribute(n, name).is_some())
    }

    /// Descendants of `root` in document order, excluding `root`
    fn descendants(&self, root: &Self::Node) -> Vec<Self::Node> {
        let mut result = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(self.children(&node).into_iter().rev());
            result.push(node);
        }
        result
    }

    /// First element in the document whose `name` attribute equals `value`
    fn query_by_attribute(&self, name: &str, value: &str) -> Option<Self::Node> {
        let body = self.body()?;
        if self.attribute(&body, name).as_deref() == Some(value) {
            return Some(body);
        }
        self.descendants(&body)
            .into_iter()
            .find(|n| self.attribute(n, name).as_deref() == Some(value))
    }
}
