//! # Multi-Instance Geometry
//!
//! Layout direction of a multiple field's instances and the positions of the
//! controls drawn around them.
//!
//! Direction resolution:
//! 1. no parent element with the parent CSLP value → `None`
//! 2. explicit `data-add-direction` on the parent wins
//! 3. compare the first two instance children; with only one, a hidden
//!    zero-size clone is appended next to it for the measurement
//! 4. `|Δleft| > |Δtop|` → horizontal, otherwise vertical

use serde::{Deserialize, Serialize};
use visual_builder_cslp::DATA_CSLP;
use visual_builder_dom::{Dom, Point, Rect};

pub const DATA_ADD_DIRECTION: &str = "data-add-direction";

const MEASUREMENT_CLONE_STYLE: &str = "overflow: hidden !important; width: 0 !important; \
     height: 0 !important; padding: 0 !important; border: 0 !important;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildrenDirection {
    None,
    Horizontal,
    Vertical,
}

impl ChildrenDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildrenDirection::None => "none",
            ChildrenDirection::Horizontal => "horizontal",
            ChildrenDirection::Vertical => "vertical",
        }
    }

    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(ChildrenDirection::Horizontal),
            "vertical" => Some(ChildrenDirection::Vertical),
            _ => None,
        }
    }
}

/// Detaches the wrapped node when dropped.
struct DetachOnDrop<'a, D: Dom> {
    dom: &'a D,
    node: D::Node,
}

impl<D: Dom> Drop for DetachOnDrop<'_, D> {
    fn drop(&mut self) {
        self.dom.remove(&self.node);
    }
}

pub fn get_children_direction<D: Dom>(
    dom: &D,
    editable: &D::Node,
    parent_cslp_value: &str,
) -> ChildrenDirection {
    let Some(parent) = dom.closest(editable, |n| {
        dom.attribute(n, DATA_CSLP).as_deref() == Some(parent_cslp_value)
    }) else {
        return ChildrenDirection::None;
    };

    if let Some(direction) = dom
        .attribute(&parent, DATA_ADD_DIRECTION)
        .as_deref()
        .and_then(ChildrenDirection::from_attribute)
    {
        return direction;
    }

    let instance_prefix = format!("{parent_cslp_value}.");
    let mut instances = dom.descendants(&parent).into_iter().filter(|n| {
        dom.attribute(n, DATA_CSLP)
            .as_deref()
            .and_then(|value| value.strip_prefix(instance_prefix.as_str()))
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
    });

    let Some(first) = instances.next() else {
        return ChildrenDirection::None;
    };

    let (first_rect, second_rect) = match instances.next() {
        Some(second) => (dom.bounding_rect(&first), dom.bounding_rect(&second)),
        None => {
            let Some(clone) = measurement_clone(dom, &first) else {
                return ChildrenDirection::None;
            };
            let first_rect = dom.bounding_rect(&first);
            let clone_rect = dom.bounding_rect(&clone.node);
            (first_rect, clone_rect)
        }
    };

    direction_between(&first_rect, &second_rect)
}

fn measurement_clone<'a, D: Dom>(dom: &'a D, instance: &D::Node) -> Option<DetachOnDrop<'a, D>> {
    let container = dom.parent(instance)?;
    let node = dom.create_element(&dom.tag_name(instance))?;
    dom.set_class_name(&node, &dom.class_name(instance));
    dom.set_style(&node, MEASUREMENT_CLONE_STYLE);
    dom.append_child(&container, &node);
    Some(DetachOnDrop { dom, node })
}

/// Ties resolve to vertical.
pub fn direction_between(first: &Rect, second: &Rect) -> ChildrenDirection {
    let horizontal = (first.left - second.left).abs();
    let vertical = (first.top - second.top).abs();
    if horizontal > vertical {
        ChildrenDirection::Horizontal
    } else {
        ChildrenDirection::Vertical
    }
}

/// Page positions of the previous/next add-instance controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddInstancePositions {
    pub previous: Point,
    pub next: Point,
}

/// Controls sit on the two edges along the list axis, centered on the other.
pub fn add_instance_button_positions(
    direction: ChildrenDirection,
    rect: &Rect,
    scroll_y: f64,
) -> AddInstancePositions {
    match direction {
        ChildrenDirection::Horizontal => {
            let y = rect.top + rect.height() / 2.0 + scroll_y;
            AddInstancePositions {
                previous: Point::new(rect.left, y),
                next: Point::new(rect.right, y),
            }
        }
        ChildrenDirection::Vertical | ChildrenDirection::None => {
            let x = rect.left + rect.width() / 2.0;
            AddInstancePositions {
                previous: Point::new(x, rect.top + scroll_y),
                next: Point::new(x, rect.bottom + scroll_y),
            }
        }
    }
}

/// Hover outline box in page coordinates
pub fn hover_outline_rect(rect: &Rect, scroll_y: f64) -> Rect {
    rect.translate(0.0, scroll_y)
}

/// Four panels dimming everything but the focused element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPanels {
    pub top: Rect,
    pub left: Rect,
    pub right: Rect,
    pub bottom: Rect,
}

impl OverlayPanels {
    pub fn around(rect: &Rect, scroll_y: f64, viewport_width: f64, document_height: f64) -> Self {
        let top_edge = rect.top + scroll_y;
        let bottom_edge = rect.bottom + scroll_y;
        Self {
            top: Rect::from_bounds(0.0, 0.0, viewport_width, top_edge),
            left: Rect::from_bounds(0.0, top_edge, rect.left, bottom_edge),
            right: Rect::from_bounds(rect.right, top_edge, viewport_width, bottom_edge),
            bottom: Rect::from_bounds(0.0, bottom_edge, viewport_width, document_height.max(bottom_edge)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Rect)> {
        [
            ("top", &self.top),
            ("left", &self.left),
            ("right", &self.right),
            ("bottom", &self.bottom),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_builder_dom::{Flow, MemoryDom, NodeId};

    fn list(dom: &MemoryDom, flow: Flow) -> NodeId {
        let parent = dom.element(dom.root(), "ul");
        dom.set_attribute(&parent, DATA_CSLP, "page.blt1.en-us.tags");
        dom.set_flow(parent, flow);
        dom.set_rect(parent, Rect::new(0.0, 0.0, 500.0, 100.0));
        parent
    }

    fn instance(dom: &MemoryDom, parent: NodeId, index: usize, rect: Option<Rect>) -> NodeId {
        let node = dom.element(parent, "li");
        dom.set_attribute(&node, DATA_CSLP, &format!("page.blt1.en-us.tags.{index}"));
        dom.set_class_name(&node, "tag");
        if let Some(rect) = rect {
            dom.set_rect(node, rect);
        }
        node
    }

    #[test]
    fn test_direction_from_sibling_rects() {
        let dom = MemoryDom::new();
        let parent = list(&dom, Flow::Row);
        let first = instance(&dom, parent, 0, Some(Rect::new(0.0, 0.0, 50.0, 20.0)));
        instance(&dom, parent, 1, Some(Rect::new(60.0, 2.0, 50.0, 20.0)));

        assert_eq!(
            get_children_direction(&dom, &first, "page.blt1.en-us.tags"),
            ChildrenDirection::Horizontal
        );
    }

    #[test]
    fn test_ties_are_vertical() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(direction_between(&a, &b), ChildrenDirection::Vertical);
    }

    #[test]
    fn test_explicit_direction_wins() {
        let dom = MemoryDom::new();
        let parent = list(&dom, Flow::Row);
        dom.set_attribute(&parent, DATA_ADD_DIRECTION, "vertical");
        let first = instance(&dom, parent, 0, Some(Rect::new(0.0, 0.0, 50.0, 20.0)));
        instance(&dom, parent, 1, Some(Rect::new(60.0, 0.0, 50.0, 20.0)));

        assert_eq!(
            get_children_direction(&dom, &first, "page.blt1.en-us.tags"),
            ChildrenDirection::Vertical
        );
    }

    #[test]
    fn test_unknown_explicit_direction_falls_back_to_geometry() {
        let dom = MemoryDom::new();
        let parent = list(&dom, Flow::Row);
        dom.set_attribute(&parent, DATA_ADD_DIRECTION, "diagonal");
        let first = instance(&dom, parent, 0, Some(Rect::new(0.0, 0.0, 50.0, 20.0)));
        instance(&dom, parent, 1, Some(Rect::new(60.0, 0.0, 50.0, 20.0)));

        assert_eq!(
            get_children_direction(&dom, &first, "page.blt1.en-us.tags"),
            ChildrenDirection::Horizontal
        );
    }

    #[test]
    fn test_single_instance_uses_clone_and_cleans_up() {
        let dom = MemoryDom::new();
        let parent = list(&dom, Flow::Row);
        let only = instance(&dom, parent, 0, Some(Rect::new(0.0, 0.0, 50.0, 20.0)));

        assert_eq!(
            get_children_direction(&dom, &only, "page.blt1.en-us.tags"),
            ChildrenDirection::Horizontal
        );
        assert_eq!(dom.children(&parent), vec![only]);

        dom.set_flow(parent, Flow::Column);
        assert_eq!(
            get_children_direction(&dom, &only, "page.blt1.en-us.tags"),
            ChildrenDirection::Vertical
        );
        assert_eq!(dom.children(&parent), vec![only]);
        assert_eq!(dom.find_by_class("tag"), vec![only]);
    }

    #[test]
    fn test_nested_fields_are_not_instances() {
        let dom = MemoryDom::new();
        let parent = list(&dom, Flow::Row);
        let nested = dom.element(parent, "span");
        dom.set_attribute(&nested, DATA_CSLP, "page.blt1.en-us.tags.0.label");

        assert_eq!(
            get_children_direction(&dom, &nested, "page.blt1.en-us.tags"),
            ChildrenDirection::None
        );
    }

    #[test]
    fn test_missing_parent() {
        let dom = MemoryDom::new();
        let orphan = dom.element(dom.root(), "div");
        assert_eq!(
            get_children_direction(&dom, &orphan, "page.blt1.en-us.tags"),
            ChildrenDirection::None
        );
    }

    #[test]
    fn test_button_positions() {
        let rect = Rect::new(100.0, 50.0, 200.0, 40.0);

        let horizontal = add_instance_button_positions(ChildrenDirection::Horizontal, &rect, 10.0);
        assert_eq!(horizontal.previous, Point::new(100.0, 80.0));
        assert_eq!(horizontal.next, Point::new(300.0, 80.0));

        let vertical = add_instance_button_positions(ChildrenDirection::Vertical, &rect, 10.0);
        assert_eq!(vertical.previous, Point::new(200.0, 60.0));
        assert_eq!(vertical.next, Point::new(200.0, 100.0));
    }

    #[test]
    fn test_overlay_panels_leave_target_uncovered() {
        let rect = Rect::new(100.0, 50.0, 200.0, 40.0);
        let panels = OverlayPanels::around(&rect, 20.0, 1000.0, 3000.0);

        assert_eq!(panels.top, Rect::from_bounds(0.0, 0.0, 1000.0, 70.0));
        assert_eq!(panels.left, Rect::from_bounds(0.0, 70.0, 100.0, 110.0));
        assert_eq!(panels.right, Rect::from_bounds(300.0, 70.0, 1000.0, 110.0));
        assert_eq!(panels.bottom, Rect::from_bounds(0.0, 110.0, 1000.0, 3000.0));
    }
}
