//! # Add-Instance Controls
//!
//! A pair of buttons drawn before and after the selected instance of a
//! multiple field. Only one pair exists at a time.

use crate::context::InteractionContext;
use crate::geometry::{add_instance_button_positions, ChildrenDirection};
use crate::BuilderConfig;
use visual_builder_dom::{Dom, Rect};
use visual_builder_sync::InstancePosition;

pub const DATA_INSTANCE_POSITION: &str = "data-instance-position";

#[derive(Debug, Clone)]
pub struct AddInstanceButtons<N> {
    pub previous: N,
    pub next: N,
    /// CSLP value of the instance the buttons belong to
    pub field_cslp: String,
}

impl<N: Clone + PartialEq + std::fmt::Debug> AddInstanceButtons<N> {
    /// Which button `target` is in, if any
    pub fn position_of<D: Dom<Node = N>>(&self, dom: &D, target: &N) -> Option<InstancePosition> {
        if dom.contains(&self.previous, target) {
            Some(InstancePosition::Previous)
        } else if dom.contains(&self.next, target) {
            Some(InstancePosition::Next)
        } else {
            None
        }
    }
}

fn button<D: Dom>(
    dom: &D,
    config: &BuilderConfig,
    container: &D::Node,
    position: InstancePosition,
) -> Option<D::Node> {
    let side = match position {
        InstancePosition::Previous => "previous",
        InstancePosition::Next => "next",
    };
    let base = config.class("-add-instance-button");
    let node = dom.create_element("button")?;
    dom.set_class_name(&node, &format!("{base} {base}--{side}"));
    dom.set_attribute(&node, DATA_INSTANCE_POSITION, side);
    dom.append_child(container, &node);
    Some(node)
}

/// Replace any existing pair with one around `rect`.
pub fn create_add_instance_buttons<D: Dom>(
    dom: &D,
    config: &BuilderConfig,
    container: &D::Node,
    context: &mut InteractionContext<D::Node>,
    direction: ChildrenDirection,
    rect: &Rect,
    field_cslp: &str,
) {
    remove_add_instance_buttons(dom, config, Some(container), context, None, true);

    let (Some(previous), Some(next)) = (
        button(dom, config, container, InstancePosition::Previous),
        button(dom, config, container, InstancePosition::Next),
    ) else {
        tracing::warn!("Could not create add-instance buttons for {}", field_cslp);
        remove_add_instance_buttons(dom, config, Some(container), context, None, true);
        return;
    };

    let positions = add_instance_button_positions(direction, rect, dom.scroll_y());
    dom.set_style(&previous, &positions.previous.to_css());
    dom.set_style(&next, &positions.next.to_css());

    context.add_instance_buttons = Some(AddInstanceButtons {
        previous,
        next,
        field_cslp: field_cslp.to_string(),
    });
}

/// Take the add-instance buttons down.
///
/// - Without a container there is nothing to do.
/// - `force` removes every button in the container.
/// - Otherwise the pair stays while the focus overlay is up, or while the
///   pointer is over one of the buttons.
pub fn remove_add_instance_buttons<D: Dom>(
    dom: &D,
    config: &BuilderConfig,
    container: Option<&D::Node>,
    context: &mut InteractionContext<D::Node>,
    event_target: Option<&D::Node>,
    force: bool,
) {
    let Some(container) = container else {
        return;
    };

    if force {
        let class = config.class("-add-instance-button");
        for node in dom.descendants(container) {
            if dom.has_class(&node, &class) {
                dom.remove(&node);
            }
        }
        context.add_instance_buttons = None;
        return;
    }

    if context.overlay_visible {
        return;
    }

    let Some(buttons) = context.add_instance_buttons.take() else {
        return;
    };
    if event_target.is_some_and(|target| buttons.position_of(dom, target).is_some()) {
        context.add_instance_buttons = Some(buttons);
        return;
    }
    dom.remove(&buttons.previous);
    dom.remove(&buttons.next);
}
