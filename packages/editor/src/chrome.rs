//! # Builder Chrome
//!
//! Elements the builder draws on top of the page: hover outline, focus
//! overlay, the custom cursor and (see [`crate::instance_buttons`]) the
//! add-instance controls. Everything lives under one container appended to
//! the body so unmounting is a single removal.

use crate::geometry::{hover_outline_rect, OverlayPanels};
use crate::{BuilderConfig, CursorState};
use visual_builder_dom::{Dom, Point, Rect};

pub const DATA_CURSOR_STATE: &str = "data-cursor-state";

#[derive(Debug, Clone)]
pub struct Chrome<N> {
    pub container: N,
    pub hover_outline: N,
    pub overlay_wrapper: N,
    pub overlay_panels: Vec<(&'static str, N)>,
    pub cursor: N,
}

fn div<D: Dom>(dom: &D, parent: &D::Node, class: &str) -> Option<D::Node> {
    let node = dom.create_element("div")?;
    dom.set_class_name(&node, class);
    dom.append_child(parent, &node);
    Some(node)
}

impl<N: Clone + PartialEq + std::fmt::Debug> Chrome<N> {
    /// Append the chrome to the document body.
    ///
    /// `None` when there is no body or elements cannot be created.
    pub fn mount<D: Dom<Node = N>>(dom: &D, config: &BuilderConfig) -> Option<Self> {
        let body = dom.body()?;
        let container = div(dom, &body, &config.class("__container"))?;

        let hover_outline = div(
            dom,
            &container,
            &format!(
                "{} {}",
                config.class("__hover-outline"),
                config.class("__hover-outline--hidden")
            ),
        )?;

        let overlay_wrapper = div(dom, &container, &config.class("__overlay__wrapper"))?;
        let mut overlay_panels = Vec::with_capacity(4);
        for side in ["top", "left", "right", "bottom"] {
            let class = format!(
                "{} {}",
                config.class("__overlay"),
                config.class(&format!("__overlay--{side}"))
            );
            overlay_panels.push((side, div(dom, &overlay_wrapper, &class)?));
        }

        let cursor = div(
            dom,
            &container,
            &format!("{} {}", config.class("__cursor"), config.class("__cursor--hidden")),
        )?;
        dom.set_attribute(&cursor, DATA_CURSOR_STATE, CursorState::Hidden.as_str());

        tracing::debug!("Mounted builder chrome");
        Some(Self {
            container,
            hover_outline,
            overlay_wrapper,
            overlay_panels,
            cursor,
        })
    }

    pub fn unmount<D: Dom<Node = N>>(&self, dom: &D) {
        dom.remove(&self.container);
    }

    /// `node` is part of the focus overlay
    pub fn is_overlay<D: Dom<Node = N>>(&self, dom: &D, node: &N) -> bool {
        dom.contains(&self.overlay_wrapper, node)
    }

    /// `node` is any builder-drawn element
    pub fn is_builder_element<D: Dom<Node = N>>(&self, dom: &D, node: &N) -> bool {
        dom.contains(&self.container, node)
    }

    pub fn show_hover_outline<D: Dom<Node = N>>(&self, dom: &D, config: &BuilderConfig, rect: &Rect) {
        let outline = hover_outline_rect(rect, dom.scroll_y());
        dom.set_style(&self.hover_outline, &outline.to_css());
        dom.remove_class(&self.hover_outline, &config.class("__hover-outline--hidden"));
    }

    pub fn hide_hover_outline<D: Dom<Node = N>>(&self, dom: &D, config: &BuilderConfig) {
        dom.add_class(&self.hover_outline, &config.class("__hover-outline--hidden"));
    }

    /// Dim everything except `rect`.
    pub fn show_overlay<D: Dom<Node = N>>(&self, dom: &D, config: &BuilderConfig, rect: &Rect) {
        let (viewport_width, document_height) = dom.document_size();
        let panels = OverlayPanels::around(rect, dom.scroll_y(), viewport_width, document_height);
        for ((side, panel), (panel_side, bounds)) in self.overlay_panels.iter().zip(panels.iter()) {
            debug_assert_eq!(*side, panel_side);
            dom.set_style(panel, &bounds.to_css());
        }
        dom.add_class(&self.overlay_wrapper, &config.class("__overlay--visible"));
    }

    pub fn hide_overlay<D: Dom<Node = N>>(&self, dom: &D, config: &BuilderConfig) {
        dom.remove_class(&self.overlay_wrapper, &config.class("__overlay--visible"));
    }

    /// Switch the cursor glyph and, when given, move it to `pointer`.
    pub fn render_cursor<D: Dom<Node = N>>(
        &self,
        dom: &D,
        config: &BuilderConfig,
        state: CursorState,
        pointer: Option<Point>,
    ) {
        dom.set_attribute(&self.cursor, DATA_CURSOR_STATE, state.as_str());
        let hidden = config.class("__cursor--hidden");
        if state.is_visible() {
            dom.remove_class(&self.cursor, &hidden);
        } else {
            dom.add_class(&self.cursor, &hidden);
        }
        if let Some(pointer) = pointer {
            dom.set_style(&self.cursor, &pointer.to_css());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_builder_dom::MemoryDom;
    use visual_builder_schema::FieldType;

    #[test]
    fn test_mount_and_unmount() {
        let dom = MemoryDom::new();
        let config = BuilderConfig::default();
        let chrome = Chrome::mount(&dom, &config).unwrap();

        assert_eq!(dom.find_by_class("visual-builder__overlay").len(), 4);
        assert!(dom.has_class(&chrome.hover_outline, "visual-builder__hover-outline--hidden"));
        assert!(chrome.is_overlay(&dom, &chrome.overlay_panels[0].1));
        assert!(!chrome.is_overlay(&dom, &chrome.cursor));

        chrome.unmount(&dom);
        assert!(!dom.is_attached(chrome.container));
        assert!(dom.find_by_class("visual-builder__cursor").is_empty());
    }

    #[test]
    fn test_cursor_states() {
        let dom = MemoryDom::new();
        let config = BuilderConfig::default();
        let chrome = Chrome::mount(&dom, &config).unwrap();

        chrome.render_cursor(
            &dom,
            &config,
            CursorState::Field(FieldType::Singleline),
            Some(Point::new(12.0, 30.0)),
        );
        assert_eq!(
            dom.attribute(&chrome.cursor, DATA_CURSOR_STATE).as_deref(),
            Some("singleline")
        );
        assert!(!dom.has_class(&chrome.cursor, "visual-builder__cursor--hidden"));
        assert_eq!(dom.style(chrome.cursor), Point::new(12.0, 30.0).to_css());

        chrome.render_cursor(&dom, &config, CursorState::Hidden, None);
        assert!(dom.has_class(&chrome.cursor, "visual-builder__cursor--hidden"));
    }

    #[test]
    fn test_overlay_toggles() {
        let dom = MemoryDom::new();
        let config = BuilderConfig::default();
        let chrome = Chrome::mount(&dom, &config).unwrap();

        chrome.show_overlay(&dom, &config, &Rect::new(10.0, 10.0, 100.0, 20.0));
        assert!(dom.has_class(&chrome.overlay_wrapper, "visual-builder__overlay--visible"));
        chrome.hide_overlay(&dom, &config);
        assert!(!dom.has_class(&chrome.overlay_wrapper, "visual-builder__overlay--visible"));
    }
}
