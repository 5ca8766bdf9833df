//! [`Dom`] over the browser document

use visual_builder_dom::{Dom, Rect};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// `None` outside a browser window
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Append a `<style>` element to the document head.
    pub fn inject_style(&self, css: &str) -> Option<Element> {
        let head = self.document.head()?;
        let style = self.document.create_element("style").ok()?;
        style.set_text_content(Some(css));
        head.append_child(&style).ok()?;
        Some(style)
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(error) = node.set_attribute(name, value) {
            tracing::warn!("Failed to set {} attribute: {:?}", name, error);
        }
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        if let Err(error) = node.remove_attribute(name) {
            tracing::warn!("Failed to remove {} attribute: {:?}", name, error);
        }
    }

    fn class_name(&self, node: &Element) -> String {
        node.class_name()
    }

    fn set_class_name(&self, node: &Element, value: &str) {
        node.set_class_name(value);
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::from_bounds(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        if let Err(error) = parent.append_child(child) {
            tracing::warn!("Failed to append <{}>: {:?}", child.tag_name(), error);
        }
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn set_style(&self, node: &Element, css: &str) {
        self.set_attribute(node, "style", css);
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn document_size(&self) -> (f64, f64) {
        self.document
            .document_element()
            .map_or((0.0, 0.0), |root| {
                (root.client_width() as f64, root.scroll_height() as f64)
            })
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn is_content_editable(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlElement>()
            .is_some_and(|element| element.is_content_editable())
    }
}
