//! Browser tests, run with `wasm-pack test --headless --firefox`

use visual_builder_dom::Dom;
use visual_builder_wasm::WebDom;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_web_dom_tree_operations() {
    let dom = WebDom::new().unwrap();
    let body = dom.body().unwrap();
    let list = dom.create_element("ul").unwrap();
    let item = dom.create_element("li").unwrap();
    dom.append_child(&body, &list);
    dom.append_child(&list, &item);

    dom.set_attribute(&list, "data-cslp", "page.blt1.en-us.tags");
    assert_eq!(dom.tag_name(&item), "li");
    assert_eq!(dom.closest_with_attribute(&item, "data-cslp"), Some(list.clone()));
    assert!(dom.contains(&body, &item));

    dom.add_class(&item, "tag");
    assert!(dom.has_class(&item, "tag"));

    dom.remove(&list);
    assert!(!dom.contains(&body, &item));
}

#[wasm_bindgen_test]
fn test_content_editable_is_inherited() {
    let dom = WebDom::new().unwrap();
    let body = dom.body().unwrap();
    let editable = dom.create_element("div").unwrap();
    let child = dom.create_element("span").unwrap();
    dom.append_child(&body, &editable);
    dom.append_child(&editable, &child);

    dom.set_attribute(&editable, "contenteditable", "true");
    assert!(dom.is_content_editable(&child));
    dom.remove(&editable);
}

#[wasm_bindgen_test]
fn test_style_injection() {
    let dom = WebDom::new().unwrap();
    let css = visual_builder_wasm::builder_css("visual-builder");
    let style = dom.inject_style(&css).unwrap();
    assert!(dom.text_content(&style).contains("__hover-outline"));
    dom.remove(&style);
}
