//! # DOM Edit Stack
//!
//! Breadcrumb of field addresses from the outermost entry down to the clicked
//! field. Walking up the `data-cslp` ancestors, an address is only recorded when
//! it crosses into a different entry than the last one recorded, so nested
//! fields of one entry collapse into the innermost of them.

use visual_builder_cslp::{decode, FieldAddress, DATA_CSLP};
use visual_builder_dom::Dom;

/// Closest editable element (inclusive) and its decoded address.
///
/// Malformed CSLP values are treated as absent.
pub fn cs_data_of_element<D: Dom>(dom: &D, node: &D::Node) -> Option<(D::Node, FieldAddress)> {
    let editable = dom.closest_with_attribute(node, DATA_CSLP)?;
    let address = decode(&dom.attribute(&editable, DATA_CSLP)?)?;
    Some((editable, address))
}

/// Outermost entry first, innermost last; empty if nothing is editable.
pub fn get_dom_edit_stack<D: Dom>(dom: &D, node: &D::Node) -> Vec<FieldAddress> {
    let mut stack: Vec<FieldAddress> = Vec::new();
    let mut current = dom.closest_with_attribute(node, DATA_CSLP);

    while let Some(element) = current {
        if let Some(address) = dom.attribute(&element, DATA_CSLP).as_deref().and_then(decode) {
            let same_entry = stack
                .first()
                .is_some_and(|last| last.entry_prefix() == address.entry_prefix());
            if !same_entry {
                stack.insert(0, address);
            }
        }
        current = dom
            .parent(&element)
            .and_then(|parent| dom.closest_with_attribute(&parent, DATA_CSLP));
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_builder_dom::MemoryDom;

    fn cslp(dom: &MemoryDom, parent: visual_builder_dom::NodeId, value: &str) -> visual_builder_dom::NodeId {
        let node = dom.element(parent, "div");
        dom.set_attribute(&node, DATA_CSLP, value);
        node
    }

    #[test]
    fn test_single_element() {
        let dom = MemoryDom::new();
        let title = cslp(&dom, dom.root(), "all_fields.bltentryuid.en-us.title");

        let stack = get_dom_edit_stack(&dom, &title);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].field_path, "title");

        let (editable, address) = cs_data_of_element(&dom, &title).unwrap();
        assert_eq!(editable, title);
        assert_eq!(address.entry_uid, "bltentryuid");
    }

    #[test]
    fn test_same_entry_ancestors_collapse() {
        let dom = MemoryDom::new();
        let page = cslp(&dom, dom.root(), "page.blt1.en-us.sections");
        let section = cslp(&dom, page, "page.blt1.en-us.sections.0");
        let card = cslp(&dom, section, "card.blt2.en-us.title");

        let stack = get_dom_edit_stack(&dom, &card);
        let paths: Vec<_> = stack.iter().map(|a| a.cslp_value.as_str()).collect();
        assert_eq!(paths, vec!["page.blt1.en-us.sections.0", "card.blt2.en-us.title"]);
    }

    #[test]
    fn test_walks_from_non_editable_descendant() {
        let dom = MemoryDom::new();
        let title = cslp(&dom, dom.root(), "page.blt1.en-us.title");
        let span = dom.element(title, "span");

        assert_eq!(get_dom_edit_stack(&dom, &span).len(), 1);
        assert!(get_dom_edit_stack(&dom, &dom.root()).is_empty());
    }

    #[test]
    fn test_malformed_ancestor_is_skipped() {
        let dom = MemoryDom::new();
        let outer = cslp(&dom, dom.root(), "page.blt1.en-us.title");
        let broken = cslp(&dom, outer, "broken");

        assert!(cs_data_of_element(&dom, &broken).is_none());
        assert_eq!(get_dom_edit_stack(&dom, &broken).len(), 1);
    }
}
