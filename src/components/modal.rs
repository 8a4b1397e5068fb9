//! Shared modal helper used by the create-flow dialog and delete confirmation.
//!
//! Keeps creation / show / hide logic in one place so feature modals don’t
//! duplicate the same boilerplate.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::dom_utils;

/// Ensure a `<div id="{id}" class="modal">…` exists in the DOM and return it.
/// The returned element is the **backdrop** container.  A child `<div
/// class="modal-content">` is created (and returned) if missing so callers
/// can append their specific inner markup.
///
/// Returns `(backdrop, content)`.
pub fn ensure_modal(document: &Document, id: &str) -> Result<(Element, Element), JsValue> {
    let backdrop = if let Some(el) = document.get_element_by_id(id) {
        el
    } else {
        let el = document.create_element("div")?;
        el.set_id(id);
        el.set_class_name("modal");
        el.set_attribute("role", "dialog")?;
        dom_utils::hide(&el);
        document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&el)?;
        el
    };

    let content = if let Some(el) = backdrop.query_selector(".modal-content")? {
        el
    } else {
        let el = document.create_element("div")?;
        el.set_class_name("modal-content");
        backdrop.append_child(&el)?;
        el
    };

    Ok((backdrop, content))
}

/// Show or hide the backdrop.
pub fn set_open(modal_backdrop: &Element, open: bool) {
    dom_utils::set_visible(modal_backdrop, open);
}

/// Drop the modal from the DOM entirely (on page unmount).
pub fn remove(document: &Document, id: &str) -> Result<(), JsValue> {
    if let Some(el) = document.get_element_by_id(id) {
        el.remove();
    }
    Ok(())
}
