//! Tiny toast / notification helper.
//! Creates a `#toast-root` container once per page and appends toast divs that
//! fade-out after a few seconds.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::constants::TOAST_LIFETIME_MS;

#[derive(Debug, Clone, Copy)]
pub enum ToastKind {
    Success,
    Error,
}

pub fn success(msg: &str) {
    show(msg, ToastKind::Success);
}

pub fn error(msg: &str) {
    show(msg, ToastKind::Error);
}

pub fn show(message: &str, kind: ToastKind) {
    if let Err(e) = try_show(message, kind) {
        web_sys::console::error_1(&format!("Toast failed ({}): {:?}", message, e).into());
    }
}

fn try_show(message: &str, kind: ToastKind) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let root = ensure_root(&document)?;

    let toast = document.create_element("div")?;
    toast.set_class_name(match kind {
        ToastKind::Success => "toast toast-success",
        ToastKind::Error => "toast toast-error",
    });
    toast.set_attribute("role", "status")?;
    toast.set_text_content(Some(message));

    // Prepend so newest appears on top.
    root.prepend_with_node_1(&toast)?;

    let toast_clone: HtmlElement = toast.unchecked_into();
    let cb = Closure::once_into_js(move || {
        toast_clone.remove();
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        TOAST_LIFETIME_MS,
    )?;

    ensure_styles(&document)
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id("toast-root") {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id("toast-root");
    root.set_class_name("toast-root");
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("toast-styles").is_some() {
        return Ok(());
    }

    let css = "
.toast-root{position:fixed;top:16px;right:16px;display:flex;flex-direction:column;gap:8px;z-index:9999;font-family:Arial,Helvetica,sans-serif}
.toast{padding:10px 16px;border-radius:4px;color:#fff;box-shadow:0 2px 4px rgba(0,0,0,.1);opacity:0;animation:toast-in .2s forwards}
.toast-success{background:#16a34a}
.toast-error{background:#dc2626}
@keyframes toast-in{to{opacity:1}}
";

    let style = document.create_element("style")?;
    style.set_id("toast-styles");
    style.set_text_content(Some(css));
    match document.query_selector("head")? {
        Some(head) => head.append_child(&style)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&style)?,
    };
    Ok(())
}
