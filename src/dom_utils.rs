//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! Small wrappers for show / hide / disable and element creation so the
//! components don't sprinkle `set_attribute` calls everywhere.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
    let _ = el.class_list().add_1("visible");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().remove_1("visible");
    let _ = el.class_list().add_1("hidden");
}

pub fn set_visible(el: &Element, visible: bool) {
    if visible {
        show(el)
    } else {
        hide(el)
    }
}

/// Toggle the `disabled` attribute on a button or input.
pub fn set_disabled(el: &Element, disabled: bool) -> Result<(), JsValue> {
    if disabled {
        el.set_attribute("disabled", "")
    } else {
        el.remove_attribute("disabled")
    }
}

/// Create `<tag class="…">text</tag>`.
pub fn element(document: &Document, tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

/// Create a `<button type="button">` with a click handler.  The closure is
/// leaked on purpose: it lives as long as the button does.
pub fn button<F>(document: &Document, class: &str, label: &str, on_click: F) -> Result<Element, JsValue>
where
    F: FnMut(web_sys::MouseEvent) + 'static,
{
    let btn = element(document, "button", class, Some(label))?;
    btn.set_attribute("type", "button")?;
    let cb = Closure::wrap(Box::new(on_click) as Box<dyn FnMut(_)>);
    btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(btn)
}

/// Attach a listener to any element, leaking the closure like `button`.
pub fn on<F>(el: &Element, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Current value of the `<input>` that fired `event`.
pub fn event_input_value(event: &web_sys::Event) -> Option<String> {
    event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Checked state of the checkbox that fired `event`.
pub fn event_checked(event: &web_sys::Event) -> Option<bool> {
    event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.checked())
}

/// Set an `<input>`'s value without firing events.
pub fn set_input_value(el: &Element, value: &str) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        if input.value() != value {
            input.set_value(value);
        }
    }
}
