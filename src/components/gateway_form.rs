//! DOM for the gateway settings screen: a blocking error panel with retry,
//! or the form with its read-only connection URLs.

use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::components::{spawn_intent, Screen};
use crate::dom_utils::{self, button, element, on};
use crate::pages::GatewaySettingsPage;
use crate::views::{GatewayFormView, SettingsScreen};

impl Screen for GatewaySettingsPage {
    const NAME: &'static str = "gateway settings";

    fn render(document: &Document, page: &Rc<Self>) -> Result<(), JsValue> {
        render(document, page)
    }

    fn is_attached(&self) -> bool {
        self.attached()
    }
}

pub fn mount(document: &Document, root: &Element, page: Rc<GatewaySettingsPage>) -> Result<(), JsValue> {
    root.set_inner_html("");
    root.set_class_name("gateway-settings");
    root.append_child(element(document, "h2", "", Some("Gateway"))?.as_ref())?;

    let loading = element(document, "div", "loading-indicator", Some("Loading gateway settings…"))?;
    loading.set_id("gateway-loading");
    root.append_child(&loading)?;

    root.append_child(create_error_panel(document, page.clone())?.as_ref())?;
    root.append_child(create_form(document, page.clone())?.as_ref())?;

    render(document, &page)
}

fn create_error_panel(document: &Document, page: Rc<GatewaySettingsPage>) -> Result<Element, JsValue> {
    let panel = element(document, "div", "error-panel hidden", None)?;
    panel.set_id("gateway-error-panel");

    let message = element(document, "p", "error-message", None)?;
    message.set_id("gateway-error-message");
    panel.append_child(&message)?;

    let doc = document.clone();
    let retry = button(document, "btn btn-primary", "Retry", move |_| {
        spawn_intent(doc.clone(), page.clone(), |p| async move { p.retry().await });
    })?;
    retry.set_id("gateway-retry");
    panel.append_child(&retry)?;
    Ok(panel)
}

fn labelled_input(
    document: &Document,
    id: &str,
    label: &str,
    input_type: &str,
) -> Result<(Element, Element), JsValue> {
    let row = element(document, "div", "form-row", None)?;
    let lbl = element(document, "label", "", Some(label))?;
    lbl.set_attribute("for", id)?;
    row.append_child(&lbl)?;

    let input = document.create_element("input")?;
    input.set_id(id);
    input.set_attribute("type", input_type)?;
    row.append_child(&input)?;

    let error = element(document, "div", "field-error", None)?;
    error.set_id(&format!("{}-error", id));
    row.append_child(&error)?;
    Ok((row, input))
}

fn readonly_row(document: &Document, id: &str, label: &str) -> Result<Element, JsValue> {
    let row = element(document, "div", "form-row readonly", None)?;
    row.append_child(element(document, "label", "", Some(label))?.as_ref())?;
    let value = element(document, "code", "", None)?;
    value.set_id(id);
    row.append_child(&value)?;
    Ok(row)
}

fn create_form(document: &Document, page: Rc<GatewaySettingsPage>) -> Result<Element, JsValue> {
    let form = element(document, "div", "settings-form hidden", None)?;
    form.set_id("gateway-form");

    let (domain_row, domain) = labelled_input(document, "gateway-domain", "Domain", "text")?;
    {
        let page = page.clone();
        on(&domain, "input", move |event| {
            page.set_domain(&dom_utils::event_input_value(&event).unwrap_or_default());
        })?;
    }
    form.append_child(&domain_row)?;

    let (port_row, port) = labelled_input(document, "gateway-port", "Port", "number")?;
    port.set_attribute("min", "1")?;
    port.set_attribute("max", "65535")?;
    {
        let page = page.clone();
        on(&port, "input", move |event| {
            page.set_port(&dom_utils::event_input_value(&event).unwrap_or_default());
        })?;
    }
    form.append_child(&port_row)?;

    let (enabled_row, enabled) = labelled_input(document, "gateway-enabled", "Enabled", "checkbox")?;
    {
        let page = page.clone();
        on(&enabled, "change", move |event| {
            page.set_enabled(dom_utils::event_checked(&event).unwrap_or(false));
        })?;
    }
    form.append_child(&enabled_row)?;

    form.append_child(readonly_row(document, "gateway-ws-url", "WebSocket URL")?.as_ref())?;
    form.append_child(readonly_row(document, "gateway-http-url", "HTTP URL")?.as_ref())?;
    form.append_child(readonly_row(document, "gateway-updated-at", "Last updated")?.as_ref())?;

    let banner = element(document, "div", "form-error hidden", None)?;
    banner.set_id("gateway-save-error");
    form.append_child(&banner)?;

    let actions = element(document, "div", "form-buttons", None)?;
    let reload = {
        let page = page.clone();
        let doc = document.clone();
        button(document, "btn", "Reload", move |_| {
            spawn_intent(doc.clone(), page.clone(), |p| async move { p.reload().await });
        })?
    };
    reload.set_id("gateway-reload");
    actions.append_child(&reload)?;

    let doc = document.clone();
    let submit = button(document, "btn btn-primary", "Save", move |_| {
        spawn_intent(doc.clone(), page.clone(), |p| async move { p.submit().await });
    })?;
    submit.set_id("gateway-submit");
    actions.append_child(&submit)?;
    form.append_child(&actions)?;

    Ok(form)
}

pub fn render(document: &Document, page: &Rc<GatewaySettingsPage>) -> Result<(), JsValue> {
    let by_id = |id: &str| document.get_element_by_id(id);
    let screen = page.screen();

    if let Some(el) = by_id("gateway-loading") {
        dom_utils::set_visible(&el, screen == SettingsScreen::Loading);
    }
    if let Some(panel) = by_id("gateway-error-panel") {
        match &screen {
            SettingsScreen::LoadError { message } => {
                if let Some(msg) = by_id("gateway-error-message") {
                    msg.set_text_content(Some(message));
                }
                dom_utils::show(&panel);
            }
            _ => dom_utils::hide(&panel),
        }
    }
    if let Some(form) = by_id("gateway-form") {
        match &screen {
            SettingsScreen::Form(view) => {
                render_form(document, view)?;
                dom_utils::show(&form);
            }
            _ => dom_utils::hide(&form),
        }
    }
    Ok(())
}

fn render_form(document: &Document, view: &GatewayFormView) -> Result<(), JsValue> {
    let by_id = |id: &str| document.get_element_by_id(id);

    if let Some(el) = by_id("gateway-domain") {
        dom_utils::set_input_value(&el, &view.draft.domain);
        dom_utils::set_disabled(&el, !view.inputs_enabled)?;
    }
    if let Some(el) = by_id("gateway-port") {
        dom_utils::set_input_value(&el, &view.draft.port);
        dom_utils::set_disabled(&el, !view.inputs_enabled)?;
    }
    if let Some(el) = by_id("gateway-enabled") {
        if let Some(input) = wasm_bindgen::JsCast::dyn_ref::<web_sys::HtmlInputElement>(&el) {
            input.set_checked(view.draft.enabled);
        }
        dom_utils::set_disabled(&el, !view.inputs_enabled)?;
    }
    for field in ["domain", "port"] {
        if let Some(el) = by_id(&format!("gateway-{}-error", field)) {
            el.set_text_content(view.field_errors.get(field).map(String::as_str));
        }
    }

    if let Some(el) = by_id("gateway-ws-url") {
        el.set_text_content(Some(&view.web_socket_url));
    }
    if let Some(el) = by_id("gateway-http-url") {
        el.set_text_content(Some(&view.http_url));
    }
    if let Some(el) = by_id("gateway-updated-at") {
        el.set_text_content(Some(&view.updated_at));
    }

    if let Some(form) = by_id("gateway-form") {
        form.class_list().toggle_with_force("dirty", view.dirty)?;
    }
    if let Some(el) = by_id("gateway-save-error") {
        el.set_text_content(view.error.as_deref());
        dom_utils::set_visible(&el, view.error.is_some());
    }
    if let Some(el) = by_id("gateway-submit") {
        dom_utils::set_disabled(&el, !view.submit_enabled)?;
        el.set_text_content(Some(if view.saving { "Saving…" } else { "Save" }));
    }
    if let Some(el) = by_id("gateway-reload") {
        dom_utils::set_disabled(&el, !view.reload_enabled)?;
    }
    Ok(())
}
