//! DOM for the flow list: toolbar, table, pager, create dialog and delete
//! confirmation.  Rendering is a pure function of `FlowListPage::view()`;
//! every listener forwards to the page and re-renders when it settles.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlSelectElement};

use crate::components::{modal, render_or_log, spawn_intent, Screen};
use crate::constants::{CONFIRM_MODAL_ID, CREATE_FLOW_MODAL_ID, PAGE_SIZE_OPTIONS};
use crate::dom_utils::{self, button, element, on};
use crate::pages::FlowListPage;
use crate::routes::BrowserNavigator;
use crate::views::{FlowRow, PaginationView};

type ListPage = FlowListPage<BrowserNavigator>;

impl Screen for ListPage {
    const NAME: &'static str = "flow list";

    fn render(document: &Document, page: &Rc<Self>) -> Result<(), JsValue> {
        render(document, page)
    }

    fn is_attached(&self) -> bool {
        self.attached()
    }
}

// ---------------------------------------------------------------------------
// Skeleton
// ---------------------------------------------------------------------------

pub fn mount(document: &Document, root: &Element, page: Rc<ListPage>, debounce_ms: u32) -> Result<(), JsValue> {
    root.set_inner_html("");
    root.set_class_name("flow-list");

    root.append_child(create_toolbar(document, page.clone(), debounce_ms)?.as_ref())?;

    let loading = element(document, "div", "loading-indicator hidden", Some("Loading…"))?;
    loading.set_id("flow-loading");
    root.append_child(&loading)?;

    root.append_child(create_table(document)?.as_ref())?;
    root.append_child(create_pager(document, page.clone())?.as_ref())?;

    create_flow_modal(document, page.clone())?;
    create_confirm_modal(document, page.clone())?;

    render(document, &page)
}

fn create_toolbar(document: &Document, page: Rc<ListPage>, debounce_ms: u32) -> Result<Element, JsValue> {
    let toolbar = element(document, "div", "flow-toolbar", None)?;
    toolbar.append_child(element(document, "h2", "", Some("Flows"))?.as_ref())?;

    let search = document.create_element("input")?;
    search.set_id("flow-search");
    search.set_attribute("type", "search")?;
    search.set_attribute("placeholder", "Search flows")?;

    // Typing updates the pending text at once and fetches after a pause;
    // Enter fetches immediately.
    {
        let page = page.clone();
        let document = document.clone();
        on(&search, "input", move |event| {
            let text = dom_utils::event_input_value(&event).unwrap_or_default();
            page.on_search_input(&text);
            let submit = {
                let page = page.clone();
                let document = document.clone();
                move || spawn_intent(document, page, |p| async move { p.on_search_submit().await })
            };
            page.search_timer().schedule(debounce_ms, submit);
        })?;
    }
    {
        let page = page.clone();
        let document = document.clone();
        on(&search, "keydown", move |event| {
            let is_enter = event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .map_or(false, |k| k.key() == "Enter");
            if is_enter {
                event.prevent_default();
                page.search_timer().cancel();
                spawn_intent(document.clone(), page.clone(), |p| async move {
                    p.on_search_submit().await
                });
            }
        })?;
    }
    toolbar.append_child(&search)?;

    let delete_selected = {
        let page = page.clone();
        let doc = document.clone();
        button(document, "btn btn-danger", "Delete selected", move |_| {
            spawn_intent(doc.clone(), page.clone(), |p| async move { p.delete_selected().await });
        })?
    };
    delete_selected.set_id("flow-delete-selected");
    toolbar.append_child(&delete_selected)?;

    let clear_selection = {
        let page = page.clone();
        let doc = document.clone();
        button(document, "btn", "Clear selection", move |_| {
            page.clear_selection();
            render_or_log(&doc, &page);
        })?
    };
    clear_selection.set_id("flow-clear-selection");
    toolbar.append_child(&clear_selection)?;

    let create = {
        let doc = document.clone();
        button(document, "btn btn-primary", "+ New flow", move |_| {
            page.open_create();
            render_or_log(&doc, &page);
        })?
    };
    create.set_id("flow-create-open");
    toolbar.append_child(&create)?;

    Ok(toolbar)
}

fn create_table(document: &Document) -> Result<Element, JsValue> {
    let table = element(document, "table", "flows-table", None)?;
    table.set_id("flow-table");

    let thead = document.create_element("thead")?;
    let header_row = document.create_element("tr")?;
    for column in ["", "Name", "Latest version", "Published", "Updated", "Actions"] {
        header_row.append_child(element(document, "th", "", Some(column))?.as_ref())?;
    }
    thead.append_child(&header_row)?;
    table.append_child(&thead)?;

    let tbody = document.create_element("tbody")?;
    tbody.set_id("flow-table-body");
    table.append_child(&tbody)?;
    Ok(table)
}

fn create_pager(document: &Document, page: Rc<ListPage>) -> Result<Element, JsValue> {
    let pager = element(document, "div", "pager", None)?;
    pager.set_id("flow-pager");

    let prev = {
        let page = page.clone();
        let doc = document.clone();
        button(document, "btn pager-prev", "‹", move |_| {
            let target = page.view().pagination.display_page.saturating_sub(1).max(1);
            spawn_intent(doc.clone(), page.clone(), move |p| async move { p.on_page_change(target).await });
        })?
    };
    prev.set_id("flow-pager-prev");
    pager.append_child(&prev)?;

    let label = element(document, "span", "pager-label", None)?;
    label.set_id("flow-pager-label");
    pager.append_child(&label)?;

    let next = {
        let page = page.clone();
        let doc = document.clone();
        button(document, "btn pager-next", "›", move |_| {
            let target = page.view().pagination.display_page + 1;
            spawn_intent(doc.clone(), page.clone(), move |p| async move { p.on_page_change(target).await });
        })?
    };
    next.set_id("flow-pager-next");
    pager.append_child(&next)?;

    let select = document.create_element("select")?;
    select.set_id("flow-page-size");
    for size in PAGE_SIZE_OPTIONS {
        let option = element(document, "option", "", Some(&format!("{} / page", size)))?;
        option.set_attribute("value", &size.to_string())?;
        select.append_child(&option)?;
    }
    {
        let doc = document.clone();
        on(&select, "change", move |event| {
            let size = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                .and_then(|s| s.value().parse::<u32>().ok());
            if let Some(size) = size {
                spawn_intent(doc.clone(), page.clone(), move |p| async move {
                    p.on_page_size_change(size).await
                });
            }
        })?;
    }
    pager.append_child(&select)?;

    Ok(pager)
}

fn create_flow_modal(document: &Document, page: Rc<ListPage>) -> Result<(), JsValue> {
    let (_backdrop, content) = modal::ensure_modal(document, CREATE_FLOW_MODAL_ID)?;
    content.set_inner_html("");
    content.append_child(element(document, "h3", "", Some("New flow"))?.as_ref())?;

    let name = document.create_element("input")?;
    name.set_id("create-flow-name");
    name.set_attribute("placeholder", "Name")?;
    {
        let page = page.clone();
        on(&name, "input", move |event| {
            page.set_create_name(&dom_utils::event_input_value(&event).unwrap_or_default());
        })?;
    }
    content.append_child(&name)?;

    let name_error = element(document, "div", "field-error", None)?;
    name_error.set_id("create-flow-name-error");
    content.append_child(&name_error)?;

    let description = document.create_element("input")?;
    description.set_id("create-flow-description");
    description.set_attribute("placeholder", "Description (optional)")?;
    {
        let page = page.clone();
        on(&description, "input", move |event| {
            page.set_create_description(&dom_utils::event_input_value(&event).unwrap_or_default());
        })?;
    }
    content.append_child(&description)?;

    let actions = element(document, "div", "modal-buttons", None)?;
    {
        let page = page.clone();
        let doc = document.clone();
        actions.append_child(button(document, "btn", "Cancel", move |_| {
            page.close_create();
            render_or_log(&doc, &page);
        })?.as_ref())?;
    }
    let submit = {
        let doc = document.clone();
        button(document, "btn btn-primary", "Create", move |_| {
            spawn_intent(doc.clone(), page.clone(), |p| async move { p.submit_create().await });
        })?
    };
    submit.set_id("create-flow-submit");
    actions.append_child(&submit)?;
    content.append_child(&actions)?;
    Ok(())
}

fn create_confirm_modal(document: &Document, page: Rc<ListPage>) -> Result<(), JsValue> {
    let (_backdrop, content) = modal::ensure_modal(document, CONFIRM_MODAL_ID)?;
    content.set_inner_html("");

    let text = element(document, "p", "", None)?;
    text.set_id("confirm-modal-text");
    content.append_child(&text)?;

    let actions = element(document, "div", "modal-buttons", None)?;
    {
        let page = page.clone();
        let doc = document.clone();
        actions.append_child(button(document, "btn", "Cancel", move |_| {
            page.cancel_delete();
            render_or_log(&doc, &page);
        })?.as_ref())?;
    }
    let confirm = {
        let doc = document.clone();
        button(document, "btn btn-danger", "Delete", move |_| {
            spawn_intent(doc.clone(), page.clone(), |p| async move { p.confirm_delete().await });
        })?
    };
    confirm.set_id("confirm-modal-confirm");
    actions.append_child(&confirm)?;
    content.append_child(&actions)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

pub fn render(document: &Document, page: &Rc<ListPage>) -> Result<(), JsValue> {
    let view = page.view();

    if let Some(loading) = document.get_element_by_id("flow-loading") {
        dom_utils::set_visible(&loading, view.loading);
    }
    if let Some(search) = document.get_element_by_id("flow-search") {
        dom_utils::set_input_value(&search, &view.search_input);
    }
    for id in ["flow-delete-selected", "flow-clear-selection"] {
        if let Some(btn) = document.get_element_by_id(id) {
            dom_utils::set_disabled(&btn, view.selected_count == 0)?;
        }
    }
    if let Some(btn) = document.get_element_by_id("flow-create-open") {
        dom_utils::set_disabled(&btn, view.creating)?;
    }

    render_rows(document, page, &view.rows)?;
    render_pager(document, &view.pagination)?;

    // Create dialog
    let (backdrop, _) = modal::ensure_modal(document, CREATE_FLOW_MODAL_ID)?;
    modal::set_open(&backdrop, view.create.open);
    if let Some(name) = document.get_element_by_id("create-flow-name") {
        dom_utils::set_input_value(&name, &view.create.name);
    }
    if let Some(desc) = document.get_element_by_id("create-flow-description") {
        dom_utils::set_input_value(&desc, &view.create.description);
    }
    if let Some(err) = document.get_element_by_id("create-flow-name-error") {
        err.set_text_content(view.create.name_error.as_deref());
    }
    if let Some(submit) = document.get_element_by_id("create-flow-submit") {
        dom_utils::set_disabled(&submit, view.creating)?;
    }

    // Delete confirmation
    let (backdrop, _) = modal::ensure_modal(document, CONFIRM_MODAL_ID)?;
    modal::set_open(&backdrop, view.pending_delete.is_some());
    if let (Some(text), Some(pending)) = (
        document.get_element_by_id("confirm-modal-text"),
        view.pending_delete.as_ref(),
    ) {
        text.set_text_content(Some(&format!(
            "Delete flow \"{}\"? This cannot be undone.",
            pending.name
        )));
    }
    if let Some(confirm) = document.get_element_by_id("confirm-modal-confirm") {
        let deleting = view.pending_delete.as_ref().is_some_and(|p| p.deleting);
        dom_utils::set_disabled(&confirm, deleting)?;
    }
    Ok(())
}

fn render_rows(document: &Document, page: &Rc<ListPage>, rows: &[FlowRow]) -> Result<(), JsValue> {
    let tbody = document
        .get_element_by_id("flow-table-body")
        .ok_or_else(|| JsValue::from_str("Could not find flow-table-body"))?;
    tbody.set_inner_html("");

    if rows.is_empty() {
        let tr = document.create_element("tr")?;
        let td = element(document, "td", "empty-row", Some("No flows found. Click '+ New flow' to get started."))?;
        td.set_attribute("colspan", "6")?;
        tr.append_child(&td)?;
        tbody.append_child(&tr)?;
        return Ok(());
    }

    for row in rows {
        tbody.append_child(create_row(document, page, row)?.as_ref())?;
    }
    Ok(())
}

fn create_row(document: &Document, page: &Rc<ListPage>, row: &FlowRow) -> Result<Element, JsValue> {
    let tr = document.create_element("tr")?;
    tr.set_attribute("data-flow-id", &row.id)?;

    // Selection
    let select_cell = document.create_element("td")?;
    let checkbox = document.create_element("input")?;
    checkbox.set_attribute("type", "checkbox")?;
    if row.selected {
        checkbox.set_attribute("checked", "")?;
    }
    {
        let page = page.clone();
        let doc = document.clone();
        let id = row.id.clone();
        on(&checkbox, "change", move |_| {
            page.toggle_selected(&id);
            render_or_log(&doc, &page);
        })?;
    }
    select_cell.append_child(&checkbox)?;
    tr.append_child(&select_cell)?;

    // Name + description
    let name_cell = document.create_element("td")?;
    name_cell.append_child(element(document, "div", "flow-name", Some(&row.name))?.as_ref())?;
    if !row.description.is_empty() {
        name_cell.append_child(element(document, "div", "flow-description", Some(&row.description))?.as_ref())?;
    }
    tr.append_child(&name_cell)?;

    tr.append_child(element(document, "td", "flow-latest", Some(&row.latest_version))?.as_ref())?;

    let published_cell = document.create_element("td")?;
    published_cell.append_child(element(
        document,
        "span",
        row.published.css_class(),
        Some(&row.published.label()),
    )?.as_ref())?;
    tr.append_child(&published_cell)?;

    tr.append_child(element(document, "td", "flow-updated", Some(&row.updated_at))?.as_ref())?;

    // Actions
    let actions = element(document, "td", "actions-cell", None)?;
    {
        let page = page.clone();
        let id = row.id.clone();
        actions.append_child(button(document, "action-btn edit-btn", "Edit", move |_| page.edit(&id))?.as_ref())?;
    }
    {
        let page = page.clone();
        let id = row.id.clone();
        let execute = button(document, "action-btn execute-btn", "Execute", move |_| {
            if let Some(notice) = page.execute(&id) {
                notice.show();
            }
        })?;
        dom_utils::set_disabled(&execute, !row.can_execute)?;
        if !row.can_execute {
            execute.set_attribute("title", "Publish a version to execute this flow")?;
        }
        actions.append_child(&execute)?;
    }
    {
        let page = page.clone();
        let doc = document.clone();
        let id = row.id.clone();
        actions.append_child(button(document, "action-btn clone-btn", "Clone", move |_| {
            let id = id.clone();
            spawn_intent(doc.clone(), page.clone(), move |p| async move { p.clone_flow(&id).await });
        })?.as_ref())?;
    }
    {
        let page = page.clone();
        let doc = document.clone();
        let id = row.id.clone();
        actions.append_child(button(document, "action-btn delete-btn", "Delete", move |_| {
            page.request_delete(&id);
            render_or_log(&doc, &page);
        })?.as_ref())?;
    }
    tr.append_child(&actions)?;

    Ok(tr)
}

fn render_pager(document: &Document, pagination: &PaginationView) -> Result<(), JsValue> {
    if let Some(label) = document.get_element_by_id("flow-pager-label") {
        label.set_text_content(Some(&format!(
            "Page {} of {} · {}",
            pagination.display_page, pagination.page_count, pagination.range_label
        )));
    }
    if let Some(prev) = document.get_element_by_id("flow-pager-prev") {
        dom_utils::set_disabled(&prev, !pagination.has_prev)?;
    }
    if let Some(next) = document.get_element_by_id("flow-pager-next") {
        dom_utils::set_disabled(&next, !pagination.has_next)?;
    }
    if let Some(select) = document
        .get_element_by_id("flow-page-size")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        select.set_value(&pagination.page_size.to_string());
    }
    Ok(())
}
