// src/pages/flow_list.rs
//
// Flow list page: owns the local UI state (search box, create dialog, delete
// confirmation) and turns user intents into controller calls.  Every intent
// that can fail hands back a `Notice` for the toast layer.
//
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::Document;

use super::Notice;
use crate::controllers::{DeleteOutcome, FlowListController};
use crate::debounce::Debouncer;
use crate::debug_log;
use crate::error::ApiError;
use crate::mut_borrow;
use crate::network::FlowApi;
use crate::routes::{BrowserNavigator, Navigator, Route};
use crate::views::pagination::to_page_index;
use crate::views::{FlowRow, PaginationView};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDialog {
    pub open: bool,
    pub name: String,
    pub description: String,
    pub name_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
    /// The confirmed request is in flight.
    pub deleting: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FlowListUi {
    search_input: String,
    create: CreateDialog,
    pending_delete: Option<PendingDelete>,
}

/// Everything the list DOM needs for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowListView {
    pub rows: Vec<FlowRow>,
    pub pagination: PaginationView,
    pub loading: bool,
    pub creating: bool,
    pub search_input: String,
    pub create: CreateDialog,
    pub pending_delete: Option<PendingDelete>,
    pub selected_count: usize,
}

pub struct FlowListPage<N: Navigator> {
    controller: FlowListController,
    navigator: N,
    ui: RefCell<FlowListUi>,
    search_timer: Debouncer,
    attached: Cell<bool>,
}

impl<N: Navigator> FlowListPage<N> {
    pub fn new(api: Rc<dyn FlowApi>, navigator: N, page_size: u32) -> Self {
        Self {
            controller: FlowListController::with_page_size(api, page_size),
            navigator,
            ui: RefCell::new(FlowListUi::default()),
            search_timer: Debouncer::new(),
            attached: Cell::new(true),
        }
    }

    pub fn controller(&self) -> &FlowListController {
        &self.controller
    }

    /// Pending search-as-you-type fetch.
    pub fn search_timer(&self) -> &Debouncer {
        &self.search_timer
    }

    pub fn attached(&self) -> bool {
        self.attached.get()
    }

    /// Stop reacting: the pending search is dropped and results of requests
    /// still in flight are no longer rendered.
    pub fn detach(&self) {
        self.attached.set(false);
        self.search_timer.cancel();
    }

    pub fn view(&self) -> FlowListView {
        let state = self.controller.state();
        let ui = self.ui.borrow();
        FlowListView {
            rows: state
                .items
                .iter()
                .map(|f| FlowRow::from_flow(f, state.selected.contains(&f.id)))
                .collect(),
            pagination: PaginationView::new(
                state.current_page,
                state.page_size,
                state.total_elements,
                state.items.len(),
            ),
            loading: state.loading,
            creating: state.creating,
            search_input: ui.search_input.clone(),
            create: ui.create.clone(),
            pending_delete: ui.pending_delete.clone(),
            selected_count: state.selected.len(),
        }
    }

    // ------------------------------------------------------------------
    // Loading, search, paging
    // ------------------------------------------------------------------

    pub async fn mount(&self) -> Option<Notice> {
        fetch_notice(self.controller.refresh().await)
    }

    pub fn on_search_input(&self, text: &str) {
        mut_borrow!(self.ui).search_input = text.to_string();
        self.controller.set_search_query(text);
    }

    pub async fn on_search_submit(&self) -> Option<Notice> {
        let text = self.ui.borrow().search_input.clone();
        self.controller.set_search_query(&text);
        fetch_notice(self.controller.submit_search().await)
    }

    /// `display_page` is the 1-based number from the pager.
    pub async fn on_page_change(&self, display_page: u32) -> Option<Notice> {
        fetch_notice(self.controller.change_page(to_page_index(display_page)).await)
    }

    pub async fn on_page_size_change(&self, page_size: u32) -> Option<Notice> {
        fetch_notice(self.controller.change_page_size(page_size).await)
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn open_create(&self) {
        mut_borrow!(self.ui).create = CreateDialog {
            open: true,
            ..CreateDialog::default()
        };
    }

    pub fn close_create(&self) {
        mut_borrow!(self.ui).create = CreateDialog::default();
    }

    pub fn set_create_name(&self, name: &str) {
        let mut ui = mut_borrow!(self.ui);
        ui.create.name = name.to_string();
        ui.create.name_error = None;
    }

    pub fn set_create_description(&self, description: &str) {
        mut_borrow!(self.ui).create.description = description.to_string();
    }

    /// On success the dialog closes and the editor for the new flow opens.
    /// On failure the dialog stays open with its input.
    pub async fn submit_create(&self) -> Option<Notice> {
        let (name, description) = {
            let ui = self.ui.borrow();
            (ui.create.name.clone(), ui.create.description.clone())
        };
        match self.controller.create_flow(&name, Some(&description)).await {
            Ok(flow) => {
                self.close_create();
                self.navigator.navigate(Route::FlowEdit(flow.id));
                Some(Notice::Success(format!("Flow \"{}\" created", flow.name)))
            }
            Err(err) => {
                mut_borrow!(self.ui).create.name_error = err.field_message("name").map(str::to_string);
                Some(Notice::Error(format!("Failed to create flow: {}", err)))
            }
        }
    }

    pub async fn clone_flow(&self, id: &str) -> Option<Notice> {
        match self.controller.clone_flow(id, None).await {
            Ok(flow) => {
                self.navigator.navigate(Route::FlowEdit(flow.id));
                Some(Notice::Success(format!("Flow cloned as \"{}\"", flow.name)))
            }
            Err(err) => Some(Notice::Error(format!("Failed to clone flow: {}", err))),
        }
    }

    // ------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------

    pub fn edit(&self, id: &str) {
        self.navigator.navigate(Route::FlowEdit(id.to_string()));
    }

    /// Only published flows navigate to the execution view.
    pub fn execute(&self, id: &str) -> Option<Notice> {
        let state = self.controller.state();
        match state.items.iter().find(|f| f.id == id) {
            Some(flow) if flow.can_execute() => {
                self.navigator.navigate(Route::FlowExecute(flow.id.clone()));
                None
            }
            Some(_) => Some(Notice::Error("Publish the flow before executing it".to_string())),
            None => Some(Notice::Error("Flow is no longer on this page".to_string())),
        }
    }

    /// First step of a delete: ask for confirmation.
    pub fn request_delete(&self, id: &str) {
        let name = self
            .controller
            .state()
            .items
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string());
        mut_borrow!(self.ui).pending_delete = Some(PendingDelete {
            id: id.to_string(),
            name,
            deleting: false,
        });
    }

    pub fn cancel_delete(&self) {
        mut_borrow!(self.ui).pending_delete = None;
    }

    /// Second step: the user confirmed.  Nothing happens without a pending
    /// confirmation, or while one is already being deleted.  The dialog
    /// closes on success and stays open for another try on failure.
    pub async fn confirm_delete(&self) -> Option<Notice> {
        let pending = {
            let mut ui = mut_borrow!(self.ui);
            let pending = ui.pending_delete.as_mut().filter(|p| !p.deleting)?;
            pending.deleting = true;
            pending.clone()
        };
        let result = self.controller.delete_flow(&pending.id).await;

        let mut ui = mut_borrow!(self.ui);
        let still_shown = ui.pending_delete.as_ref().is_some_and(|p| p.id == pending.id);
        match result {
            Ok(outcome) => {
                if still_shown {
                    ui.pending_delete = None;
                }
                Some(delete_notice(
                    format!("Flow \"{}\" deleted", pending.name),
                    outcome,
                ))
            }
            Err(err) => {
                if let Some(shown) = ui.pending_delete.as_mut().filter(|_| still_shown) {
                    shown.deleting = false;
                }
                Some(Notice::Error(format!("Failed to delete flow: {}", err)))
            }
        }
    }

    pub fn toggle_selected(&self, id: &str) {
        self.controller.toggle_selected(id);
    }

    pub fn clear_selection(&self) {
        self.controller.clear_selection();
    }

    pub async fn delete_selected(&self) -> Option<Notice> {
        match self.controller.delete_selected().await {
            Ok((report, outcome)) => Some(delete_notice(
                format!("Deleted {} of {} flows", report.deleted, report.total),
                outcome,
            )),
            Err(err) => Some(Notice::Error(format!("Failed to delete flows: {}", err))),
        }
    }
}

fn fetch_notice<T>(result: Result<T, ApiError>) -> Option<Notice> {
    result
        .err()
        .map(|err| Notice::Error(format!("Failed to load flows: {}", err)))
}

fn delete_notice(success: String, outcome: DeleteOutcome) -> Notice {
    match outcome {
        DeleteOutcome::Refreshed(_) => Notice::Success(success),
        DeleteOutcome::RefreshFailed(err) => {
            Notice::Error(format!("{}, but the list could not be refreshed: {}", success, err))
        }
    }
}

// ---------------------------------------------------------------------------
// Mounting
// ---------------------------------------------------------------------------

thread_local! {
    /// The page mounted in each root, keyed by root id.
    static MOUNTED: RefCell<HashMap<String, Rc<FlowListPage<BrowserNavigator>>>> =
        RefCell::new(HashMap::new());
}

/// Mount the flow list into `#{root_id}` and start the first fetch.
pub fn mount_flow_list(document: &Document, root_id: &str) -> Result<(), JsValue> {
    let config = crate::network::current_config();
    let api: Rc<dyn FlowApi> = Rc::new(crate::network::HttpApiClient::new(config.clone()));
    let page = Rc::new(FlowListPage::new(api, BrowserNavigator, config.page_size));
    mount_page(document, root_id, page, config.search_debounce_ms)
}

/// Mount an already built page.  A page previously mounted in the same root
/// is detached first.
pub fn mount_page(
    document: &Document,
    root_id: &str,
    page: Rc<FlowListPage<BrowserNavigator>>,
    debounce_ms: u32,
) -> Result<(), JsValue> {
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("Could not find #{}", root_id)))?;
    let previous = MOUNTED.with(|m| m.borrow_mut().insert(root_id.to_string(), page.clone()));
    if let Some(previous) = previous {
        debug_log!("flow list: replacing the page mounted in #{}", root_id);
        previous.detach();
    }

    crate::components::flow_table::mount(document, &root, page.clone(), debounce_ms)?;
    crate::components::spawn_intent(document.clone(), page, |page| async move {
        page.mount().await
    });
    Ok(())
}

/// Remove the flow list markup and detach its page.
pub fn unmount_flow_list(document: &Document, root_id: &str) -> Result<(), JsValue> {
    if let Some(page) = MOUNTED.with(|m| m.borrow_mut().remove(root_id)) {
        page.detach();
    }
    if let Some(root) = document.get_element_by_id(root_id) {
        root.set_inner_html("");
    }
    crate::components::modal::remove(document, crate::constants::CREATE_FLOW_MODAL_ID)?;
    crate::components::modal::remove(document, crate::constants::CONFIRM_MODAL_ID)?;
    Ok(())
}
