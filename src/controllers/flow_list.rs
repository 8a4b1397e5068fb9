//! View-state for the paginated, searchable flow list.
//!
//! The controller is created when the list view mounts and dropped when it
//! unmounts.  All methods take `&self`: the browser runs everything on one
//! thread, and several fetches may be in flight at once, so the state lives
//! in a `RefCell` that is never borrowed across an `.await`.
//!
//! Results are applied in *issue* order.  Every fetch takes a sequence number
//! and a response is dropped when a newer fetch has been issued since.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::debug_log;
use crate::error::ApiError;
use crate::models::{BatchDeleteReport, CreateFlowRequest, Flow, FlowListQuery};
use crate::mut_borrow;
use crate::network::FlowApi;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowListState {
    pub items: Vec<Flow>,
    pub total_elements: u64,
    pub loading: bool,
    /// A create or clone request is in flight.
    pub creating: bool,
    pub current_page: u32,
    pub page_size: u32,
    /// Pending search text, trimmed; sent with the next fetch.
    pub search_query: String,
    pub selected: BTreeSet<String>,
}

impl FlowListState {
    fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_elements: 0,
            loading: false,
            creating: false,
            current_page: 0,
            page_size: page_size.max(1),
            search_query: String::new(),
            selected: BTreeSet::new(),
        }
    }
}

/// What happened to a fetch once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the list state.
    Applied,
    /// A newer fetch was issued in the meantime; the response was dropped.
    Superseded,
}

/// Result of the refresh that follows a successful delete.  The delete itself
/// already succeeded in both cases.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Refreshed(FetchOutcome),
    RefreshFailed(ApiError),
}

pub struct FlowListController {
    api: Rc<dyn FlowApi>,
    state: RefCell<FlowListState>,
    /// Query of the last applied fetch.
    committed: RefCell<FlowListQuery>,
    issued: Cell<u64>,
}

impl FlowListController {
    pub fn new(api: Rc<dyn FlowApi>) -> Self {
        Self::with_page_size(api, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(api: Rc<dyn FlowApi>, page_size: u32) -> Self {
        let state = FlowListState::new(page_size);
        let committed = FlowListQuery {
            page_index: 0,
            page_size: state.page_size,
            search_text: String::new(),
        };
        Self {
            api,
            state: RefCell::new(state),
            committed: RefCell::new(committed),
            issued: Cell::new(0),
        }
    }

    /// Snapshot for rendering.
    pub fn state(&self) -> FlowListState {
        self.state.borrow().clone()
    }

    /// The query a fetch without arguments would send.  Pending search text
    /// that differs from the applied one starts from the first page.
    pub fn query(&self) -> FlowListQuery {
        let state = self.state.borrow();
        let committed = self.committed.borrow();
        let page_index = if state.search_query == committed.search_text {
            state.current_page
        } else {
            0
        };
        FlowListQuery {
            page_index,
            page_size: state.page_size,
            search_text: state.search_query.clone(),
        }
    }

    pub fn committed_query(&self) -> FlowListQuery {
        self.committed.borrow().clone()
    }

    /// Update the pending search text without fetching.  The list itself,
    /// current page included, only changes when a fetch is applied.
    pub fn set_search_query(&self, value: &str) {
        mut_borrow!(self.state).search_query = value.trim().to_string();
    }

    // ---------------------------------------------------------------------
    // Fetching
    // ---------------------------------------------------------------------

    pub async fn fetch_flows(&self, query: FlowListQuery) -> Result<FetchOutcome, ApiError> {
        let query = self.normalize(query);
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        mut_borrow!(self.state).loading = true;
        debug_log!(
            "flows: fetch #{} page={} size={} search={:?}",
            seq,
            query.page_index,
            query.page_size,
            query.search_text
        );

        let result = self.api.list_flows(&query).await;

        if seq != self.issued.get() {
            debug_log!("flows: dropping stale response #{} (latest #{})", seq, self.issued.get());
            return Ok(FetchOutcome::Superseded);
        }

        let mut state = mut_borrow!(self.state);
        state.loading = false;
        match result {
            Ok(mut page) => {
                page.items.truncate(query.page_size as usize);
                state.selected.retain(|id| page.items.iter().any(|f| &f.id == id));
                state.items = page.items;
                state.total_elements = page.total_elements;
                state.current_page = query.page_index;
                state.page_size = query.page_size;
                state.search_query = query.search_text.clone();
                *mut_borrow!(self.committed) = query;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                // Existing rows stay on screen.
                debug_log!("flows: fetch #{} failed: {}", seq, err);
                Err(err)
            }
        }
    }

    /// Repeat the current query (pending search text included).
    pub async fn refresh(&self) -> Result<FetchOutcome, ApiError> {
        self.fetch_flows(self.query()).await
    }

    /// Fetch with the pending search text, starting at the first page.
    pub async fn submit_search(&self) -> Result<FetchOutcome, ApiError> {
        self.fetch_flows(self.query().with_page(0)).await
    }

    /// Page through the applied results.  `page_index` is zero-based; pending
    /// search text is left for `submit_search`.
    pub async fn change_page(&self, page_index: u32) -> Result<FetchOutcome, ApiError> {
        self.fetch_flows(self.committed_query().with_page(page_index)).await
    }

    pub async fn change_page_size(&self, page_size: u32) -> Result<FetchOutcome, ApiError> {
        let query = self.committed_query().with_page(0).with_page_size(page_size);
        self.fetch_flows(query).await
    }

    /// A different page size or search text than the last applied query
    /// always starts from the first page.
    fn normalize(&self, mut query: FlowListQuery) -> FlowListQuery {
        query.page_size = query.page_size.max(1);
        query.search_text = query.search_text.trim().to_string();
        let committed = self.committed.borrow();
        if query.page_size != committed.page_size || query.search_text != committed.search_text {
            query.page_index = 0;
        }
        query
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Create a flow and hand it back for navigation.  The list is not
    /// refetched.
    pub async fn create_flow(&self, name: &str, description: Option<&str>) -> Result<Flow, ApiError> {
        let request = CreateFlowRequest::new(name, description)?;
        self.begin_create()?;
        let result = self.api.create_flow(&request).await;
        mut_borrow!(self.state).creating = false;
        match &result {
            Ok(flow) => debug_log!("flows: created {} ({})", flow.id, flow.name),
            Err(err) => debug_log!("flows: create failed: {}", err),
        }
        result
    }

    /// Clone a flow; like create, the caller navigates to the copy.
    pub async fn clone_flow(&self, id: &str, name: Option<&str>) -> Result<Flow, ApiError> {
        self.begin_create()?;
        let result = self.api.clone_flow(id, name).await;
        mut_borrow!(self.state).creating = false;
        if let Err(err) = &result {
            debug_log!("flows: clone of {} failed: {}", id, err);
        }
        result
    }

    fn begin_create(&self) -> Result<(), ApiError> {
        let mut state = mut_borrow!(self.state);
        if state.creating {
            return Err(ApiError::Busy);
        }
        state.creating = true;
        Ok(())
    }

    /// Delete a flow, then re-issue exactly one fetch with the committed
    /// query.  A failed delete does not refresh.
    pub async fn delete_flow(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        if let Err(err) = self.api.delete_flow(id).await {
            debug_log!("flows: delete of {} failed: {}", id, err);
            return Err(err);
        }
        mut_borrow!(self.state).selected.remove(id);
        Ok(self.refresh_committed().await)
    }

    /// Batch-delete the selected rows.  Selection survives a failure.
    pub async fn delete_selected(&self) -> Result<(BatchDeleteReport, DeleteOutcome), ApiError> {
        let ids: Vec<String> = self.state.borrow().selected.iter().cloned().collect();
        if ids.is_empty() {
            return Err(ApiError::validation("No flows selected"));
        }
        let report = match self.api.batch_delete_flows(&ids).await {
            Ok(report) => report,
            Err(err) => {
                debug_log!("flows: batch delete of {} ids failed: {}", ids.len(), err);
                return Err(err);
            }
        };
        mut_borrow!(self.state).selected.clear();
        Ok((report, self.refresh_committed().await))
    }

    async fn refresh_committed(&self) -> DeleteOutcome {
        match self.fetch_flows(self.committed_query()).await {
            Ok(outcome) => DeleteOutcome::Refreshed(outcome),
            Err(err) => DeleteOutcome::RefreshFailed(err),
        }
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn toggle_selected(&self, id: &str) {
        let mut state = mut_borrow!(self.state);
        if !state.selected.remove(id) {
            state.selected.insert(id.to_string());
        }
    }

    pub fn clear_selection(&self) {
        mut_borrow!(self.state).selected.clear();
    }
}
