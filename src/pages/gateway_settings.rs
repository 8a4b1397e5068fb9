// src/pages/gateway_settings.rs
//
// Gateway settings page: keeps the draft the user is typing and drives the
// settings controller.  The draft is re-seeded from the server record after
// every successful load or save and left alone on failure.
//
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::Document;

use super::Notice;
use crate::controllers::{GatewaySettingsController, SettingsState};
use crate::debug_log;
use crate::error::ApiError;
use crate::mut_borrow;
use crate::network::GatewayApi;
use crate::views::{GatewayDraft, SettingsScreen};

pub struct GatewaySettingsPage {
    controller: GatewaySettingsController,
    draft: RefCell<GatewayDraft>,
    /// Errors found while parsing the draft, before the controller sees it.
    input_errors: RefCell<BTreeMap<String, String>>,
    attached: Cell<bool>,
}

impl GatewaySettingsPage {
    pub fn new(api: Rc<dyn GatewayApi>) -> Self {
        Self {
            controller: GatewaySettingsController::new(api),
            draft: RefCell::new(GatewayDraft::default()),
            input_errors: RefCell::new(BTreeMap::new()),
            attached: Cell::new(true),
        }
    }

    pub fn attached(&self) -> bool {
        self.attached.get()
    }

    /// Results of requests still in flight are no longer rendered.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    pub fn controller(&self) -> &GatewaySettingsController {
        &self.controller
    }

    pub fn draft(&self) -> GatewayDraft {
        self.draft.borrow().clone()
    }

    pub fn screen(&self) -> SettingsScreen {
        let mut state: SettingsState = self.controller.state();
        for (field, msg) in self.input_errors.borrow().iter() {
            state.field_errors.insert(field.clone(), msg.clone());
        }
        SettingsScreen::new(&state, &self.draft.borrow())
    }

    /// Load on mount, and from the error panel's retry button.  A failure
    /// is shown by the blocking error panel, so no toast is returned.
    pub async fn mount(&self) -> Option<Notice> {
        self.reload().await
    }

    pub async fn retry(&self) -> Option<Notice> {
        let result = self.controller.retry().await;
        self.after_load(result)
    }

    /// Discard edits and fetch the stored record again.
    pub async fn reload(&self) -> Option<Notice> {
        let result = self.controller.load().await;
        self.after_load(result)
    }

    fn after_load(&self, result: Result<(), ApiError>) -> Option<Notice> {
        match result {
            Ok(()) => {
                self.reseed_draft();
                None
            }
            Err(ApiError::Busy) => Some(Notice::Error("Wait for the save to finish".to_string())),
            Err(_) => None,
        }
    }

    // Editing the form dismisses the banner of the last failed save.

    pub fn set_domain(&self, domain: &str) {
        mut_borrow!(self.draft).domain = domain.to_string();
        mut_borrow!(self.input_errors).remove("domain");
        self.controller.dismiss_error();
    }

    pub fn set_port(&self, port: &str) {
        mut_borrow!(self.draft).port = port.to_string();
        mut_borrow!(self.input_errors).remove("port");
        self.controller.dismiss_error();
    }

    pub fn set_enabled(&self, enabled: bool) {
        mut_borrow!(self.draft).enabled = enabled;
        self.controller.dismiss_error();
    }

    pub async fn submit(&self) -> Option<Notice> {
        let parsed = self.draft.borrow().parse();
        let values = match parsed {
            Ok(values) => values,
            Err(err) => {
                if let ApiError::Validation { fields, .. } = &err {
                    mut_borrow!(self.input_errors).extend(fields.clone());
                }
                return Some(Notice::Error(err.to_string()));
            }
        };
        mut_borrow!(self.input_errors).clear();

        match self.controller.save(&values).await {
            Ok(message) => {
                self.reseed_draft();
                let message = if message.is_empty() {
                    "Gateway settings saved".to_string()
                } else {
                    message
                };
                Some(Notice::Success(message))
            }
            Err(err) => Some(Notice::Error(format!("Failed to save gateway settings: {}", err))),
        }
    }

    fn reseed_draft(&self) {
        if let Some(values) = self.controller.form_values() {
            *mut_borrow!(self.draft) = GatewayDraft::from_values(&values);
        }
        mut_borrow!(self.input_errors).clear();
    }
}

// ---------------------------------------------------------------------------
// Mounting
// ---------------------------------------------------------------------------

thread_local! {
    static MOUNTED: RefCell<HashMap<String, Rc<GatewaySettingsPage>>> = RefCell::new(HashMap::new());
}

pub fn mount_gateway_settings(document: &Document, root_id: &str) -> Result<(), JsValue> {
    let api: Rc<dyn GatewayApi> = Rc::new(crate::network::HttpApiClient::default());
    mount_page(document, root_id, Rc::new(GatewaySettingsPage::new(api)))
}

/// Mount an already built page, detaching whatever was mounted in the root.
pub fn mount_page(document: &Document, root_id: &str, page: Rc<GatewaySettingsPage>) -> Result<(), JsValue> {
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("Could not find #{}", root_id)))?;
    let previous = MOUNTED.with(|m| m.borrow_mut().insert(root_id.to_string(), page.clone()));
    if let Some(previous) = previous {
        debug_log!("gateway settings: replacing the page mounted in #{}", root_id);
        previous.detach();
    }

    crate::components::gateway_form::mount(document, &root, page.clone())?;
    crate::components::spawn_intent(document.clone(), page, |page| async move {
        page.mount().await
    });
    Ok(())
}

pub fn unmount_gateway_settings(document: &Document, root_id: &str) -> Result<(), JsValue> {
    if let Some(page) = MOUNTED.with(|m| m.borrow_mut().remove(root_id)) {
        page.detach();
    }
    if let Some(root) = document.get_element_by_id(root_id) {
        root.set_inner_html("");
    }
    Ok(())
}
