//! View-state for the gateway connection settings form.
//!
//! Phases per view instance:
//!
//! ```text
//! Initial -> Loading -> Loaded | LoadError
//! Loaded  -> (saving) -> Loaded            (refreshed, or prior data + error)
//! LoadError -> Loading                     (explicit retry only)
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::debug_log;
use crate::error::ApiError;
use crate::models::{GatewaySettings, GatewaySettingsUpdate};
use crate::mut_borrow;
use crate::network::GatewayApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPhase {
    Initial,
    Loading,
    Loaded,
    LoadError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsState {
    pub phase: SettingsPhase,
    pub settings: Option<GatewaySettings>,
    pub saving: bool,
    /// Load error (blocking) or the last save error (transient).
    pub error: Option<String>,
    /// Inline messages from the last rejected save.
    pub field_errors: BTreeMap<String, String>,
}

impl SettingsState {
    pub fn loading(&self) -> bool {
        self.phase == SettingsPhase::Loading
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            phase: SettingsPhase::Initial,
            settings: None,
            saving: false,
            error: None,
            field_errors: BTreeMap::new(),
        }
    }
}

pub struct GatewaySettingsController {
    api: Rc<dyn GatewayApi>,
    state: RefCell<SettingsState>,
    load_seq: Cell<u64>,
}

impl GatewaySettingsController {
    pub fn new(api: Rc<dyn GatewayApi>) -> Self {
        Self {
            api,
            state: RefCell::new(SettingsState::default()),
            load_seq: Cell::new(0),
        }
    }

    pub fn state(&self) -> SettingsState {
        self.state.borrow().clone()
    }

    /// Initial form values: the last loaded or saved record.
    pub fn form_values(&self) -> Option<GatewaySettingsUpdate> {
        self.state.borrow().settings.as_ref().map(GatewaySettings::editable)
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        let seq = {
            let mut state = mut_borrow!(self.state);
            if state.saving {
                return Err(ApiError::Busy);
            }
            state.phase = SettingsPhase::Loading;
            state.error = None;
            state.field_errors.clear();
            self.load_seq.get() + 1
        };
        self.load_seq.set(seq);
        debug_log!("gateway: load #{}", seq);

        let result = self.api.get_gateway_settings().await;
        if seq != self.load_seq.get() {
            debug_log!("gateway: dropping stale load #{}", seq);
            return Ok(());
        }

        let mut state = mut_borrow!(self.state);
        match result {
            Ok(settings) => {
                state.phase = SettingsPhase::Loaded;
                state.settings = Some(settings);
                Ok(())
            }
            Err(err) => {
                debug_log!("gateway: load failed: {}", err);
                state.phase = SettingsPhase::LoadError;
                state.settings = None;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Leave the error panel by loading again.
    pub async fn retry(&self) -> Result<(), ApiError> {
        self.load().await
    }

    /// Validate and persist the editable subset.  Returns the server's
    /// confirmation message.  On failure the stored settings are untouched
    /// and the form keeps its input.
    pub async fn save(&self, values: &GatewaySettingsUpdate) -> Result<String, ApiError> {
        let values = values.normalized();
        {
            let mut state = mut_borrow!(self.state);
            if state.saving || state.phase == SettingsPhase::Loading {
                return Err(ApiError::Busy);
            }
            if state.phase != SettingsPhase::Loaded {
                return Err(ApiError::request("Gateway settings have not been loaded"));
            }
            if let Err(err) = values.validate() {
                Self::record_failure(&mut state, &err);
                return Err(err);
            }
            state.saving = true;
            state.error = None;
            state.field_errors.clear();
        }
        debug_log!("gateway: saving {}:{} enabled={}", values.domain, values.port, values.enabled);

        let result = self.api.update_gateway_settings(&values).await;

        let mut state = mut_borrow!(self.state);
        state.saving = false;
        match result {
            Ok(response) => {
                state.settings = Some(response.settings);
                Ok(response.message)
            }
            Err(err) => {
                debug_log!("gateway: save failed: {}", err);
                Self::record_failure(&mut state, &err);
                Err(err)
            }
        }
    }

    /// Clear a transient save error once it has been shown.
    pub fn dismiss_error(&self) {
        let mut state = mut_borrow!(self.state);
        if state.phase == SettingsPhase::Loaded {
            state.error = None;
            state.field_errors.clear();
        }
    }

    fn record_failure(state: &mut SettingsState, err: &ApiError) {
        state.error = Some(err.to_string());
        state.field_errors = match err {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        };
    }
}
