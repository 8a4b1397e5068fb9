//! Form model for the gateway settings screen.

use std::collections::BTreeMap;

use crate::constants::EMPTY_CELL;
use crate::controllers::{SettingsPhase, SettingsState};
use crate::error::ApiError;
use crate::models::GatewaySettingsUpdate;

/// Raw input as typed by the user.  The port stays text until submit so a
/// half-typed value never clobbers the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatewayDraft {
    pub domain: String,
    pub port: String,
    pub enabled: bool,
}

impl GatewayDraft {
    pub fn from_values(values: &GatewaySettingsUpdate) -> Self {
        Self {
            domain: values.domain.clone(),
            port: values.port.to_string(),
            enabled: values.enabled,
        }
    }

    pub fn parse(&self) -> Result<GatewaySettingsUpdate, ApiError> {
        let port = self
            .port
            .trim()
            .parse::<u32>()
            .map_err(|_| ApiError::field("port", "Port must be a number"))?;
        Ok(GatewaySettingsUpdate {
            domain: self.domain.trim().to_string(),
            port,
            enabled: self.enabled,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFormView {
    pub draft: GatewayDraft,
    pub field_errors: BTreeMap<String, String>,
    /// Transient error from the last save.
    pub error: Option<String>,
    pub inputs_enabled: bool,
    pub submit_enabled: bool,
    pub reload_enabled: bool,
    pub saving: bool,
    /// The draft differs from the stored record.
    pub dirty: bool,
    pub web_socket_url: String,
    pub http_url: String,
    pub updated_at: String,
}

/// Everything the settings screen can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsScreen {
    Loading,
    LoadError { message: String },
    Form(Box<GatewayFormView>),
}

impl SettingsScreen {
    pub fn new(state: &SettingsState, draft: &GatewayDraft) -> Self {
        match (state.phase, &state.settings) {
            (SettingsPhase::LoadError, _) => SettingsScreen::LoadError {
                message: state
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to load gateway settings".to_string()),
            },
            (SettingsPhase::Loaded, Some(settings)) => {
                let idle = !state.saving;
                SettingsScreen::Form(Box::new(GatewayFormView {
                    draft: draft.clone(),
                    field_errors: state.field_errors.clone(),
                    error: state.error.clone(),
                    inputs_enabled: idle,
                    submit_enabled: idle,
                    reload_enabled: idle,
                    saving: state.saving,
                    dirty: GatewayDraft::from_values(&settings.editable()) != *draft,
                    web_socket_url: settings
                        .web_socket_url
                        .clone()
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                    http_url: settings.http_url.clone().unwrap_or_else(|| EMPTY_CELL.to_string()),
                    updated_at: settings
                        .updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                }))
            }
            _ => SettingsScreen::Loading,
        }
    }
}
