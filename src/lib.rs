use wasm_bindgen::prelude::*;

#[macro_use]
mod macros;

pub mod constants;
pub mod controllers;
pub mod debounce;
pub mod error;
pub mod models;
pub mod network;
pub mod routes;
pub mod views;

pub mod components;
mod dom_utils;
pub mod pages;
mod toast;

#[cfg(test)]
mod tests;

use constants::{FLOW_LIST_ROOT_ID, GATEWAY_SETTINGS_ROOT_ID};
use routes::Route;

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Better panic messages in the console
    console_error_panic_hook::set_once();

    network::init_api_config();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("should have a document on window"))?;

    let path = window.location().pathname()?;
    debug_log!("console starting at {}", path);
    match Route::from_path(&path) {
        Some(Route::GatewaySettings) => {
            if document.get_element_by_id(GATEWAY_SETTINGS_ROOT_ID).is_some() {
                pages::mount_gateway_settings(&document, GATEWAY_SETTINGS_ROOT_ID)?;
            }
        }
        Some(Route::FlowList) | None => {
            if document.get_element_by_id(FLOW_LIST_ROOT_ID).is_some() {
                pages::mount_flow_list(&document, FLOW_LIST_ROOT_ID)?;
            }
        }
        // Editor and execution screens live outside this bundle.
        Some(_) => {}
    }
    Ok(())
}

/// Override the API configuration from JS before mounting.
///
/// ```js
/// init_api_config_js({ baseUrl: "https://n3n.example.com", pageSize: 50 });
/// ```
#[wasm_bindgen]
pub fn init_api_config_js(config: JsValue) -> Result<(), JsValue> {
    let parsed: network::config::JsApiConfig = serde_wasm_bindgen::from_value(config)?;
    network::set_api_config(parsed.into());
    Ok(())
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

#[wasm_bindgen]
pub fn mount_flow_list(root_id: &str) -> Result<(), JsValue> {
    pages::mount_flow_list(&document()?, root_id)
}

#[wasm_bindgen]
pub fn unmount_flow_list(root_id: &str) -> Result<(), JsValue> {
    pages::unmount_flow_list(&document()?, root_id)
}

#[wasm_bindgen]
pub fn mount_gateway_settings(root_id: &str) -> Result<(), JsValue> {
    pages::mount_gateway_settings(&document()?, root_id)
}

#[wasm_bindgen]
pub fn unmount_gateway_settings(root_id: &str) -> Result<(), JsValue> {
    pages::unmount_gateway_settings(&document()?, root_id)
}
