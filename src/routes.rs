//! Routes this crate links to, and the narrow hook into the host router.

use wasm_bindgen::JsValue;

use crate::models::{decode_component, encode_component};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    FlowList,
    FlowEdit(String),
    FlowExecute(String),
    GatewaySettings,
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Route::FlowList => "/flows".to_string(),
            Route::FlowEdit(id) => format!("/flows/{}/edit", encode_component(id)),
            Route::FlowExecute(id) => format!("/flows/{}/execute", encode_component(id)),
            Route::GatewaySettings => "/settings/gateway".to_string(),
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["flows"] => Some(Route::FlowList),
            ["flows", id, "edit"] if !id.is_empty() => decode_component(id).map(Route::FlowEdit),
            ["flows", id, "execute"] if !id.is_empty() => decode_component(id).map(Route::FlowExecute),
            ["settings", "gateway"] => Some(Route::GatewaySettings),
            _ => None,
        }
    }
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Pushes a history entry and fires `popstate` so the host router re-renders.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, route: Route) {
        if let Err(e) = push_route(&route) {
            web_sys::console::error_1(&format!("Navigation to {:?} failed: {:?}", route, e).into());
        }
    }
}

fn push_route(route: &Route) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window
        .history()?
        .push_state_with_url(&JsValue::NULL, "", Some(&route.to_path()))?;
    let event = web_sys::Event::new("popstate")?;
    window.dispatch_event(&event)?;
    Ok(())
}
