use std::rc::Rc;

use futures::executor::block_on;

use super::fake_api::{deferred, gateway, poll_once, FakeApi, Scripted};
use crate::controllers::{GatewaySettingsController, SettingsPhase};
use crate::error::ApiError;
use crate::models::{GatewaySettingsUpdate, UpdateGatewaySettingsResponse};

fn loaded_controller() -> (Rc<FakeApi>, GatewaySettingsController) {
    let api = Rc::new(FakeApi::default());
    api.settings_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Ok(gateway("gw.example.com", 9443))));
    let controller = GatewaySettingsController::new(api.clone());
    block_on(controller.load()).unwrap();
    (api, controller)
}

fn update(domain: &str, port: u32) -> GatewaySettingsUpdate {
    GatewaySettingsUpdate {
        domain: domain.to_string(),
        port,
        enabled: true,
    }
}

#[test]
fn load_failure_blocks_until_retry() {
    let api = Rc::new(FakeApi::default());
    api.settings_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Err(ApiError::request("timeout"))));
    api.settings_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Ok(gateway("gw.example.com", 9443))));
    let controller = GatewaySettingsController::new(api.clone());
    assert_eq!(controller.state().phase, SettingsPhase::Initial);

    assert!(block_on(controller.load()).is_err());
    let state = controller.state();
    assert_eq!(state.phase, SettingsPhase::LoadError);
    assert_eq!(state.error.as_deref(), Some("timeout"));
    assert!(state.settings.is_none());
    assert!(controller.form_values().is_none());

    block_on(controller.retry()).unwrap();
    let state = controller.state();
    assert_eq!(state.phase, SettingsPhase::Loaded);
    assert_eq!(state.error, None);
    assert_eq!(state.settings.unwrap().port, 9443);
    assert_eq!(api.settings_calls.get(), 2);
}

#[test]
fn loading_phase_is_visible_while_request_is_pending() {
    let api = Rc::new(FakeApi::default());
    let (tx, reply) = deferred();
    api.settings_replies.borrow_mut().push_back(reply);
    let controller = GatewaySettingsController::new(api.clone());

    let mut load = Box::pin(controller.load());
    assert!(poll_once(&mut load).is_pending());
    assert!(controller.state().loading());

    tx.send(Ok(gateway("gw.example.com", 9443))).unwrap();
    assert!(poll_once(&mut load).is_ready());
    assert_eq!(controller.state().phase, SettingsPhase::Loaded);
}

#[test]
fn out_of_range_port_is_rejected_locally() {
    let (api, controller) = loaded_controller();

    let err = block_on(controller.save(&update("gw.example.com", 70000))).unwrap_err();
    assert_eq!(err.field_message("port"), Some("Port must be between 1 and 65535"));

    let state = controller.state();
    assert_eq!(state.settings.unwrap().port, 9443);
    assert_eq!(
        state.field_errors.get("port").map(String::as_str),
        Some("Port must be between 1 and 65535")
    );
    assert!(!state.saving);
    assert!(api.update_calls.borrow().is_empty());
}

#[test]
fn domain_with_scheme_is_rejected_locally() {
    let (api, controller) = loaded_controller();
    let err = block_on(controller.save(&update("https://gw.example.com", 443))).unwrap_err();
    assert!(err.field_message("domain").is_some());
    assert!(api.update_calls.borrow().is_empty());
}

#[test]
fn successful_save_replaces_settings() {
    let (api, controller) = loaded_controller();
    api.update_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Ok(UpdateGatewaySettingsResponse {
            settings: gateway("edge.example.com", 8443),
            message: "Gateway settings updated".into(),
        })));

    let message = block_on(controller.save(&update("  edge.example.com ", 8443))).unwrap();
    assert_eq!(message, "Gateway settings updated");
    assert_eq!(api.update_calls.borrow()[0].domain, "edge.example.com");

    let state = controller.state();
    let settings = state.settings.unwrap();
    assert_eq!(settings.domain, "edge.example.com");
    assert_eq!(
        settings.web_socket_url.as_deref(),
        Some("wss://edge.example.com:8443/gateway")
    );
    assert!(!state.saving);
    assert_eq!(state.error, None);
}

#[test]
fn failed_save_keeps_previous_settings() {
    let (api, controller) = loaded_controller();
    api.update_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Err(ApiError::from_response(
            400,
            "Bad Request",
            r#"{"error":"VALIDATION_ERROR","message":"Domain is not resolvable","details":{"domain":"Domain is not resolvable"}}"#,
        ))));

    let err = block_on(controller.save(&update("nowhere.invalid", 9443))).unwrap_err();
    assert!(err.is_validation());

    let state = controller.state();
    assert_eq!(state.phase, SettingsPhase::Loaded);
    assert_eq!(state.settings.unwrap().domain, "gw.example.com");
    assert_eq!(state.error.as_deref(), Some("Domain is not resolvable"));
    assert!(!state.saving);

    controller.dismiss_error();
    assert_eq!(controller.state().error, None);
}

#[test]
fn save_and_reload_are_busy_while_saving() {
    let (api, controller) = loaded_controller();
    let (tx, reply) = deferred();
    api.update_replies.borrow_mut().push_back(reply);

    let values = update("edge.example.com", 8443);
    let mut save = Box::pin(controller.save(&values));
    assert!(poll_once(&mut save).is_pending());
    assert!(controller.state().saving);

    assert_eq!(
        block_on(controller.save(&update("other.example.com", 1))),
        Err(ApiError::Busy)
    );
    assert_eq!(block_on(controller.load()), Err(ApiError::Busy));
    assert_eq!(api.settings_calls.get(), 1);

    tx.send(Ok(UpdateGatewaySettingsResponse {
        settings: gateway("edge.example.com", 8443),
        message: String::new(),
    }))
    .unwrap();
    assert!(poll_once(&mut save).is_ready());
    assert!(!controller.state().saving);
}

#[test]
fn save_before_load_is_refused() {
    let api = Rc::new(FakeApi::default());
    let controller = GatewaySettingsController::new(api.clone());
    assert!(block_on(controller.save(&update("gw.example.com", 9443))).is_err());
    assert!(api.update_calls.borrow().is_empty());
}
