//! Scenario tests for the controllers and page presenters, driven by a
//! scripted in-memory backend.

mod flow_list_controller;
mod gateway_settings_controller;
