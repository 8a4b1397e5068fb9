//! Pure view-models derived from controller state.  Nothing in here touches
//! the DOM, so all of it is unit-tested natively.

pub mod flow_table;
pub mod gateway_form;
pub mod pagination;

pub use flow_table::{FlowRow, PublishBadge};
pub use gateway_form::{GatewayDraft, GatewayFormView, SettingsScreen};
pub use pagination::PaginationView;
