// Defaults for the flow list - these are the single source of truth for defaults
pub const DEFAULT_PAGE_SIZE: u32 = 20; // matches the backend's @PageableDefault
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

// Gateway settings bounds
pub const PORT_MIN: u32 = 1;
pub const PORT_MAX: u32 = 65535;

// Notifications
pub const TOAST_LIFETIME_MS: i32 = 4000;

// Placeholder shown in table cells without a value
pub const EMPTY_CELL: &str = "-";

// localStorage key holding the platform JWT
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

// DOM ids shared between pages and components
pub const FLOW_LIST_ROOT_ID: &str = "flow-list";
pub const GATEWAY_SETTINGS_ROOT_ID: &str = "gateway-settings";
pub const CREATE_FLOW_MODAL_ID: &str = "create-flow-modal";
pub const CONFIRM_MODAL_ID: &str = "confirm-modal";
