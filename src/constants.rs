//! Constants used throughout the application
//!
//! This module centralizes the reserved ids, attribute names, UI text, and
//! layout bounds shared by the dialog, its painter, and the demo host.

// Document contract
/// Id of the portal anchor dialogs mount into
pub const PORTAL_ROOT_ID: &str = "modalist-root";
/// Attribute that turns any element inside a dialog into a dismiss trigger
pub const DISMISS_MARKER: &str = "data-modal-close";
pub const ATTR_ROLE: &str = "role";
pub const ATTR_ARIA_MODAL: &str = "aria-modal";
pub const ATTR_ARIA_LABEL: &str = "aria-label";
pub const ROLE_DIALOG: &str = "dialog";
/// Id given to the heading of a titled dialog
pub const TITLE_ELEMENT_ID: &str = "modal-title";

// Dialog chrome
pub const CLOSE_LABEL: &str = "Close";

// Demo host text
pub const HOST_TITLE: &str = "Current Employees";
pub const DIALOG_TITLE_EMPLOYEE_CREATED: &str = "Employee Created!";
pub const DIALOG_MESSAGE_EMPLOYEE_CREATED: &str = "The new employee has been successfully added to the list.";
pub const DIALOG_BUTTON_OK: &str = "OK";
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Layout bounds
/// Minimum dialog width as a percentage of the screen
pub const DIALOG_MIN_WIDTH_PERCENT: u16 = 20;
/// Maximum dialog width as a percentage of the screen
pub const DIALOG_MAX_WIDTH_PERCENT: u16 = 100;
/// Default dialog width as a percentage of the screen
pub const DIALOG_DEFAULT_WIDTH_PERCENT: u16 = 50;

// Logging
/// Entries kept in the in-memory log buffer
pub const MAX_LOG_ENTRIES: usize = 500;
