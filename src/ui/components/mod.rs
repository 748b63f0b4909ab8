//! Reusable UI components

pub mod dialog_component;
pub mod dialogs;
pub mod host_component;

// Component exports
pub use dialog_component::{Dialog, DialogOptions, DialogProps, DismissReason, OnClose};
pub use dialogs::PortalLayer;
pub use host_component::{Employee, HostComponent};
