//! Modalist - a portal-rendered modal dialog for terminal user interfaces
//!
//! This library provides a controlled modal dialog with the interaction
//! contract of a web modal: content is mounted into a shared portal anchor
//! outside the host's own tree, the background scroll is locked while it is
//! open, focus moves to the close control, and four independent dismissal
//! channels (backdrop click, Escape, close control, marked elements) ask the
//! host to close it. Rendering targets Ratatui; input comes from Crossterm.
//!
//! # Modules
//!
//! * [`config`] - Application configuration management
//! * [`document`] - Element tree, listeners, portal anchors and scroll lock
//! * [`ui`] - Dialog component, painter, demo host and terminal loop
//! * [`logger`] - Logging setup

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Document model dialogs render into
pub mod document;

/// Icon definitions for visual representation in the TUI
pub mod icons;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Terminal user interface components and rendering
pub mod ui;

// Re-export the dialog surface for convenient access
pub use ui::components::{Dialog, DialogOptions, DialogProps, DismissReason, OnClose, PortalLayer};
