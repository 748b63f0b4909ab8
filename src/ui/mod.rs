//! UI module for Modalist
//!
//! This module handles the terminal surface: the component abstractions, the
//! dialog component and its painter, the demo host, and the terminal loop.

pub mod components;
pub mod core;
pub mod layout;
pub mod renderer;

pub use layout::LayoutManager;
pub use renderer::run_app;
