//! Dialog painting helpers

pub mod common;
mod portal_layer;

pub use portal_layer::PortalLayer;
