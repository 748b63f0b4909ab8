//! Core UI functionality for the Modalist application.
//!
//! This module contains the fundamental building blocks for the user interface:
//! the component abstraction, the actions components exchange, and the event
//! poller that feeds the terminal loop.
//!
//! # Module Components
//!
//! - [`actions`] - Action definitions and UI state transitions
//! - [`component`] - Base component trait and rendering abstractions
//! - [`event_handler`] - Terminal event polling
//!
//! # Architecture
//!
//! 1. **Components** implement the [`Component`] trait for consistent rendering
//! 2. **Actions** describe state transitions requested by a component
//! 3. **Events** are read through the [`EventHandler`] and routed to components
//!
//! Dialog dismissal does not travel as an action from the dialog itself: the
//! dialog only invokes its close callback, and the host turns that request
//! into [`Action::CloseDialog`] on its next update.

pub mod actions;
pub mod component;
pub mod event_handler;

pub use actions::Action;
pub use component::Component;
pub use event_handler::{EventHandler, EventType};
