//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle: the page document with its
//! notification region, the [`display::NotificationDisplay`] that writes
//! transient messages into it, and the dispatch loop that routes bridge
//! messages to services.

mod app;
pub mod config;
pub mod display;
mod runtime;
mod services;
mod state;

pub use crate::display::{DisplayError, HIDE_DELAY, HideTimer, NotificationDisplay};
pub use crate::runtime::{run, serve};
