use std::sync::Arc;

use notibar_dom::Document;

use crate::display::NotificationDisplay;

/// The core application state that holds configuration, the page document
/// and the display that writes into it.
///
/// It is designed to be wrapped in thread-safe, async-friendly concurrency
/// primitives (see [`SharedState`]) so handlers can read it concurrently and
/// update the configuration occasionally.
#[derive(Debug, Clone)]
pub struct State {
    /// The loaded application configuration.
    pub config: notibar_bridge::config::Config,
    /// Where configuration changes are saved. `None` when there is no
    /// configuration directory or the existing file could not be loaded.
    pub config_path: Option<std::path::PathBuf>,
    /// The page document holding the notification region.
    pub document: Document,
    /// The display bound to the configured region.
    pub display: Arc<NotificationDisplay>,
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
