//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect a frontend
//! (anything that wants to show transient messages) with the asynchronous
//! backend that owns the document, the notification region and its hide
//! timers.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The frontend sends commands (e.g., show a message, request config).
//! - The backend pushes events (e.g., region updates, failed shows).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod config;
pub mod region;
pub mod status;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Status report about the backend itself (config not saved, etc.).
    Status(status::StatusMessage),
    /// Response to the configuration request from the frontend.
    ConfigurationResponse(config::Config),
    /// The notification region's text or visibility changed.
    RegionUpdated(region::RegionSnapshot),
    /// A show request could not be applied, typically because the region
    /// does not exist in the document.
    ShowFailed {
        /// The message that was supposed to be shown.
        message: String,
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Show a message in the notification region and schedule its hide.
    Show(String),
    /// Request the current state of the notification region.
    RegionSnapshotRequest,
    /// Request for the application configuration.
    ConfigurationRequest,
    /// Switch the overlap behavior and persist it.
    SelectHidePolicy(config::HidePolicy),
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
