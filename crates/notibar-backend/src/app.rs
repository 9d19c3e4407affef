//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and status messages back to the frontend bridge.

use std::sync::Arc;

use notibar_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::debug!("Frontend bridge closed");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::Show(text) => {
                services::notification_service::handle_show_request(self.clone(), text).await;
            }
            MessageToBackend::RegionSnapshotRequest => {
                services::notification_service::handle_region_snapshot_request(self.clone())
                    .await;
            }
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToBackend::SelectHidePolicy(policy) => {
                services::config_service::handle_hide_policy_selection(self.clone(), policy)
                    .await;
            }
        }
    }

    /// Send a message to the frontend bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        if self.tx.send(message).await.is_err() {
            log::warn!("Frontend bridge closed, dropping message");
        }
    }

    /// Send a status report to the frontend bridge.
    pub async fn send_status(
        &self,
        level: notibar_bridge::status::StatusLevel,
        text: impl Into<String>,
    ) {
        self.send(MessageFromBackend::Status(
            notibar_bridge::status::StatusMessage {
                level,
                text: text.into(),
            },
        ))
        .await;
    }
}
