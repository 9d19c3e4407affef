//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, the page document, shared state,
//! and the message dispatch loop that listens to frontend bridge requests.

use std::{path::PathBuf, sync::Arc, thread};

use notibar_bridge::config::Config;
use notibar_bridge::{MessageFromBackend, MessageToBackend};
use notibar_dom::{Document, Mutation};
use tokio::sync::{
    RwLock, broadcast,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::display::NotificationDisplay;
use crate::services::notification_service::region_snapshot;
use crate::state::State;

/// Forwards mutations of the region element to the frontend until either side
/// goes away.
async fn forward_region_mutations(
    mut mutations: broadcast::Receiver<Mutation>,
    region_id: String,
    tx: Sender<MessageFromBackend>,
) {
    loop {
        match mutations.recv().await {
            Ok(mutation) if mutation.target.id == region_id => {
                let update = MessageFromBackend::RegionUpdated(region_snapshot(mutation.target));
                if tx.send(update).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Region observer lagged behind, skipped {skipped} mutations");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Serves frontend requests with the given configuration until the frontend
/// bridge closes.
///
/// Builds the page document with the notification region (the markup the
/// display expects to find) and binds a [`NotificationDisplay`] to it. Must
/// be called from within a tokio runtime; hide timers run on that runtime.
pub async fn serve(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    config: Config,
    config_path: Option<PathBuf>,
) {
    let document = Document::new();
    let forwarder = tokio::spawn(forward_region_mutations(
        document.subscribe(),
        config.region_id.clone(),
        tx.clone(),
    ));

    if let Err(error) = document.create_element(config.region_id.as_str()) {
        log::error!("Failed to mount the notification region: {error}");
    }

    let display = NotificationDisplay::new(
        document.clone(),
        config.region_id.clone(),
        config.hide_policy,
        tokio::runtime::Handle::current(),
    );

    let state = Arc::new(RwLock::new(State {
        config,
        config_path,
        document,
        display: Arc::new(display),
    }));

    let context = Arc::new(AppContext { state, tx });
    context.consume_bridge_messages(rx).await;
    forwarder.abort();
}

/// Loads the startup configuration from `config_path`.
///
/// The returned path is where later changes get saved. It is `None` when
/// there is no config directory or the file could not be loaded, so a file
/// the user wrote is never overwritten with defaults.
pub(crate) async fn load_startup_config(
    config_path: Option<PathBuf>,
) -> (Config, Option<PathBuf>) {
    let Some(config_path) = config_path else {
        return (Config::default(), None);
    };

    match crate::config::load_config_from(&config_path).await {
        Ok(config) => (config, Some(config_path)),
        Err(error) => {
            log::error!(
                "Failed to load config from {config_path:?}, using defaults that will not be saved: {error}"
            );
            (Config::default(), None)
        }
    }
}

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let config_path = match crate::config::default_config_path() {
        Ok(path) => Some(path),
        Err(error) => {
            log::error!("Failed to locate config, using defaults: {error}");
            None
        }
    };

    let (config, config_path) = load_startup_config(config_path).await;
    serve(rx, tx, config, config_path).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// The runtime is single threaded: the display, its hide timers and all
/// request handlers take turns on one thread. The returned handle finishes
/// once the frontend drops its sender.
pub fn run(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        runtime.block_on(async { setup_backend(rx, tx).await });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibar_bridge::BridgeChannels;
    use notibar_bridge::config::HidePolicy;
    use notibar_bridge::status::StatusLevel;
    use tempfile::tempdir;

    const USER_CONFIG: &str = "region_id = \"status-bar\"\nhide_policy = \"sometimes\"\n";

    #[tokio::test]
    async fn unreadable_config_is_never_overwritten() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, USER_CONFIG).expect("failed to write config");

        let (config, saved_to) = load_startup_config(Some(config_path.clone())).await;
        assert_eq!(config, Config::default());
        assert_eq!(saved_to, None);

        let channels = BridgeChannels::default();
        let backend = tokio::spawn(serve(
            channels.backend_rx,
            channels.backend_tx,
            config,
            saved_to,
        ));
        let mut rx = channels.frontend_rx;
        channels
            .frontend_tx
            .send(MessageToBackend::SelectHidePolicy(
                HidePolicy::IndependentTimers,
            ))
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            MessageFromBackend::Status(status) => {
                assert_eq!(status.level, StatusLevel::Warning);
                assert!(status.text.contains("not saved"));
            }
            other => panic!("unexpected message: {other:?}"),
        }

        drop(channels.frontend_tx);
        backend.await.unwrap();
        let contents = std::fs::read_to_string(&config_path).expect("failed to read config");
        assert_eq!(contents, USER_CONFIG);
    }

    #[tokio::test]
    async fn missing_config_is_created_and_kept_as_save_target() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let (config, saved_to) = load_startup_config(Some(config_path.clone())).await;
        assert_eq!(config, Config::default());
        assert_eq!(saved_to, Some(config_path.clone()));
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn no_config_dir_means_no_save_target() {
        let (config, saved_to) = load_startup_config(None).await;
        assert_eq!(config, Config::default());
        assert_eq!(saved_to, None);
    }
}
