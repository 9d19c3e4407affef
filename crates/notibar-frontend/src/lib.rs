//! Console frontend.
//!
//! Plays a short script of messages against the backend, one every
//! `interval`, and prints each change of the notification region as it
//! arrives over the bridge. The run ends once the last message's display
//! window has passed.

use std::time::Duration;

use anyhow::Context;
use notibar_bridge::config::HidePolicy;
use notibar_bridge::region::{HIDE_DELAY, RegionSnapshot};
use notibar_bridge::status::StatusLevel;
use notibar_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

pub mod formatting;

/// Extra time to wait past the last hide so its update can be printed.
const SETTLE_DELAY: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    pub async fn show(&self, message: impl Into<String>) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::Show(message.into()))
            .await
            .context("failed to request a notification")
    }

    pub async fn request_config(&self) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::ConfigurationRequest)
            .await
            .context("failed to request config")
    }

    pub async fn request_region_snapshot(&self) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::RegionSnapshotRequest)
            .await
            .context("failed to request the region state")
    }

    pub async fn select_hide_policy(&self, policy: HidePolicy) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::SelectHidePolicy(policy))
            .await
            .context("failed to select the hide policy")
    }
}

/// What the console frontend should play.
#[derive(Debug, Clone)]
pub struct FrontendOptions {
    /// Messages to show, in order.
    pub messages: Vec<String>,
    /// Delay between consecutive messages.
    pub interval: Duration,
    /// Overlap behavior to select before the first message, if any.
    pub hide_policy: Option<HidePolicy>,
}

/// Plays `options` against the backend and returns every region update that
/// was received, in order.
pub async fn drive(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
    options: FrontendOptions,
) -> anyhow::Result<Vec<RegionSnapshot>> {
    let bridge = BackendBridge { to_backend: tx };
    if let Some(policy) = options.hide_policy {
        bridge.select_hide_policy(policy).await?;
    }
    bridge.request_config().await?;
    bridge.request_region_snapshot().await?;

    let started = Instant::now();
    let mut script = options.messages.into_iter();
    let mut pending = script.next();
    let mut next_show_at = started;
    let mut finish_at = started + SETTLE_DELAY;
    let mut updates = Vec::new();

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    log::warn!("Backend closed the bridge");
                    break;
                };
                match message {
                    MessageFromBackend::RegionUpdated(region) => {
                        println!("{}", formatting::format_region_line(started.elapsed(), &region));
                        updates.push(region);
                    }
                    MessageFromBackend::ShowFailed { message, reason } => {
                        log::error!("Could not show {message:?}: {reason}");
                    }
                    MessageFromBackend::ConfigurationResponse(config) => {
                        log::info!(
                            "Backend uses region `{}` with {} hide policy",
                            config.region_id,
                            config.hide_policy
                        );
                    }
                    MessageFromBackend::Status(status) => match status.level {
                        StatusLevel::Error => log::error!("{}", status.text),
                        StatusLevel::Warning => log::warn!("{}", status.text),
                        StatusLevel::Info => log::info!("{}", status.text),
                    },
                }
            }
            _ = sleep_until(next_show_at), if pending.is_some() => {
                if let Some(message) = pending.take() {
                    bridge.show(message).await?;
                }
                let now = Instant::now();
                next_show_at = now + options.interval;
                finish_at = now + HIDE_DELAY + SETTLE_DELAY;
                pending = script.next();
            }
            _ = sleep_until(finish_at), if pending.is_none() => break,
        }
    }

    Ok(updates)
}

/// Runs the console frontend on its own single-threaded runtime.
pub fn run(
    rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
    options: FrontendOptions,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let updates = runtime.block_on(drive(rx, tx, options))?;
    log::debug!("Received {} region updates", updates.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibar_bridge::BridgeChannels;
    use notibar_bridge::config::Config;

    fn start_backend(
        config: Config,
    ) -> (mpsc::Receiver<MessageFromBackend>, mpsc::Sender<MessageToBackend>) {
        let BridgeChannels {
            frontend_rx,
            frontend_tx,
            backend_rx,
            backend_tx,
        } = BridgeChannels::default();
        tokio::spawn(notibar_backend::serve(backend_rx, backend_tx, config, None));
        (frontend_rx, frontend_tx)
    }

    fn options(messages: &[&str], interval_ms: u64, policy: HidePolicy) -> FrontendOptions {
        FrontendOptions {
            messages: messages.iter().map(|m| m.to_string()).collect(),
            interval: Duration::from_millis(interval_ms),
            hide_policy: Some(policy),
        }
    }

    fn states(updates: &[RegionSnapshot]) -> Vec<(String, bool)> {
        updates
            .iter()
            .map(|update| (update.text.clone(), update.visible))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn single_message_is_shown_then_hidden() {
        let (rx, tx) = start_backend(Config::default());

        let updates = drive(
            rx,
            tx,
            options(&["Buddy request sent!"], 1000, HidePolicy::RestartTimer),
        )
        .await
        .unwrap();

        assert_eq!(
            states(&updates),
            vec![
                (String::new(), false),
                ("Buddy request sent!".to_string(), false),
                ("Buddy request sent!".to_string(), true),
                ("Buddy request sent!".to_string(), false),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_policy_hides_once_after_last_message() {
        let (rx, tx) = start_backend(Config::default());

        let updates = drive(
            rx,
            tx,
            options(&["A", "B"], 1000, HidePolicy::RestartTimer),
        )
        .await
        .unwrap();

        assert_eq!(
            states(&updates),
            vec![
                (String::new(), false),
                ("A".to_string(), false),
                ("A".to_string(), true),
                ("B".to_string(), true),
                ("B".to_string(), false),
            ]
        );
    }
}
