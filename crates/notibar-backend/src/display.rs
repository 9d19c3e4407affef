//! The notification display primitive.
//!
//! [`NotificationDisplay::show`] writes a message into the region, makes it
//! visible and schedules a hide [`HIDE_DELAY`] later on the injected tokio
//! runtime. The call never awaits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notibar_bridge::config::HidePolicy;
use notibar_dom::{Display, Document, DomError, ElementHandle};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

pub use notibar_bridge::region::HIDE_DELAY;

/// Errors returned by [`NotificationDisplay::show`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// The region could not be found in the document.
    #[error("notification region unavailable: {0}")]
    Lookup(#[from] DomError),
}

/// Handle to a scheduled hide.
///
/// Dropping the handle does not cancel the hide.
#[derive(Debug, Clone)]
pub struct HideTimer {
    task: Arc<AbortHandle>,
}

impl HideTimer {
    /// Cancels the hide if it has not fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the hide has completed or its cancellation has been processed
    /// by the runtime. Right after [`HideTimer::cancel`] this may still be
    /// `false`.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Debug)]
struct PendingHide {
    policy: HidePolicy,
    latest: Option<HideTimer>,
    /// Bumped on every successful `show`.
    generation: u64,
}

type SharedPending = Arc<Mutex<PendingHide>>;

fn lock_pending(pending: &SharedPending) -> MutexGuard<'_, PendingHide> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sleeps [`HIDE_DELAY`], then hides `region` unless a later `show` under
/// [`HidePolicy::RestartTimer`] superseded this one.
///
/// The check runs under the same lock `show` holds while writing, so a timer
/// whose abort came too late (multi-threaded runtimes) still cannot hide a
/// newer message.
async fn hide_after_delay(
    region: ElementHandle,
    pending: SharedPending,
    generation: u64,
    policy: HidePolicy,
) {
    tokio::time::sleep(HIDE_DELAY).await;
    let pending = lock_pending(&pending);
    if policy == HidePolicy::RestartTimer && pending.generation != generation {
        log::debug!("Skipping superseded hide of `{}`", region.id());
        return;
    }
    region.set_display(Display::None);
    log::debug!("Hid notification region `{}`", region.id());
}

/// Shows transient messages in a single document region.
#[derive(Debug)]
pub struct NotificationDisplay {
    document: Document,
    region_id: String,
    runtime: Handle,
    pending: SharedPending,
}

impl NotificationDisplay {
    /// Creates a display for the element `region_id` of `document`, scheduling
    /// hides on `runtime`.
    ///
    /// The region does not need to exist yet; it is looked up on every call.
    /// Any runtime flavor works; a superseded hide re-checks before it
    /// touches the region.
    pub fn new(
        document: Document,
        region_id: impl Into<String>,
        policy: HidePolicy,
        runtime: Handle,
    ) -> Self {
        Self {
            document,
            region_id: region_id.into(),
            runtime,
            pending: Arc::new(Mutex::new(PendingHide {
                policy,
                latest: None,
                generation: 0,
            })),
        }
    }

    fn pending(&self) -> MutexGuard<'_, PendingHide> {
        lock_pending(&self.pending)
    }

    /// Identifier of the region this display writes to.
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Current overlap behavior.
    pub fn hide_policy(&self) -> HidePolicy {
        self.pending().policy
    }

    /// Changes the overlap behavior for subsequent calls. Timers that are
    /// already scheduled keep running.
    pub fn set_hide_policy(&self, policy: HidePolicy) {
        self.pending().policy = policy;
    }

    /// Shows `message` in the region and schedules the region to hide after
    /// [`HIDE_DELAY`].
    ///
    /// The text is written verbatim. With [`HidePolicy::RestartTimer`] the
    /// hide scheduled by the previous call is cancelled first.
    pub fn show(&self, message: impl Into<String>) -> Result<HideTimer, DisplayError> {
        let region = match self.document.get_element_by_id(&self.region_id) {
            Ok(region) => region,
            Err(error) => {
                log::error!("Cannot show notification: {error}");
                return Err(error.into());
            }
        };

        let mut pending = self.pending();
        if pending.policy == HidePolicy::RestartTimer {
            if let Some(previous) = pending.latest.take() {
                previous.cancel();
            }
        }

        region.set_text_content(message);
        region.set_display(Display::Block);

        pending.generation += 1;
        let task = self.runtime.spawn(hide_after_delay(
            region,
            self.pending.clone(),
            pending.generation,
            pending.policy,
        ));

        let timer = HideTimer {
            task: Arc::new(task.abort_handle()),
        };
        log::debug!(
            "Showing notification in `{}`, hiding in {HIDE_DELAY:?}",
            self.region_id
        );
        pending.latest = Some(timer.clone());
        Ok(timer)
    }
}
