use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a message stays visible before the region hides again. Fixed,
/// not configurable.
pub const HIDE_DELAY: Duration = Duration::from_millis(3000);

/// Point-in-time view of the notification region, sent to the frontend
/// whenever the region's text or visibility changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionSnapshot {
    /// Identifier of the region element in the backend's document.
    pub id: String,
    /// Current text content, verbatim.
    pub text: String,
    /// Whether the region currently renders on screen.
    pub visible: bool,
    /// The region rendered as HTML markup, with its text escaped.
    pub html: String,
}
