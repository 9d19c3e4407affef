/// How serious a backend status message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Neutral information, e.g. a setting was applied.
    Info,
    /// Something went wrong but the backend keeps working.
    Warning,
    /// A request failed outright.
    Error,
}

/// Status report about the backend itself.
///
/// These never go through the notification region; the frontend reports them
/// alongside the region output (e.g. a config file that could not be saved).
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// Severity of the report.
    pub level: StatusLevel,
    /// Human-readable text.
    pub text: String,
}
