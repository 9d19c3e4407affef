use std::fmt::Write;
use std::time::Duration;

use notibar_bridge::region::RegionSnapshot;

/// Formats a time offset since the frontend started as `+S.mmms`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut out = String::with_capacity(10);
    // writing into a String cannot fail
    let _ = write!(
        &mut out,
        "+{}.{:03}s",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    );
    out
}

/// Formats one line of console output for a region update.
pub fn format_region_line(elapsed: Duration, region: &RegionSnapshot) -> String {
    let state = if region.visible { "shown" } else { "hidden" };
    format!("[{}] {state:<6} {}", format_elapsed(elapsed), region.html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_padded_to_milliseconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "+0.000s");
        assert_eq!(format_elapsed(Duration::from_millis(3005)), "+3.005s");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "+61.000s");
    }

    #[test]
    fn region_line_includes_state_and_markup() {
        let region = RegionSnapshot {
            id: "notification".to_string(),
            text: "Buddy request sent!".to_string(),
            visible: true,
            html: "<div id=\"notification\" style=\"display: block\">Buddy request sent!</div>"
                .to_string(),
        };

        assert_eq!(
            format_region_line(Duration::from_millis(1000), &region),
            "[+1.000s] shown  <div id=\"notification\" style=\"display: block\">Buddy request sent!</div>"
        );
    }
}
