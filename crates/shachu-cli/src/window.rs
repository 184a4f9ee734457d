//! Overnight window resolution for CLI runs.

use anyhow::Context;
use chrono::{DateTime, Days, FixedOffset, Utc};

use shachu_core::OvernightWindow;

const JST_OFFSET_SECS: i32 = 9 * 3600;
const DEFAULT_ENTRY_HOUR: u32 = 18;
pub(crate) const DEFAULT_DURATION_MINUTES: u32 = 840;

/// The next 18:00 in JST strictly after `now`.
pub(crate) fn default_start(now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS)?;
    let local = now.with_timezone(&jst).naive_local();
    let today = local.date().and_hms_opt(DEFAULT_ENTRY_HOUR, 0, 0)?;
    let start = if local < today {
        today
    } else {
        today.checked_add_days(Days::new(1))?
    };
    start.and_local_timezone(jst).single()
}

/// Builds the window from an optional RFC 3339 start and a duration.
///
/// # Errors
///
/// Returns an error if `start` does not parse or `duration_minutes` is zero.
pub(crate) fn resolve_window(
    start: Option<&str>,
    duration_minutes: u32,
    now: DateTime<Utc>,
) -> anyhow::Result<OvernightWindow> {
    if duration_minutes == 0 {
        anyhow::bail!("--duration-minutes must be at least 1");
    }

    let start_time = match start {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--start '{raw}' is not an RFC 3339 timestamp"))?,
        None => default_start(now).context("could not compute the default entry time")?,
    };

    Ok(OvernightWindow {
        start_time,
        duration_minutes,
    })
}
