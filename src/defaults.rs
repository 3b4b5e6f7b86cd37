use crate::settings::Settings;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};

/// Output file used when no template is configured.
pub const DEFAULT_OUTPUT: &str = "input.txt";

/// Puzzles unlock at midnight UTC-5, all year round.
const RELEASE_OFFSET_SECS: i32 = 5 * 3600;

pub fn release_zone() -> Result<FixedOffset> {
    FixedOffset::west_opt(RELEASE_OFFSET_SECS).context("failed to load time zone information")
}

/// Midnight following `now` in the release zone.
pub fn next_release(now: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    let midnight = now
        .date_naive()
        .succ_opt()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .context("no release after the current date")?;
    now.timezone()
        .from_local_datetime(&midnight)
        .single()
        .context("ambiguous release time")
}

/// Fill unset year, day and output, returning the next release moment.
///
/// In wait mode year and day always point at the next release, whatever was
/// configured.
pub fn resolve(settings: &mut Settings, now: DateTime<Utc>) -> Result<DateTime<FixedOffset>> {
    let now = now.with_timezone(&release_zone()?);
    let next = next_release(now)?;

    if settings.year == 0 {
        settings.year = now.year().try_into().context("current year out of range")?;
    }
    if settings.day == 0 {
        settings.day = now.day();
    }
    if settings.output.is_empty() {
        settings.output = DEFAULT_OUTPUT.to_string();
    }

    if settings.wait {
        settings.year = next.year().try_into().context("release year out of range")?;
        settings.day = next.day();
    }

    Ok(next)
}
