use crate::clock::Clock;
use crate::events::{EventSink, UiEvent};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Bounds of the random delay added after the release moment, in milliseconds.
pub const MIN_JITTER_MS: u64 = 2_000;
pub const MAX_JITTER_MS: u64 = 30_000;

const COARSE_POLL: Duration = Duration::from_millis(200);
const FINE_POLL: Duration = Duration::from_millis(20);

/// Random delay in `[MIN_JITTER_MS, MAX_JITTER_MS]`.
pub fn random_jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(MIN_JITTER_MS..=MAX_JITTER_MS))
}

/// Block until `target + jitter` has passed, showing a countdown.
///
/// The first phase counts down to `target` in whole seconds (rounded up),
/// the second phase counts down the jitter in tenths of a second.
pub fn wait_until<Tz: TimeZone>(
    target: DateTime<Tz>,
    jitter: Duration,
    clock: &dyn Clock,
    sink: &dyn EventSink,
) {
    let target = target.with_timezone(&Utc);
    let jitter_ms = i64::try_from(jitter.as_millis()).unwrap_or(i64::MAX);
    let jitter_secs = jitter_ms as f64 / 1000.0;
    debug!(%target, jitter_ms, "waiting for release");

    let mut shown = None;
    loop {
        let remaining = (target - clock.now()).num_milliseconds();
        if remaining < 0 {
            break;
        }
        let total_secs = (remaining + 999) / 1000;
        let hms = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);
        if shown != Some(hms) {
            shown = Some(hms);
            sink.send(UiEvent::Countdown(format!(
                "{:02}:{:02}:{:02} + {:04.1}s",
                hms.0, hms.1, hms.2, jitter_secs
            )));
        }
        clock.sleep(COARSE_POLL);
    }

    let target = target + TimeDelta::milliseconds(jitter_ms);
    let mut shown = None;
    loop {
        let remaining = (target - clock.now()).num_milliseconds();
        if remaining < 0 {
            break;
        }
        if shown != Some(remaining) {
            shown = Some(remaining);
            sink.send(UiEvent::Countdown(format!(
                "00:00:00 + {:04.1}s",
                remaining as f64 / 1000.0
            )));
        }
        clock.sleep(FINE_POLL);
    }

    sink.send(UiEvent::CountdownFinished);
}
