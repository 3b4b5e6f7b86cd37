use crate::cli::{Args, MISSING_SESSION_COOKIE_MESSAGE};
use crate::clock::{Clock, SystemClock};
use crate::config;
use crate::defaults;
use crate::download;
use crate::events::{ConsoleSink, EventSink};
use crate::settings::Settings;
use crate::template;
use crate::wait;
use anyhow::{Result, bail};
use std::path::Path;
use tracing::debug;

/// Run the downloader for the parsed command line.
pub fn run(args: &Args) -> Result<()> {
    let sources = config::default_candidates(args.config.as_deref());
    let mut settings = config::load(&sources)?;
    settings.merge(&args.overrides());

    let sink = ConsoleSink::new();
    run_with(settings, &config::base_url(), &SystemClock, &sink)
}

/// Everything after configuration loading, with the outside world injected.
pub fn run_with(
    mut settings: Settings,
    base_url: &str,
    clock: &dyn Clock,
    sink: &dyn EventSink,
) -> Result<()> {
    if settings.session_cookie.is_empty() {
        bail!(MISSING_SESSION_COOKIE_MESSAGE);
    }

    let release = defaults::resolve(&mut settings, clock.now())?;
    settings.output = template::render(&settings.output, settings.year, settings.day)?;
    debug!(
        year = settings.year,
        day = settings.day,
        output = %settings.output,
        force = settings.force,
        wait = settings.wait,
        "resolved settings"
    );

    // Checked before waiting so a conflict is reported right away.
    download::check_output(Path::new(&settings.output), settings.force)?;

    if settings.wait {
        wait::wait_until(release, wait::random_jitter(), clock, sink);
    }

    download::download(&settings, base_url, sink)
}
