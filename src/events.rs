use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::io::{self, Write};

// ── Events from the pipeline to the terminal ────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Replace the countdown line with this text.
    Countdown(String),
    /// Wait is over, remove the countdown line.
    CountdownFinished,

    DownloadStarted { total_bytes: Option<u64> },
    DownloadProgress { bytes_read: u64 },
    DownloadComplete { size_bytes: u64 },
}

/// Receiver of pipeline display events.
pub trait EventSink {
    fn send(&self, event: UiEvent);
}

// ── Console sink ────────────────────────────────────────────────────────────

/// Countdown on stdout, download progress bar on stderr.
pub struct ConsoleSink {
    pb: RefCell<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            pb: RefCell::new(None),
        }
    }

    fn make_pb(total: Option<u64>) -> ProgressBar {
        match total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("  {spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
                {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {bytes}") {
                    pb.set_style(style);
                }
                pb
            }
        }
    }

    fn redraw_line(text: &str) {
        let mut out = io::stdout();
        let _ = queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(text))
            .and_then(|_| out.flush());
    }
}

impl EventSink for ConsoleSink {
    fn send(&self, event: UiEvent) {
        match event {
            UiEvent::Countdown(text) => Self::redraw_line(&text),
            UiEvent::CountdownFinished => Self::redraw_line(""),

            UiEvent::DownloadStarted { total_bytes } => {
                *self.pb.borrow_mut() = Some(Self::make_pb(total_bytes));
            }
            UiEvent::DownloadProgress { bytes_read } => {
                if let Some(pb) = self.pb.borrow().as_ref() {
                    pb.set_position(bytes_read);
                }
            }
            UiEvent::DownloadComplete { size_bytes } => {
                if let Some(pb) = self.pb.borrow_mut().take() {
                    pb.set_position(size_bytes);
                    pb.finish_and_clear();
                }
            }
        }
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;

    /// Sink that keeps every event for inspection.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: RefCell<Vec<UiEvent>>,
    }

    impl EventSink for RecordingSink {
        fn send(&self, event: UiEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl RecordingSink {
        pub fn countdown_lines(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    UiEvent::Countdown(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }
}
