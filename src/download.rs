use crate::events::{EventSink, UiEvent};
use crate::settings::Settings;
use anyhow::{Context, Result, bail};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, info};
use ureq::http::StatusCode;

pub const USER_AGENT: &str = "github.com/GreenLightning/advent-of-code-downloader";

fn already_exists(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "file '{}' already exists; use '-force' to overwrite",
        path.display()
    )
}

/// Reject output paths that cannot be written under the overwrite policy.
pub fn check_output(path: &Path, force: bool) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => bail!(
            "cannot write to '{}' because it is a directory",
            path.display()
        ),
        Ok(_) if !force => Err(already_exists(path)),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to check output file '{}'", path.display())),
    }
}

/// Open the output file: truncate when forced, otherwise create it exclusively.
pub fn open_output(path: &Path, force: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    match options.open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(already_exists(path)),
        Err(e) => Err(e).with_context(|| format!("failed to open '{}'", path.display())),
    }
}

pub fn input_url(base_url: &str, year: u32, day: u32) -> String {
    format!("{}/{}/day/{}/input", base_url.trim_end_matches('/'), year, day)
}

/// Download the puzzle input for `settings` into `settings.output`.
pub fn download(settings: &Settings, base_url: &str, sink: &dyn EventSink) -> Result<()> {
    let url = input_url(base_url, settings.year, settings.day);
    let dest = Path::new(&settings.output);
    debug!(%url, "requesting puzzle input");

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let resp = agent
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .header("Cookie", &format!("session={}", settings.session_cookie))
        .call()
        .with_context(|| format!("request to {url} failed"))?;

    if resp.status() != StatusCode::OK {
        bail!("{}", resp.status());
    }

    let total_size: Option<u64> = resp
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());

    let mut file = open_output(dest, settings.force)?;
    sink.send(UiEvent::DownloadStarted { total_bytes: total_size });

    let mut reader = resp.into_body().into_reader();
    let downloaded = copy_body(&mut reader, &mut file, dest, sink)?;
    sink.send(UiEvent::DownloadComplete { size_bytes: downloaded });
    info!(path = %dest.display(), bytes = downloaded, "saved puzzle input");
    Ok(())
}

/// Stream `reader` into `out` in 64 KiB chunks, reporting progress.
fn copy_body<R: Read, W: Write>(
    reader: &mut R,
    out: &mut W,
    dest: &Path,
    sink: &dyn EventSink,
) -> Result<u64> {
    let mut buffer = [0u8; 64 * 1024];
    let mut downloaded = 0u64;

    loop {
        let n = reader.read(&mut buffer).context("network read error")?;
        if n == 0 {
            break;
        }
        out.write_all(&buffer[..n])
            .with_context(|| format!("failed to write '{}'", dest.display()))?;
        downloaded += n as u64;
        sink.send(UiEvent::DownloadProgress { bytes_read: downloaded });
    }

    out.flush()
        .with_context(|| format!("failed to write '{}'", dest.display()))?;
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::recording::RecordingSink;
    use std::io;
    use tempfile::TempDir;

    /// Accepts writes, fails on flush.
    struct FlushFails(Vec<u8>);

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_copy_body_reports_progress() {
        let sink = RecordingSink::default();
        let mut out = Vec::new();
        let n = copy_body(&mut &b"puzzle data"[..], &mut out, Path::new("in.txt"), &sink).unwrap();

        assert_eq!(n, 11);
        assert_eq!(out, b"puzzle data");
        assert_eq!(
            sink.events.borrow().last(),
            Some(&UiEvent::DownloadProgress { bytes_read: 11 })
        );
    }

    #[test]
    fn test_copy_body_flush_error_names_file() {
        let sink = RecordingSink::default();
        let mut out = FlushFails(Vec::new());
        let err = copy_body(&mut &b"data"[..], &mut out, Path::new("day1.txt"), &sink).unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("failed to write 'day1.txt'"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_input_url() {
        assert_eq!(
            input_url("https://adventofcode.com", 2020, 1),
            "https://adventofcode.com/2020/day/1/input"
        );
        assert_eq!(
            input_url("http://127.0.0.1:8080/", 2015, 25),
            "http://127.0.0.1:8080/2015/day/25/input"
        );
    }

    #[test]
    fn test_check_output_missing_file_ok() {
        let dir = TempDir::new().unwrap();
        assert!(check_output(&dir.path().join("input.txt"), false).is_ok());
    }

    #[test]
    fn test_check_output_directory() {
        let dir = TempDir::new().unwrap();
        for force in [false, true] {
            let err = check_output(dir.path(), force).unwrap_err();
            assert!(err.to_string().contains("is a directory"));
        }
    }

    #[test]
    fn test_check_output_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "old").unwrap();

        let err = check_output(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists; use '-force'"));
        assert!(check_output(&path, true).is_ok());
    }

    #[test]
    fn test_open_output_exclusive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        open_output(&path, false).unwrap();

        let err = open_output(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_open_output_force_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "a much longer previous input").unwrap();

        let mut file = open_output(&path, true).unwrap();
        file.write_all(b"new").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
