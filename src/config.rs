use crate::settings::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the home and working directories.
pub const CONFIG_FILE_NAME: &str = ".aocdlconfig";

/// Puzzle site queried when `AOCDL_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://adventofcode.com";

/// Environment variable overriding the puzzle site (mirrors, local testing).
pub const BASE_URL_ENV: &str = "AOCDL_BASE_URL";

/// Configuration files to read, lowest precedence first.
///
/// An explicit path replaces the default lookup. Otherwise the home directory
/// file is read, followed by the working directory file unless both
/// directories are known and identical.
pub fn candidate_paths(
    explicit: Option<&Path>,
    home: Option<&Path>,
    cwd: Option<&Path>,
) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(CONFIG_FILE_NAME));
    }
    let same_dir = matches!((home, cwd), (Some(h), Some(c)) if h == c);
    if !same_dir {
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
    }
    paths
}

/// Candidate list for the running process.
pub fn default_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let cwd = std::env::current_dir().ok();
    candidate_paths(explicit, home.as_deref(), cwd.as_deref())
}

/// Fold every existing file in `paths` into one `Settings`, later files winning.
pub fn load(paths: &[PathBuf]) -> Result<Settings> {
    let mut settings = Settings::default();
    for path in paths {
        if let Some(loaded) = load_file(path)? {
            debug!(path = %path.display(), "loaded configuration file");
            settings.merge(&loaded);
        } else {
            debug!(path = %path.display(), "no configuration file");
        }
    }
    Ok(settings)
}

/// Read one configuration file. `Ok(None)` if it does not exist.
pub fn load_file(path: &Path) -> Result<Option<Settings>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let settings = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(settings))
}

/// Base URL of the puzzle site, honoring `AOCDL_BASE_URL`.
pub fn base_url() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_replaces_lookup() {
        let paths = candidate_paths(
            Some(Path::new("/etc/aocdl.json")),
            Some(Path::new("/home/me")),
            Some(Path::new("/work")),
        );
        assert_eq!(paths, vec![PathBuf::from("/etc/aocdl.json")]);
    }

    #[test]
    fn test_home_then_cwd() {
        let paths = candidate_paths(None, Some(Path::new("/home/me")), Some(Path::new("/work")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/me/.aocdlconfig"),
                PathBuf::from(".aocdlconfig"),
            ]
        );
    }

    #[test]
    fn test_cwd_is_home() {
        let paths = candidate_paths(None, Some(Path::new("/home/me")), Some(Path::new("/home/me")));
        assert_eq!(paths, vec![PathBuf::from("/home/me/.aocdlconfig")]);
    }

    #[test]
    fn test_unknown_directories() {
        assert_eq!(candidate_paths(None, None, None), vec![PathBuf::from(".aocdlconfig")]);
        assert_eq!(
            candidate_paths(None, Some(Path::new("/home/me")), None),
            vec![
                PathBuf::from("/home/me/.aocdlconfig"),
                PathBuf::from(".aocdlconfig"),
            ]
        );
    }

    #[test]
    fn test_load_merges_in_order_and_skips_missing() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        fs::write(&first, r#"{"session-cookie":"abc","year":2018,"day":3}"#).unwrap();
        fs::write(&second, r#"{"year":2020,"output":"{{.Day}}.txt"}"#).unwrap();

        let settings = load(&[first, dir.path().join("missing.json"), second]).unwrap();
        assert_eq!(settings.session_cookie, "abc");
        assert_eq!(settings.year, 2020);
        assert_eq!(settings.day, 3);
        assert_eq!(settings.output, "{{.Day}}.txt");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&[path]).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn test_load_rejects_unreadable_path() {
        // A directory exists but cannot be read as a file.
        let dir = TempDir::new().unwrap();
        assert!(load_file(dir.path()).is_err());
    }
}
