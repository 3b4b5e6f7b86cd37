use serde::Deserialize;

/// Settings accumulated across config files and command line flags.
///
/// Zero and empty values mean "unset" until the default resolver fills them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Session cookie authenticating the download.
    #[serde(deserialize_with = "null_as_default")]
    pub session_cookie: String,
    /// Output file, a template until rendered.
    #[serde(deserialize_with = "null_as_default")]
    pub output: String,
    /// Puzzle year (0 = unset).
    #[serde(deserialize_with = "null_as_default")]
    pub year: u32,
    /// Puzzle day of month (0 = unset).
    #[serde(deserialize_with = "null_as_default")]
    pub day: u32,
    /// Overwrite an existing output file. Only settable from flags.
    #[serde(skip)]
    pub force: bool,
    /// Wait for the next release before downloading. Only settable from flags.
    #[serde(skip)]
    pub wait: bool,
}

impl Settings {
    /// Overlay `other` onto `self`: non-empty strings and non-zero numbers
    /// replace the current value, flags are only ever switched on.
    pub fn merge(&mut self, other: &Settings) {
        if !other.session_cookie.is_empty() {
            self.session_cookie.clone_from(&other.session_cookie);
        }
        if !other.output.is_empty() {
            self.output.clone_from(&other.output);
        }
        if other.year != 0 {
            self.year = other.year;
        }
        if other.day != 0 {
            self.day = other.day;
        }
        self.force |= other.force;
        self.wait |= other.wait;
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
