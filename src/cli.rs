use crate::settings::Settings;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

pub const TITLE_ABOUT_MESSAGE: &str = "\
Advent of Code Downloader

aocdl is a command line utility that automatically downloads your Advent of Code
puzzle inputs.
";

pub const USAGE_MESSAGE: &str = "\
Usage:

\taocdl [options]

Options:

\t-session-cookie 0123456789...abcdef
\t\tUse the specified string as session cookie.

\t-output input.txt
\t\tSave the downloaded puzzle input to the specified file. The special
\t\tmarkers {{.Year}} and {{.Day}} will be replaced with the selected year
\t\tand day.

\t-year 2000
\t-day 24
\t\tDownload the input from the specified year or day. By default the
\t\tcurrent year and day is used.

\t-force
\t\tOverwrite file if it already exists.

\t-wait
\t\tIf this flag is specified, year and day are ignored and the program
\t\twaits until midnight (when new puzzles are released) and then downloads
\t\tthe input of the new day. While waiting a countdown is displayed. To
\t\treduce load on the Advent of Code servers, the download is started after
\t\ta random delay between 2 and 30 seconds after midnight.

\t-config path/to/config.json
\t\tRead settings from the specified file instead of '.aocdlconfig' in the
\t\thome directory and the current directory.

\t-verbose
\t\tPrint debug logging to standard error (see also AOCDL_LOG).
";

pub const REPOSITORY_MESSAGE: &str = "\
Repository:

\thttps://github.com/GreenLightning/advent-of-code-downloader
";

pub const MISSING_SESSION_COOKIE_MESSAGE: &str = "\
No Session Cookie

A session cookie is required to download your personalized puzzle input.

Please provide your session cookie as a command line parameter:

aocdl -session-cookie 0123456789...abcdef

Or create a configuration file named '.aocdlconfig' in your home directory or in
the current directory and add the 'session-cookie' key:

{
\t\"session-cookie\": \"0123456789...abcdef\"
}
";

/// Flags whose value may follow as the next argument.
const VALUE_FLAGS: &[&str] = &["session-cookie", "output", "year", "day", "config"];

/// Long flag names accepted with a single leading dash.
const LONG_FLAGS: &[&str] = &[
    "session-cookie",
    "output",
    "year",
    "day",
    "force",
    "wait",
    "config",
    "verbose",
    "help",
];

/// Command line flags. Unset flags leave configuration file values alone.
#[derive(Parser, Debug, Default)]
#[command(name = "aocdl", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    #[arg(long, value_name = "COOKIE", allow_hyphen_values = true)]
    pub session_cookie: Option<String>,

    #[arg(long, value_name = "TEMPLATE", allow_hyphen_values = true)]
    pub output: Option<String>,

    #[arg(long)]
    pub year: Option<u32>,

    #[arg(long)]
    pub day: Option<u32>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub force: bool,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub wait: bool,

    /// Explicit configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub verbose: bool,

    #[arg(short = 'h', long)]
    pub help: bool,
}

pub enum Invocation {
    Run(Args),
    Help,
}

impl Args {
    /// Settings carried by the flags, to be merged over the file settings.
    pub fn overrides(&self) -> Settings {
        Settings {
            session_cookie: self.session_cookie.clone().unwrap_or_default(),
            output: self.output.clone().unwrap_or_default(),
            year: self.year.unwrap_or(0),
            day: self.day.unwrap_or(0),
            force: self.force,
            wait: self.wait,
        }
    }
}

/// Parse the full argument list (program name first).
pub fn parse<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = Args::try_parse_from(normalize(args))?;
    if args.help {
        Ok(Invocation::Help)
    } else {
        Ok(Invocation::Run(args))
    }
}

/// One line description of a parse failure, without clap's own usage block.
pub fn error_summary(err: &clap::Error) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

/// Rewrite `-flag` and `-flag=value` into the double dash form clap expects.
///
/// The argument following a value flag is its value and is never rewritten.
fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut terminated = false;
    let mut value_next = false;
    args.into_iter()
        .map(Into::<OsString>::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || terminated || std::mem::take(&mut value_next) {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                terminated = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(body) if !body.starts_with('-') => {
                    let name = body.split('=').next().unwrap_or(body);
                    if LONG_FLAGS.contains(&name) {
                        value_next = VALUE_FLAGS.contains(&name) && !body.contains('=');
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
