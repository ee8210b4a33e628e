//! Token rule table: the one place free-form token precedence is decided.
//!
//! Rules are tried top to bottom and the first whose predicate holds
//! classifies the token. Numbers come first so that a numeric literal is
//! never taken for a path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::cli::Cli;
use crate::error::ResolveError;
use crate::number::InputNumber;

/// Named flags the free-form tokens may compete or conflict with.
#[derive(Debug, Clone, Default)]
pub struct ExplicitFlags {
    /// `--parameters`
    pub parameters: Option<PathBuf>,
    /// `--workdir`
    pub workdir: Option<PathBuf>,
    /// `--server-threads` was given.
    pub server_threads: bool,
    /// `--client-threads` was given.
    pub client_threads: bool,
    /// `--ell`, appended to the options as `ell=<value>`.
    pub ell: Option<String>,
}

impl From<&Cli> for ExplicitFlags {
    fn from(cli: &Cli) -> Self {
        Self {
            parameters: cli.parameters.clone(),
            workdir: cli.workdir.clone(),
            server_threads: cli.server_threads.is_some(),
            client_threads: cli.client_threads.is_some(),
            ell: cli.ell.clone(),
        }
    }
}

/// What a single token contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    Number(InputNumber),
    ParameterFile(PathBuf),
    Workdir(PathBuf),
    /// A `key=value` option, kept verbatim.
    Option(String),
}

/// Classification state visible to the rules while tokens are scanned.
#[derive(Debug, Clone, Copy)]
pub struct Scan<'a> {
    pub flags: &'a ExplicitFlags,
    /// Parameter-file candidates accepted so far, `--parameters` included.
    pub parameter_files: usize,
    /// Workdir candidates accepted so far, `--workdir` included.
    pub workdirs: usize,
}

/// One (predicate, action) pair of the table.
#[derive(Debug, Clone, Copy)]
pub struct TokenRule {
    /// Short name, used in debug logs.
    pub name: &'static str,
    pub description: &'static str,
    pub matches: fn(&str, &Scan<'_>) -> bool,
    pub classify: fn(&str, &Scan<'_>) -> Result<TokenClass, ResolveError>,
}

/// Build the ordered rule table.
pub fn token_rules() -> Vec<TokenRule> {
    vec![
        TokenRule {
            name: "number",
            description: "N=<digits> or bare digits",
            matches: |token, _| number_literal(token).is_some(),
            classify: |token, _| {
                let digits = number_literal(token).unwrap_or(token);
                digits
                    .parse()
                    .map(TokenClass::Number)
                    .map_err(|_| ResolveError::UnrecognizedArgument(token.to_string()))
            },
        },
        TokenRule {
            name: "parameter-file",
            description: "existing file, while no parameter file is known",
            matches: |token, scan| scan.parameter_files == 0 && Path::new(token).is_file(),
            classify: |token, _| Ok(TokenClass::ParameterFile(PathBuf::from(token))),
        },
        TokenRule {
            name: "workdir-path",
            description: "existing or creatable directory, while no workdir is known",
            matches: |token, scan| scan.workdirs == 0 && is_directory_location(Path::new(token)),
            classify: |token, _| Ok(TokenClass::Workdir(PathBuf::from(token))),
        },
        TokenRule {
            name: "workdir-option",
            description: "workdir=<dir> or tasks.workdir=<dir>",
            matches: |token, _| workdir_option(token).is_some(),
            classify: |token, _| {
                let dir = workdir_option(token).unwrap_or_default();
                Ok(TokenClass::Workdir(PathBuf::from(dir)))
            },
        },
        TokenRule {
            name: "option",
            description: "key=value, checked against the thread flags",
            matches: |token, _| token.contains('='),
            classify: |token, scan| {
                if scan.flags.server_threads && server_threads_option(token) {
                    return Err(ResolveError::conflict(format!(
                        "--server-threads conflicts with {token}"
                    )));
                }
                if scan.flags.client_threads && client_threads_option(token) {
                    return Err(ResolveError::conflict(format!(
                        "--client-threads conflicts with {token}"
                    )));
                }
                Ok(TokenClass::Option(token.to_string()))
            },
        },
        TokenRule {
            name: "surplus-path",
            description: "a second parameter file or workdir",
            matches: |token, _| {
                let path = Path::new(token);
                path.is_file() || is_directory_location(path)
            },
            classify: |token, _| {
                let message = if Path::new(token).is_file() {
                    format!(
                        "{token}: total of free-form files in command line \
                         and --parameters argument cannot exceed 1"
                    )
                } else {
                    format!(
                        "{token}: total of free-form directory paths in command line \
                         and --workdir argument cannot exceed 1"
                    )
                };
                Err(ResolveError::conflict(message))
            },
        },
    ]
}

/// The digits of `N=<digits>` or of a bare digit string.
fn number_literal(token: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(?:N=)?(\d+)$").expect("valid regex"));
    re.captures(token).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// The directory of the back-compatibility `(tasks.)workdir=<dir>` form.
fn workdir_option(token: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(?:tasks\.)?workdir=(.*)$").expect("valid regex"));
    re.captures(token).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn server_threads_option(token: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^tasks\.threads=").expect("valid regex"))
        .is_match(token)
}

fn client_threads_option(token: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^tasks\.(sieve|polyselect)(\.\w+)*\.threads=").expect("valid regex")
    })
    .is_match(token)
}

/// An existing directory, or a missing path whose parent exists.
fn is_directory_location(path: &Path) -> bool {
    path.is_dir() || (!path.exists() && path.parent().is_some_and(Path::exists))
}
