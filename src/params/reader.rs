//! Line-oriented `key=value` parsing for parameter files and option lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Errors produced while reading parameters.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Failed to read parameter file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}:{line}: cannot parse '{text}' as key=value")]
    Syntax {
        origin: String,
        line: usize,
        text: String,
    },

    #[error("Parameter {key} is not set")]
    Missing { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

/// Returns true if `key` is a well-formed dotted parameter key.
pub fn is_valid_key(key: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("valid regex")
    });
    re.is_match(key)
}

/// Read every assignment from a parameter file, in file order.
pub fn read_file(path: &Path) -> Result<Vec<(String, String)>, ParamError> {
    let content = fs::read_to_string(path).map_err(|e| ParamError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_lines(content.lines(), &path.display().to_string())
}

/// Parse an ordered list of `key=value` options.
pub fn read_options<S: AsRef<str>>(options: &[S]) -> Result<Vec<(String, String)>, ParamError> {
    parse_lines(options.iter().map(AsRef::as_ref), "command line")
}

fn parse_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
    origin: &str,
) -> Result<Vec<(String, String)>, ParamError> {
    let mut assignments = Vec::new();
    for (idx, raw) in lines.enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let parsed = line.split_once('=').and_then(|(key, value)| {
            let key = key.trim();
            is_valid_key(key).then(|| (key.to_string(), value.trim().to_string()))
        });
        match parsed {
            Some(pair) => assignments.push(pair),
            None => {
                return Err(ParamError::Syntax {
                    origin: origin.to_string(),
                    line: idx + 1,
                    text: raw.to_string(),
                })
            }
        }
    }
    Ok(assignments)
}

/// Cut a `#` comment that starts the line or follows whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let parsed = parse_lines(
            ["# hello, world", "", "  tasks.threads = 4  # four", "name=c60"].into_iter(),
            "test",
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                ("tasks.threads".to_string(), "4".to_string()),
                ("name".to_string(), "c60".to_string()),
            ]
        );
    }

    #[test]
    fn hash_inside_value_is_kept() {
        let parsed = parse_lines(["slaves.hostnames=a#b"].into_iter(), "test").unwrap();
        assert_eq!(parsed[0].1, "a#b");
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = parse_lines(["N=1", "garbage"].into_iter(), "params.c60").unwrap_err();
        assert!(matches!(err, ParamError::Syntax { line: 2, .. }));
        assert!(err.to_string().starts_with("params.c60:2:"));
    }

    #[test]
    fn malformed_key_is_rejected() {
        assert!(parse_lines(["tasks..threads=2"].into_iter(), "test").is_err());
        assert!(parse_lines(["=2"].into_iter(), "test").is_err());
    }

    #[test]
    fn empty_value_is_allowed() {
        let parsed = read_options(&["slaves.scriptpath="]).unwrap();
        assert_eq!(parsed[0], ("slaves.scriptpath".to_string(), String::new()));
    }
}
