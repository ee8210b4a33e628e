//! Command-line surface (the raw invocation).

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Integer factorization or GF(p) discrete logarithms with the Number Field Sieve.
#[derive(Parser, Debug, Clone)]
#[command(name = "cado-toplevel", version, about, long_about = None)]
pub struct Cli {
    /// Screen logging level, e.g., INFO/COMMAND/DEBUG
    #[arg(long, value_name = "LEVEL", default_value = "INFO")]
    pub screenlog: LogLevel,

    /// Log file logging level, e.g., INFO/COMMAND/DEBUG
    #[arg(long, value_name = "LEVEL", default_value = "DEBUG")]
    pub filelog: LogLevel,

    /// A file with the parameters to use
    #[arg(short = 'p', long)]
    pub parameters: Option<PathBuf>,

    /// Options as in parameter file (format: key=value), N, a parameter
    /// file, or a working directory
    #[arg(value_name = "OPTION")]
    pub options: Vec<String>,

    /// Aliases (and conflicts with) tasks.workdir. Created if it does not
    /// exist; a temporary directory is used if unspecified anywhere.
    #[arg(short = 'w', long, visible_alias = "wdir")]
    pub workdir: Option<PathBuf>,

    /// Number of threads for sieving and polynomial selection jobs
    #[arg(long)]
    pub client_threads: Option<u32>,

    /// Aliases (and conflicts with) tasks.threads. NCORES may be "all",
    /// the number of physical cores of the current node.
    #[arg(short = 't', long, value_name = "NCORES")]
    pub server_threads: Option<ServerThreads>,

    /// Aliases (and conflicts with) slaves.nrclients
    #[arg(short = 's', long)]
    pub slaves: Option<u32>,

    /// Degree of the finite field extension (DLP only)
    #[arg(long, default_value_t = 0)]
    pub gfpext: u32,

    /// Aliases (and conflicts with) ell in parameter files
    #[arg(long)]
    pub ell: Option<String>,

    /// Run a bare server, do not start any clients
    #[arg(long)]
    pub server: bool,

    /// Run discrete logarithm computation instead
    #[arg(long)]
    pub dlp: bool,

    /// Enable very verbose parameter parsing
    #[arg(long)]
    pub verboseparam: bool,

    /// Turn off colored output
    #[arg(long)]
    pub no_colors: bool,

    /// Installation layout file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
}

/// Flags historically spelled with a single dash.
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[
    ("-gfpext", "--gfpext"),
    ("-dlp", "--dlp"),
    ("-ell", "--ell"),
];

impl Cli {
    /// Parse an argv (program name first), accepting the single-dash
    /// spellings `-gfpext`, `-dlp` and `-ell`.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_single_dash(args))
    }
}

/// Rewrite single-dash long flags to their `--` form, up to a `--` separator.
fn normalize_single_dash<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut seen_separator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if seen_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                seen_separator = true;
                return arg;
            }
            for (short, long) in SINGLE_DASH_FLAGS {
                if text == *short {
                    return OsString::from(*long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

/// Requested server thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerThreads {
    /// One thread per physical core of this node.
    All,
    Count(u32),
}

impl FromStr for ServerThreads {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Count)
            .map_err(|_| format!("expected a thread count or \"all\", got '{s}'"))
    }
}

/// Logging levels, in the vocabulary of the computation's own logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    /// Shell commands issued by the scheduler.
    Command,
    Debug,
    /// Client/server message traffic.
    Transaction,
}

impl LogLevel {
    /// Closest `tracing` filter.
    pub fn filter(self) -> LevelFilter {
        match self {
            Self::Critical | Self::Error => LevelFilter::ERROR,
            Self::Warning => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Command | Self::Debug => LevelFilter::DEBUG,
            Self::Transaction => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Self::Critical),
            "ERROR" => Ok(Self::Error),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "INFO" => Ok(Self::Info),
            "COMMAND" => Ok(Self::Command),
            "DEBUG" => Ok(Self::Debug),
            "TRANSACTION" | "TRACE" => Ok(Self::Transaction),
            _ => Err(format!("unknown log level '{s}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Command => "COMMAND",
            Self::Debug => "DEBUG",
            Self::Transaction => "TRANSACTION",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["cado-toplevel"];
        argv.extend_from_slice(args);
        Cli::try_parse_args(argv).unwrap()
    }

    #[test]
    fn single_dash_flags_are_accepted() {
        let cli = parse(&["-dlp", "-gfpext", "2", "-ell=101", "12345"]);
        assert!(cli.dlp);
        assert_eq!(cli.gfpext, 2);
        assert_eq!(cli.ell.as_deref(), Some("101"));
        assert_eq!(cli.options, vec!["12345"]);
    }

    #[test]
    fn flags_interleave_with_options() {
        let cli = parse(&["-p", "/dev/null", "12345", "slaves.hostnames=foo,bar", "-w", "/tmp/x"]);
        assert_eq!(cli.parameters, Some(PathBuf::from("/dev/null")));
        assert_eq!(cli.workdir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.options, vec!["12345", "slaves.hostnames=foo,bar"]);
    }

    #[test]
    fn wdir_alias_and_defaults() {
        let cli = parse(&["--wdir", "/tmp/y"]);
        assert_eq!(cli.workdir, Some(PathBuf::from("/tmp/y")));
        assert_eq!(cli.screenlog, LogLevel::Info);
        assert_eq!(cli.filelog, LogLevel::Debug);
        assert_eq!(cli.gfpext, 0);
        assert!(!cli.server);
    }

    #[test]
    fn server_threads_values() {
        assert_eq!(parse(&["-t", "all"]).server_threads, Some(ServerThreads::All));
        assert_eq!(
            parse(&["--server-threads", "4"]).server_threads,
            Some(ServerThreads::Count(4))
        );
        assert!(Cli::try_parse_args(["cado-toplevel", "-t", "lots"]).is_err());
    }

    #[test]
    fn log_levels_are_case_insensitive() {
        assert_eq!(parse(&["--screenlog", "warning"]).screenlog, LogLevel::Warning);
        assert_eq!("command".parse::<LogLevel>().unwrap().filter(), LevelFilter::DEBUG);
        assert!("LOUD".parse::<LogLevel>().is_err());
    }
}
