//! Environment variables consulted by the resolver, captured in one place.

/// Fake physical core count, for deterministic runs.
pub const NCPUS_FAKE: &str = "NCPUS_FAKE";
/// Keeps scratch directories after the run when set to a non-empty value.
pub const CADO_DEBUG: &str = "CADO_DEBUG";

/// Snapshot of the environment variables the pipeline reads.
///
/// Stages take this by reference instead of calling `std::env` directly,
/// so tests can describe an environment without mutating the process one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnv {
    ncpus_fake: Option<String>,
    debug: bool,
}

impl RuntimeEnv {
    /// An environment with neither variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the variables from the current process.
    pub fn from_process() -> Self {
        Self {
            ncpus_fake: std::env::var(NCPUS_FAKE).ok(),
            debug: std::env::var_os(CADO_DEBUG).is_some_and(|v| !v.is_empty()),
        }
    }

    /// Set the raw `NCPUS_FAKE` value.
    pub fn with_fake_cores(mut self, value: impl Into<String>) -> Self {
        self.ncpus_fake = Some(value.into());
        self
    }

    /// Set whether `CADO_DEBUG` is on.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The faked core count, if set and parseable.
    pub fn fake_cores(&self) -> Option<u32> {
        self.ncpus_fake.as_deref()?.trim().parse().ok()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}
