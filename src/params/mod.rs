//! Parameter hierarchy and its on-disk `key=value` format.
//!
//! Parameter files hold one assignment per line with dot-separated keys:
//!
//! ```text
//! # c60 defaults
//! tasks.threads = 4
//! tasks.sieve.threads = 2
//! slaves.hostnames = localhost
//! ```

mod hierarchy;
mod reader;

pub use hierarchy::Parameters;
pub use reader::{is_valid_key, ParamError};
