//! Installation layout: where parameter files, binaries and scripts live.
//!
//! ```toml
//! [paths]
//! data = "/usr/local/share/cado-nfs/parameters"
//! lib = "/usr/local/lib/cado-nfs"
//! bin = "/usr/local/bin"
//! source = "/home/me/cado-nfs"   # optional
//! ```

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Layout, Paths};
