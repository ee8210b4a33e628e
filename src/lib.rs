//! Top-level parameter resolution for a distributed NFS run.
//!
//! Turns a command line plus parameter files into one cooked parameter
//! hierarchy for the scheduler:
//!
//! ```text
//! argv → Classify → Resolve N/file/workdir → Apply options → Threads → Slaves
//! ```
//!
//! The stages live in [`args`], [`resolve`] and [`plan`]; [`args::cook_parameters`]
//! runs them in order.

pub mod args;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod number;
pub mod params;
pub mod plan;
pub mod resolve;

pub use args::{cook_parameters, ResolvedConfiguration};
pub use error::ResolveError;
pub use number::InputNumber;
pub use params::Parameters;
