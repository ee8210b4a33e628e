//! Input resolution: which N, which parameter file, which working directory.

mod inputs;
mod locator;
mod purge;

pub use inputs::{resolve_inputs, DefaultFiles, ResolvedInputs};
pub use locator::{candidate_names, find_default_parameter_file, Mode};
pub use purge::{PurgeSet, Release};
