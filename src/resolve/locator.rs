//! Default parameter-file discovery.
//!
//! Shipped parameter files live under the data root as
//! `factor/params.c<digits>` and `dlp/params.p<digits>`, optionally suffixed
//! with `dd<degree>` for finite-field extensions.

use std::path::{Path, PathBuf};

use crate::error::ResolveError;
use crate::number::InputNumber;

/// Kind of computation, which selects the parameter-file family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Factor,
    DiscreteLog,
}

impl Mode {
    pub fn from_dlp_flag(dlp: bool) -> Self {
        if dlp {
            Self::DiscreteLog
        } else {
            Self::Factor
        }
    }

    fn subdirectory(self) -> &'static str {
        match self {
            Self::Factor => "factor",
            Self::DiscreteLog => "dlp",
        }
    }

    fn letter(self) -> char {
        match self {
            Self::Factor => 'c',
            Self::DiscreteLog => 'p',
        }
    }
}

/// Candidate names (without the `params.` prefix), exact size first, then
/// the nearest multiple of five with ties rounding up.
pub fn candidate_names(n: &InputNumber, mode: Mode, gfpext: u32) -> Vec<String> {
    let size = n.digits();
    let rounded = (size + 2) / 5 * 5;

    let mut names = Vec::with_capacity(2);
    for s in [size, rounded] {
        let mut name = format!("{}{}", mode.letter(), s);
        if gfpext != 0 {
            name.push_str(&format!("dd{gfpext}"));
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Find the shipped parameter file for `n` under `data_root`.
pub fn find_default_parameter_file(
    data_root: &Path,
    n: &InputNumber,
    mode: Mode,
    gfpext: u32,
) -> Result<PathBuf, ResolveError> {
    let dir = data_root.join(mode.subdirectory());
    let attempts = candidate_names(n, mode, gfpext);
    tracing::debug!(
        "Looking for parameter file for {} in directory {}",
        attempts[0],
        dir.display()
    );

    for name in &attempts {
        let path = dir.join(format!("params.{name}"));
        if path.is_file() {
            tracing::info!("Using default parameter file {}", path.display());
            return Ok(path);
        }
    }

    Err(ResolveError::ParameterFileNotFound {
        primary: attempts[0].clone(),
        tried: attempts,
    })
}
