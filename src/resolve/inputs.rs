//! N / parameter file / working directory resolution.
//!
//! | N given | file given | outcome |
//! |---------|------------|---------|
//! | yes | no  | shipped default file for the size of N |
//! | yes | yes | the file; its own N, if any, must agree |
//! | no  | no  | error: a parameter file is required |
//! | no  | yes | the file, which must define N |
//!
//! The workdir then comes from the command line, else the file, else a
//! fresh scratch directory registered for purging.

use std::fs;
use std::path::{Path, PathBuf};

use crate::args::ClassifiedArguments;
use crate::env::RuntimeEnv;
use crate::error::ResolveError;
use crate::number::InputNumber;
use crate::params::Parameters;
use crate::resolve::locator::{find_default_parameter_file, Mode};
use crate::resolve::purge::PurgeSet;

/// Where and how to look for a shipped parameter file.
#[derive(Debug, Clone)]
pub struct DefaultFiles {
    /// Data root holding `factor/` and `dlp/`.
    pub data_root: PathBuf,
    pub mode: Mode,
    /// Extension degree; 0 when not a finite-field extension.
    pub gfpext: u32,
}

/// Outcome of input resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub n: InputNumber,
    pub parameter_file: PathBuf,
    /// The parameter file was picked from the shipped defaults.
    pub using_default_parameter_file: bool,
    pub workdir: PathBuf,
}

/// Decide N and the parameter file, read the file into `params`, then
/// settle and create the working directory.
pub fn resolve_inputs(
    classified: &ClassifiedArguments,
    params: &mut Parameters,
    defaults: &DefaultFiles,
    env: &RuntimeEnv,
    purge: &mut PurgeSet,
) -> Result<ResolvedInputs, ResolveError> {
    let given_n = classified.n.as_ref().filter(|n| !n.is_zero());
    let (n, parameter_file, using_default_parameter_file) =
        match (given_n, &classified.parameters) {
            (Some(n), parameters) => {
                let (file, using_default) = match parameters {
                    Some(file) => (file.clone(), false),
                    None => (
                        find_default_parameter_file(
                            &defaults.data_root,
                            n,
                            defaults.mode,
                            defaults.gfpext,
                        )?,
                        true,
                    ),
                };
                params.read_file(&file)?;
                check_stored_n(params, n, &file)?;
                params.set("N", n);
                (n.clone(), file, using_default)
            }
            (None, None) => {
                return Err(ResolveError::missing(
                    "if N is not given, a parameter file is required",
                ))
            }
            (None, Some(file)) => {
                params.read_file(file)?;
                let n = params
                    .get_as::<InputNumber>("N")?
                    .filter(|n| !n.is_zero())
                    .ok_or_else(|| {
                        ResolveError::missing(format!("{} must define N", file.display()))
                    })?;
                (n, file.clone(), false)
            }
        };

    let workdir = resolve_workdir(classified.workdir.as_deref(), params, env, purge)?;

    Ok(ResolvedInputs {
        n,
        parameter_file,
        using_default_parameter_file,
        workdir,
    })
}

/// A file that also records N must record the same N.
fn check_stored_n(params: &Parameters, n: &InputNumber, file: &Path) -> Result<(), ResolveError> {
    let Some(stored) = params.get("tasks.N") else {
        return Ok(());
    };
    match stored.parse::<InputNumber>() {
        Ok(previous) if previous == *n => Ok(()),
        _ => Err(ResolveError::inconsistent(format!(
            "given N {} differs from N={} stored in {}",
            n,
            stored,
            file.display()
        ))),
    }
}

fn resolve_workdir(
    explicit: Option<&Path>,
    params: &mut Parameters,
    env: &RuntimeEnv,
    purge: &mut PurgeSet,
) -> Result<PathBuf, ResolveError> {
    if let Some(dir) = explicit {
        params.set("tasks.workdir", dir.display());
    }

    let workdir = match params.get("tasks.workdir") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let dir = tempfile::Builder::new()
                .prefix("cado.")
                .tempdir()
                .map_err(|e| ResolveError::Io {
                    action: "create temporary directory in",
                    path: std::env::temp_dir(),
                    source: e,
                })?
                .keep();
            tracing::info!("Created temporary directory {}", dir.display());
            params.set("tasks.workdir", dir.display());
            purge.register(&dir);
            if env.debug() {
                tracing::info!("CADO_DEBUG is on, data will be kept in {}", dir.display());
            }
            dir
        }
    };

    if !workdir.is_dir() {
        fs::create_dir_all(&workdir).map_err(|e| ResolveError::Io {
            action: "create directory",
            path: workdir.clone(),
            source: e,
        })?;
        tracing::debug!("Created directory {}", workdir.display());
    }

    Ok(workdir)
}
