//! Client topology: how many clients, on which hosts, launched from where.

use std::path::PathBuf;

use crate::config::Paths;
use crate::error::ResolveError;
use crate::params::Parameters;
use crate::plan::threads::ThreadPlan;
use crate::resolve::ResolvedInputs;

/// Script that starts a client; looked up in the source tree, then `bin`.
pub const CLIENT_SCRIPT: &str = "cado-nfs-client.py";

const SLAVES: &str = "slaves";
const NRCLIENTS: &str = "slaves.nrclients";
const HOSTNAMES: &str = "slaves.hostnames";
const BASEPATH: &str = "slaves.basepath";
const SCRIPTPATH: &str = "slaves.scriptpath";

/// Command-line inputs to topology planning.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlaveRequest {
    /// `--server`: run a bare server and drop every `slaves.*` key.
    pub server_only: bool,
    /// `--slaves`
    pub slaves: Option<u32>,
}

/// Topology stored in the hierarchy after planning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlavePlan {
    pub nrclients: u32,
    pub scriptpath: Option<PathBuf>,
}

/// Derive `slaves.*` defaults.
///
/// Clients are only laid out automatically for a shipped default parameter
/// file: localhost, enough clients to use the server thread budget.
pub fn plan_slaves(
    params: &mut Parameters,
    request: &SlaveRequest,
    inputs: &ResolvedInputs,
    threads: &ThreadPlan,
    paths: &Paths,
) -> Result<SlavePlan, ResolveError> {
    if request.server_only {
        for key in params.remove_namespace(SLAVES) {
            tracing::warn!("server mode, ignoring {}", key);
        }
        return Ok(SlavePlan::default());
    }

    if let Some(slaves) = request.slaves {
        params.set_if_unset(NRCLIENTS, slaves);
    }

    if params.get(HOSTNAMES).is_some() {
        params.set_if_unset(NRCLIENTS, 1);
    } else if inputs.using_default_parameter_file {
        params.set_if_unset(HOSTNAMES, "localhost");
        // Clients download into their own subdirectory, not the workdir root.
        params.set_if_unset(BASEPATH, inputs.workdir.join("client").display());
        params.set_if_unset(NRCLIENTS, clients_for(threads));
    }

    let nrclients = params.get_as::<u32>(NRCLIENTS)?.unwrap_or(0);
    if nrclients > 0 && params.get_or(SCRIPTPATH, "").is_empty() {
        let dir = find_client_script(paths)?;
        params.set(SCRIPTPATH, dir.display());
        tracing::info!("{} is {}", SCRIPTPATH, dir.display());
    }

    Ok(SlavePlan {
        nrclients,
        scriptpath: params.get(SCRIPTPATH).map(PathBuf::from),
    })
}

/// Local clients needed to keep `threads.server` threads busy.
fn clients_for(threads: &ThreadPlan) -> u32 {
    if threads.server == 0 {
        return 1;
    }
    let per_client = threads.polyselect.max(threads.sieve).max(1);
    threads.server.div_ceil(per_client)
}

/// First directory holding the client launcher, as an absolute path.
fn find_client_script(paths: &Paths) -> Result<PathBuf, ResolveError> {
    let candidates: Vec<&PathBuf> = paths.source.iter().chain([&paths.bin]).collect();
    for dir in &candidates {
        if dir.join(CLIENT_SCRIPT).is_file() {
            return std::path::absolute(dir).map_err(|e| ResolveError::Io {
                action: "resolve",
                path: dir.to_path_buf(),
                source: e,
            });
        }
    }
    Err(ResolveError::MissingResource {
        path: paths.bin.join(CLIENT_SCRIPT),
    })
}
