//! Server and task-family thread counts.

use crate::cli::ServerThreads;
use crate::env::RuntimeEnv;
use crate::error::ResolveError;
use crate::params::Parameters;
use crate::plan::cores::number_of_physical_cores;

pub const SERVER_THREADS: &str = "tasks.threads";
pub const POLYSELECT_THREADS: &str = "tasks.polyselect.threads";
pub const SIEVE_THREADS: &str = "tasks.sieve.threads";

/// Default ceiling for a task family that inherits the server count.
const INHERITED_FAMILY_THREADS: u32 = 2;

/// Thread counts stored in the hierarchy after planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPlan {
    pub server: u32,
    pub polyselect: u32,
    pub sieve: u32,
}

/// Set `tasks.threads` and give both task families a count of their own.
///
/// Without `--server-threads`, a value already in the hierarchy is kept;
/// with neither, every physical core is used. `--client-threads` sets
/// both families; otherwise a family that only inherits the server count
/// gets `min(server, 2)`, and one set explicitly keeps its value.
pub fn plan_threads(
    params: &mut Parameters,
    server_threads: Option<ServerThreads>,
    client_threads: Option<u32>,
    env: &RuntimeEnv,
) -> Result<ThreadPlan, ResolveError> {
    let current = params.get_as::<u32>(SERVER_THREADS)?.unwrap_or(0);
    let requested = match server_threads {
        Some(requested) => Some(requested),
        None if current == 0 => Some(ServerThreads::All),
        None => None,
    };

    if let Some(requested) = requested {
        let threads = match requested {
            ServerThreads::All => {
                let ncpus = number_of_physical_cores(env)?;
                tracing::info!("Set {}={} based on detected physical cpus", SERVER_THREADS, ncpus);
                ncpus
            }
            ServerThreads::Count(count) => count,
        };
        params.set(SERVER_THREADS, threads);
    }

    let server = params.get_as::<u32>(SERVER_THREADS)?.unwrap_or(0);
    for family in [POLYSELECT_THREADS, SIEVE_THREADS] {
        match client_threads {
            Some(count) => params.set(family, count),
            None if params.locate(family) != Some(family) => {
                params.set(family, server.min(INHERITED_FAMILY_THREADS))
            }
            None => {}
        }
        debug_assert_eq!(params.locate(family), Some(family));
        tracing::info!("{} = {}", family, params.get_or(family, ""));
    }

    Ok(ThreadPlan {
        server,
        polyselect: params.get_as(POLYSELECT_THREADS)?.unwrap_or(0),
        sieve: params.get_as(SIEVE_THREADS)?.unwrap_or(0),
    })
}
