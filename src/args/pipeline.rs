//! Runs every resolution stage over one invocation.

use std::path::PathBuf;

use crate::args::classifier::classify;
use crate::args::rules::{token_rules, ExplicitFlags};
use crate::cli::{Cli, LogLevel};
use crate::config::Layout;
use crate::env::RuntimeEnv;
use crate::error::ResolveError;
use crate::number::InputNumber;
use crate::params::Parameters;
use crate::plan::{plan_slaves, plan_threads, SlavePlan, SlaveRequest, ThreadPlan};
use crate::resolve::{resolve_inputs, DefaultFiles, Mode, PurgeSet};

/// The fully cooked configuration handed to the scheduler.
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    pub n: InputNumber,
    /// Parameter file that was read.
    pub parameter_file: PathBuf,
    /// The parameter file was auto-discovered from the shipped defaults.
    pub using_default_parameter_file: bool,
    pub workdir: PathBuf,
    pub threads: ThreadPlan,
    pub slaves: SlavePlan,
    /// Level for the scheduler's log file in the workdir.
    pub file_log_level: LogLevel,
    pub parameters: Parameters,
}

/// Run every stage, in order, over one invocation.
///
/// This is the main entry point of the library.
///
/// # Arguments
///
/// * `cli` - The parsed command line
/// * `layout` - Installation directories (data root, lib, bin, source tree)
/// * `env` - Snapshot of `NCPUS_FAKE` / `CADO_DEBUG`
/// * `purge` - Receives every scratch directory created on the way. It is
///   filled even when a later stage fails, so the caller can still release it.
pub fn cook_parameters(
    cli: &Cli,
    layout: &Layout,
    env: &RuntimeEnv,
    purge: &mut PurgeSet,
) -> Result<ResolvedConfiguration, ResolveError> {
    // Stage 1: Classify free-form tokens
    let flags = ExplicitFlags::from(cli);
    let classified = classify(&cli.options, &flags, &token_rules())?;

    let mut params = Parameters::with_verbose(cli.verboseparam);
    params.set("tasks.execpath", layout.paths.lib.display());

    // Stage 2: Decide N, parameter file and workdir; read the file
    let defaults = DefaultFiles {
        data_root: layout.paths.data.clone(),
        mode: Mode::from_dlp_flag(cli.dlp),
        gfpext: cli.gfpext,
    };
    let inputs = resolve_inputs(&classified, &mut params, &defaults, env, purge)?;

    // Stage 3: Command-line options override the file
    params.read_options(&classified.options)?;

    // Stage 4: Thread budgets
    let threads = plan_threads(&mut params, cli.server_threads, cli.client_threads, env)?;

    // Stage 5: Client topology
    let request = SlaveRequest {
        server_only: cli.server,
        slaves: cli.slaves,
    };
    let slaves = plan_slaves(&mut params, &request, &inputs, &threads, &layout.paths)?;

    Ok(ResolvedConfiguration {
        n: inputs.n,
        parameter_file: inputs.parameter_file,
        using_default_parameter_file: inputs.using_default_parameter_file,
        workdir: inputs.workdir,
        threads,
        slaves,
        file_log_level: cli.filelog,
        parameters: params,
    })
}
