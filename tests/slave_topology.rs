//! Integration tests for client topology planning.

mod common;

use cado_toplevel::config::Layout;
use cado_toplevel::env::RuntimeEnv;
use cado_toplevel::resolve::{PurgeSet, Release};
use cado_toplevel::{cook_parameters, ResolveError, ResolvedConfiguration};
use common::{arg, cli, install_client_script, Install};
use tempfile::TempDir;

/// A finished run and the scratch directories it created.
struct Resolution {
    config: ResolvedConfiguration,
    purge: PurgeSet,
}

fn cook(layout: &Layout, args: &[&str], cores: &str) -> Result<Resolution, ResolveError> {
    let mut purge = PurgeSet::new();
    let env = RuntimeEnv::new().with_fake_cores(cores);
    let config = cook_parameters(&cli(args), layout, &env, &mut purge)?;
    Ok(Resolution { config, purge })
}

fn nrclients(resolution: &Resolution) -> String {
    resolution
        .config
        .parameters
        .get_or("slaves.nrclients", "0")
        .to_string()
}

fn purge(mut resolution: Resolution) {
    resolution
        .purge
        .release(&RuntimeEnv::new(), Release::Purge)
        .unwrap();
}

// =============================================================================
// NON-DEFAULT PARAMETER FILE
// =============================================================================

#[test]
fn hostnames_mean_one_client_per_host() {
    let install = Install::new();
    let resolution = cook(
        &install.layout(),
        &["-p", "/dev/null", "12345", "slaves.hostnames=foo,bar", "slaves.scriptpath=/tmp"],
        "4",
    )
    .unwrap();

    assert_eq!(nrclients(&resolution), "1");
    assert_eq!(resolution.config.slaves.nrclients, 1);
    assert_eq!(
        resolution.config.slaves.scriptpath.as_deref(),
        Some(std::path::Path::new("/tmp"))
    );
    purge(resolution);
}

#[test]
fn user_file_without_hostnames_runs_a_bare_server() {
    let install = Install::new();
    let resolution = cook(
        &install.layout(),
        &["-p", "/dev/null", "12345", "slaves.scriptpath=/tmp"],
        "4",
    )
    .unwrap();

    assert_eq!(nrclients(&resolution), "0");
    assert_eq!(resolution.config.parameters.get("slaves.hostnames"), None);
    purge(resolution);
}

// =============================================================================
// SHIPPED DEFAULT PARAMETER FILE
// =============================================================================

#[test]
fn default_file_fills_the_server_budget_with_local_clients() {
    let install = Install::new();
    let resolution = cook(&install.layout(), &["12345", "slaves.scriptpath=/tmp"], "4").unwrap();
    let params = &resolution.config.parameters;

    assert!(resolution.config.using_default_parameter_file);
    assert_eq!(nrclients(&resolution), "2");
    assert_eq!(params.get("slaves.hostnames"), Some("localhost"));
    assert_eq!(
        params.get("slaves.basepath"),
        Some(resolution.config.workdir.join("client").to_str().unwrap())
    );
    purge(resolution);
}

#[test]
fn explicit_basepath_is_kept() {
    let install = Install::new();
    let resolution = cook(
        &install.layout(),
        &["12345", "slaves.scriptpath=/tmp", "slaves.basepath=/scratch/clients"],
        "4",
    )
    .unwrap();

    assert_eq!(
        resolution.config.parameters.get("slaves.basepath"),
        Some("/scratch/clients")
    );
    purge(resolution);
}

#[test]
fn default_file_with_odd_budget_rounds_up() {
    let install = Install::new();
    let resolution = cook(&install.layout(), &["12345", "slaves.scriptpath=/tmp"], "3").unwrap();
    assert_eq!(nrclients(&resolution), "2");
    purge(resolution);
}

#[test]
fn slaves_flag_wins_over_the_derived_count() {
    let install = Install::new();
    let resolution = cook(
        &install.layout(),
        &["12345", "--slaves", "5", "slaves.scriptpath=/tmp"],
        "4",
    )
    .unwrap();
    assert_eq!(nrclients(&resolution), "5");
    purge(resolution);
}

#[test]
fn server_mode_drops_every_slaves_key() {
    let install = Install::new();
    let resolution = cook(
        &install.layout(),
        &["12345", "--server", "slaves.hostnames=foo", "slaves.nrclients=3"],
        "4",
    )
    .unwrap();

    assert!(resolution.config.parameters.find("slaves").is_empty());
    assert_eq!(resolution.config.slaves.nrclients, 0);
    assert!(resolution.config.slaves.scriptpath.is_none());
    purge(resolution);
}

// =============================================================================
// CLIENT SCRIPT LOOKUP
// =============================================================================

#[test]
fn missing_client_script_is_reported() {
    let install = Install::new();
    let err = cook(&install.layout(), &["12345", "-w", arg(install.root.path())], "4")
        .err()
        .expect("clients cannot run without their launcher");

    assert!(matches!(err, ResolveError::MissingResource { .. }));
    assert!(err.to_string().contains("bin/cado-nfs-client.py"));
}

#[test]
fn failed_run_still_hands_back_its_scratch_dir() {
    let install = Install::new();
    let env = RuntimeEnv::new().with_fake_cores("4");
    let mut purge = PurgeSet::new();

    let err = cook_parameters(&cli(&["12345"]), &install.layout(), &env, &mut purge)
        .expect_err("clients cannot run without their launcher");
    assert!(matches!(err, ResolveError::MissingResource { .. }));

    let scratch = purge.paths().to_vec();
    assert_eq!(scratch.len(), 1);
    assert!(scratch[0].is_dir());
    assert!(scratch[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("cado."));

    purge.release(&env, Release::Purge).unwrap();
    assert!(purge.is_empty());
    assert!(!scratch[0].exists());
}

#[test]
fn client_script_is_found_in_bin() {
    let install = Install::with_client_script();
    let resolution = cook(&install.layout(), &["12345"], "4").unwrap();

    assert_eq!(resolution.config.slaves.scriptpath, Some(install.bin()));
    assert_eq!(
        resolution.config.parameters.get("slaves.scriptpath"),
        Some(install.bin().to_str().unwrap())
    );
    purge(resolution);
}

#[test]
fn source_tree_is_searched_before_bin() {
    let install = Install::with_client_script();
    let source = TempDir::new().unwrap();
    install_client_script(source.path());
    let layout = install.layout().with_source(source.path());

    let resolution = cook(&layout, &["12345"], "4").unwrap();
    assert_eq!(
        resolution.config.slaves.scriptpath.as_deref(),
        Some(source.path())
    );
    purge(resolution);
}

#[test]
fn explicit_scriptpath_skips_the_lookup() {
    let install = Install::new();
    let resolution = cook(&install.layout(), &["12345", "slaves.scriptpath=/opt/cado"], "2").unwrap();
    assert_eq!(
        resolution.config.parameters.get("slaves.scriptpath"),
        Some("/opt/cado")
    );
    purge(resolution);
}
