use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cado_toplevel::cli::Cli;
use cado_toplevel::config::Layout;
use cado_toplevel::env::RuntimeEnv;
use cado_toplevel::logging::init_tracing;
use cado_toplevel::resolve::{PurgeSet, Release};
use cado_toplevel::cook_parameters;

fn main() -> Result<()> {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.screenlog, !cli.no_colors);

    let layout = load_layout(cli.layout.as_deref())?;
    let env = RuntimeEnv::from_process();

    let mut purge = PurgeSet::new();
    let config = match cook_parameters(&cli, &layout, &env, &mut purge) {
        Ok(config) => config,
        Err(e) => {
            // Nothing will run in a scratch dir of a failed resolution.
            if let Err(cleanup) = purge.release(&env, Release::Purge) {
                tracing::warn!("{}", cleanup);
            }
            return Err(e.into());
        }
    };
    tracing::info!(
        "N has {} digits, parameters from {}{}",
        config.n.digits(),
        config.parameter_file.display(),
        if config.using_default_parameter_file {
            " (shipped default)"
        } else {
            ""
        }
    );
    tracing::debug!(
        "Log file level for {} is {}",
        config.workdir.display(),
        config.file_log_level
    );

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", config.parameters).context("failed to write parameters")?;
    stdout.flush().context("failed to flush stdout")?;

    // The scheduler runs in the workdir after us, so scratch data stays.
    purge.release(&env, Release::Keep)?;
    Ok(())
}

fn load_layout(path: Option<&Path>) -> Result<Layout> {
    match path {
        Some(path) => Layout::load_from(path)
            .with_context(|| format!("failed to load layout from {}", path.display())),
        None => Layout::load().context("failed to load layout"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::load_layout;

    #[test]
    fn explicit_layout_must_exist() {
        let err = load_layout(Some(Path::new("/nonexistent/layout.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/layout.toml"));
    }
}
