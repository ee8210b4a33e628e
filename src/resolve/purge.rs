//! Scratch directories created during resolution, released explicitly.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::env::RuntimeEnv;
use crate::error::ResolveError;

/// What [`PurgeSet::release`] does with the registered directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Delete them (the computation finished).
    Purge,
    /// Leave them in place and say where they are.
    Keep,
}

/// Scratch directories owned by the resolver.
///
/// Nothing happens on drop: the driver calls [`PurgeSet::release`] at the
/// end of a run. `CADO_DEBUG` is consulted at that point, not at creation.
#[derive(Debug, Default)]
pub struct PurgeSet {
    paths: Vec<PathBuf>,
}

impl PurgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a directory for later release.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Release the registered directories. Calling it again is harmless:
    /// purged directories are forgotten, kept ones are only reported.
    pub fn release(&mut self, env: &RuntimeEnv, mode: Release) -> Result<(), ResolveError> {
        if env.debug() {
            for path in &self.paths {
                tracing::info!("CADO_DEBUG is on, data kept in {}", path.display());
            }
            return Ok(());
        }

        match mode {
            Release::Keep => {
                for path in &self.paths {
                    tracing::info!("Computation data kept in {}", path.display());
                }
            }
            Release::Purge => {
                while let Some(path) = self.paths.first() {
                    tracing::info!("Cleaning up computation data in {}", path.display());
                    remove_tree(path)?;
                    self.paths.remove(0);
                }
            }
        }
        Ok(())
    }
}

fn remove_tree(path: &Path) -> Result<(), ResolveError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ResolveError::Io {
            action: "remove",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
