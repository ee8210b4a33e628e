use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration container: where the installation keeps its files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub paths: Paths,
}

/// Installation directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Root of the shipped parameter files (holds `factor/` and `dlp/`).
    pub data: PathBuf,
    /// Directory of the computation binaries (becomes `tasks.execpath`).
    pub lib: PathBuf,
    /// Directory of the installed scripts, including the client launcher.
    pub bin: PathBuf,
    /// Source-tree script directory, searched before `bin` when set.
    pub source: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data: exe_dir.join("parameters"),
            lib: exe_dir.clone(),
            bin: exe_dir,
            source: None,
        }
    }
}

impl Layout {
    /// Layout with every directory given explicitly.
    pub fn new(data: impl Into<PathBuf>, lib: impl Into<PathBuf>, bin: impl Into<PathBuf>) -> Self {
        Self {
            paths: Paths {
                data: data.into(),
                lib: lib.into(),
                bin: bin.into(),
                source: None,
            },
        }
    }

    /// Set the source-tree script directory.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.paths.source = Some(source.into());
        self
    }
}
