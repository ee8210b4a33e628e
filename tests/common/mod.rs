//! Shared test utilities: fake installation trees and command lines.

#![allow(dead_code, unused_imports)]

use std::fs;
use std::path::{Path, PathBuf};

use cado_toplevel::cli::Cli;
use cado_toplevel::config::Layout;
use cado_toplevel::plan::CLIENT_SCRIPT;
use tempfile::TempDir;

/// Shipped factoring parameter files, with their contents.
pub const FACTOR_FILES: &[(&str, &[&str])] = &[
    ("params.c5", &["a.b.c=32"]),
    ("params.c10", &["name=c10"]),
    ("params.c13", &["name=c13"]),
    ("params.c20", &["name=c20"]),
];

/// Shipped discrete-log parameter files, with their contents.
pub const DLP_FILES: &[(&str, &[&str])] = &[
    ("params.p5", &["name=p5"]),
    ("params.p10", &["name=p10"]),
    ("params.p13", &["name=p13"]),
    ("params.p20", &["name=p20"]),
    ("params.p20dd2", &["name=p20dd2"]),
];

/// A throwaway installation: `data/{factor,dlp}`, `lib`, `bin`.
pub struct Install {
    pub root: TempDir,
}

impl Install {
    /// Installation with every shipped parameter file and no client script.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        for (subdir, files) in [("factor", FACTOR_FILES), ("dlp", DLP_FILES)] {
            let dir = root.path().join("data").join(subdir);
            fs::create_dir_all(&dir).unwrap();
            for (name, lines) in files {
                write_params(&dir, name, lines);
            }
        }
        fs::create_dir_all(root.path().join("lib")).unwrap();
        fs::create_dir_all(root.path().join("bin")).unwrap();
        Self { root }
    }

    /// Installation whose `bin` holds the client launcher.
    pub fn with_client_script() -> Self {
        let install = Self::new();
        install_client_script(&install.bin());
        install
    }

    pub fn data(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn lib(&self) -> PathBuf {
        self.root.path().join("lib")
    }

    pub fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.data(), self.lib(), self.bin())
    }

    /// Write a `layout.toml` describing this installation.
    pub fn layout_file(&self) -> PathBuf {
        let path = self.root.path().join("layout.toml");
        let content = format!(
            "[paths]\ndata = \"{}\"\nlib = \"{}\"\nbin = \"{}\"\n",
            self.data().display(),
            self.lib().display(),
            self.bin().display()
        );
        fs::write(&path, content).unwrap();
        path
    }
}

/// Write a parameter file with one assignment per line.
pub fn write_params(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Drop an empty client launcher into `dir`.
pub fn install_client_script(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(CLIENT_SCRIPT), "#!/usr/bin/env python3\n").unwrap();
}

/// Parse a command line, program name implied.
pub fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["cado-toplevel"];
    argv.extend_from_slice(args);
    Cli::try_parse_args(argv).expect("command line should parse")
}

pub fn raw_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Path as a `&str`, for building argument lists.
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}
