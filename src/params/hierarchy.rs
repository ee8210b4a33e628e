//! Dotted-namespace parameter store with inheritance and provenance lookup.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::params::reader::{self, is_valid_key, ParamError};

/// Hierarchical parameters keyed by dotted names such as `tasks.sieve.threads`.
///
/// A read of `a.b.c` is satisfied by the first stored key among `a.b.c`,
/// `a.c` and `c`, so deeper namespaces inherit from shallower ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
    verbose: bool,
}

impl Parameters {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hierarchy that traces every read and write.
    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            values: BTreeMap::new(),
            verbose,
        }
    }

    /// Provenance lookup: the stored key a read of `key` resolves to.
    ///
    /// Returns `key` itself when it holds its own value, an ancestor key
    /// when the value is inherited, or `None` when nothing is visible.
    pub fn locate(&self, key: &str) -> Option<&str> {
        lookup_chain(key)
            .into_iter()
            .find_map(|candidate| self.values.get_key_value(&candidate))
            .map(|(stored, _)| stored.as_str())
    }

    /// Read a value, following inheritance.
    pub fn get(&self, key: &str) -> Option<&str> {
        let stored = self.locate(key)?;
        if self.verbose && stored != key {
            tracing::info!("{} inherited from {}", key, stored);
        }
        self.values.get(stored).map(String::as_str)
    }

    /// Read a value, falling back to `default` when nothing is visible.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Read a value that must be present.
    pub fn require(&self, key: &str) -> Result<&str, ParamError> {
        self.get(key).ok_or_else(|| ParamError::Missing {
            key: key.to_string(),
        })
    }

    /// Read and parse a value, following inheritance.
    pub fn get_as<T: FromStr>(&self, key: &str) -> Result<Option<T>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| ParamError::Invalid {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Store a value at exactly `key`.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        debug_assert!(is_valid_key(key), "malformed parameter key {key}");
        let value = value.to_string();
        if self.verbose {
            tracing::info!("set {} = {}", key, value);
        }
        self.values.insert(key.to_string(), value);
    }

    /// Store a value unless a read of `key` already sees one.
    ///
    /// Returns whether the value was stored.
    pub fn set_if_unset(&mut self, key: &str, value: impl ToString) -> bool {
        if self.get(key).is_some() {
            return false;
        }
        self.set(key, value);
        true
    }

    /// Every stored `(key, value)` under the `namespace.` prefix, in tree order.
    pub fn find(&self, namespace: &str) -> Vec<(&str, &str)> {
        let prefix = format!("{namespace}.");
        let mut found: Vec<(&str, &str)> = self
            .values
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        found.sort_by(|a, b| tree_order(a.0, b.0));
        found
    }

    /// Drop every key under the `namespace.` prefix, returning the removed keys.
    pub fn remove_namespace(&mut self, namespace: &str) -> Vec<String> {
        let removed: Vec<String> = self
            .find(namespace)
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect();
        for key in &removed {
            self.values.remove(key);
        }
        removed
    }

    /// Merge a parameter file on top of the current values.
    pub fn read_file(&mut self, path: &Path) -> Result<(), ParamError> {
        tracing::debug!("Reading parameter file {}", path.display());
        for (key, value) in reader::read_file(path)? {
            self.set(&key, value);
        }
        Ok(())
    }

    /// Merge `key=value` options on top of the current values; later entries win.
    pub fn read_options<S: AsRef<str>>(&mut self, options: &[S]) -> Result<(), ParamError> {
        for (key, value) in reader::read_options(options)? {
            self.set(&key, value);
        }
        Ok(())
    }

    /// All stored `(key, value)` pairs in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut all: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        all.sort_by(|a, b| tree_order(a.0, b.0));
        all.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}

/// Keys consulted, deepest first, when reading `key`.
fn lookup_chain(key: &str) -> Vec<String> {
    let components: Vec<&str> = key.split('.').collect();
    let Some((leaf, path)) = components.split_last() else {
        return Vec::new();
    };
    (0..=path.len())
        .rev()
        .map(|depth| {
            let mut parts = path[..depth].to_vec();
            parts.push(leaf);
            parts.join(".")
        })
        .collect()
}

/// Within a namespace, leaves sort before child namespaces; names sort
/// lexically within each group.
fn tree_order(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(key: &str) -> Vec<(u8, &str)> {
    let components: Vec<&str> = key.split('.').collect();
    let last = components.len() - 1;
    components
        .into_iter()
        .enumerate()
        .map(|(i, c)| (u8::from(i != last), c))
        .collect()
}
