//! Sorts free-form tokens into N, parameter file, workdir and options.

use std::path::PathBuf;

use crate::args::rules::{ExplicitFlags, Scan, TokenClass, TokenRule};
use crate::error::ResolveError;
use crate::number::InputNumber;

/// Free-form tokens sorted into their roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedArguments {
    pub n: Option<InputNumber>,
    pub parameters: Option<PathBuf>,
    pub workdir: Option<PathBuf>,
    /// Residual `key=value` options in input order; later entries shadow
    /// earlier ones when read.
    pub options: Vec<String>,
}

/// Classify free-form tokens against the rule table.
///
/// Each of N, parameter file and workdir may come from at most one source,
/// counting the named flag; a second source is a conflict.
pub fn classify(
    tokens: &[String],
    flags: &ExplicitFlags,
    rules: &[TokenRule],
) -> Result<ClassifiedArguments, ResolveError> {
    let mut numbers: Vec<InputNumber> = Vec::new();
    let mut parameter_files: Vec<PathBuf> = flags.parameters.iter().cloned().collect();
    let mut workdirs: Vec<PathBuf> = flags.workdir.iter().cloned().collect();
    let mut options = Vec::new();

    for token in tokens {
        let scan = Scan {
            flags,
            parameter_files: parameter_files.len(),
            workdirs: workdirs.len(),
        };
        let rule = rules
            .iter()
            .find(|rule| (rule.matches)(token, &scan))
            .ok_or_else(|| ResolveError::UnrecognizedArgument(token.clone()))?;
        tracing::debug!("{} classified by rule {} ({})", token, rule.name, rule.description);

        match (rule.classify)(token, &scan)? {
            TokenClass::Number(n) => numbers.push(n),
            TokenClass::ParameterFile(path) => parameter_files.push(path),
            TokenClass::Workdir(path) => workdirs.push(path),
            TokenClass::Option(option) => options.push(option),
        }
    }

    if numbers.len() > 1 {
        return Err(ResolveError::conflict(format!(
            "total of free-form N in command line and N= options cannot exceed 1 (got {})",
            join(&numbers)
        )));
    }
    if parameter_files.len() > 1 {
        return Err(ResolveError::conflict(format!(
            "total of free-form files in command line and --parameters argument \
             cannot exceed 1 (got {})",
            join_paths(&parameter_files)
        )));
    }
    if workdirs.len() > 1 {
        return Err(ResolveError::conflict(format!(
            "total of free-form directory paths in command line and --workdir argument \
             cannot exceed 1 (got {})",
            join_paths(&workdirs)
        )));
    }

    if let Some(ell) = &flags.ell {
        options.push(format!("ell={ell}"));
    }

    Ok(ClassifiedArguments {
        n: numbers.pop(),
        parameters: parameter_files.pop(),
        workdir: workdirs.pop(),
        options,
    })
}

fn join(numbers: &[InputNumber]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
