//! Argument handling pipeline.
//!
//! ```text
//! argv → Classify → Resolve inputs → Apply options → Plan threads → Plan slaves
//! ```
//!
//! Each stage reads the previous stage's output and mutates the parameter
//! hierarchy only after that stage has finished; [`cook_parameters`] runs
//! them in order.

mod classifier;
mod pipeline;
mod rules;

pub use classifier::{classify, ClassifiedArguments};
pub use pipeline::{cook_parameters, ResolvedConfiguration};
pub use rules::{token_rules, ExplicitFlags, Scan, TokenClass, TokenRule};
