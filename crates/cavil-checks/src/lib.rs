//! The check framework (spec.md §4.5), the generic execution-path engine
//! (spec.md §4.7), and the concrete STL/class-correctness checks built on
//! top of them (spec.md §4.9).

pub mod check;
pub mod checks;
pub mod execution_path;
pub mod settings;

pub use check::{Check, CheckContext, CheckRegistry, register_all};
pub use execution_path::{check_scope, ExecutionPath, ParseOutcome};
pub use settings::Settings;
