//! Command implementations.

pub mod plan;
pub mod run;

pub use self::plan::execute_plan;
pub use self::run::execute_run;
