//! Test execution engine
//!
//! Executes single cases and drives ordered runs over them.

mod case;
mod runner;

pub use case::execute_case;
pub use runner::TestRunner;
