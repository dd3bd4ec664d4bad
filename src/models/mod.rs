//! Data models for endpoint testing
//!
//! This module contains all data structures used throughout the application.

mod carry;
mod case;
mod test_result;

pub use carry::HeaderCarry;
pub use case::{Condition, Operator, TestCaseSpec};
pub use test_result::{RunResult, TestCaseResult, TestStatus};
