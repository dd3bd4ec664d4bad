//! Output formatting module
//!
//! Renders run results as human-readable or machine-readable reports.

mod formatter;

pub use formatter::{write_report_to_file, OutputFormat, ResultFormatter};
