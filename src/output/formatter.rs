//! Output formatters for run results
//!
//! Provides table, summary, JSON, CSV and HTML report formats.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::models::{RunResult, TestCaseResult, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Summary,
    Json,
    JsonPretty,
    Csv,
    Html,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "summary" => Some(OutputFormat::Summary),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "html" => Some(OutputFormat::Html),
            _ => None,
        }
    }

    /// Guess the format from a report file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "html" | "htm" => Some(OutputFormat::Html),
            "txt" => Some(OutputFormat::Table),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a whole run
    pub fn format_run(&self, run: &RunResult) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Table => self.format_run_table(run),
            OutputFormat::Summary => self.format_run_summary(run),
            OutputFormat::Json => serde_json::to_string(run).context("Failed to serialize run")?,
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(run).context("Failed to serialize run")?
            }
            OutputFormat::Csv => self.format_run_csv(run)?,
            OutputFormat::Html => self.format_run_html(run),
        })
    }

    fn status_label(&self, status: TestStatus) -> String {
        let label = format!("{} {}", status.symbol(), status);
        if !self.colorize {
            return label;
        }
        let color = match status {
            TestStatus::Pass => "32",
            TestStatus::Fail | TestStatus::Error => "31",
        };
        format!("\x1b[{color}m{label}\x1b[0m")
    }

    fn format_case_row(&self, index: usize, result: &TestCaseResult) -> String {
        let code = result
            .actual_return_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "---".to_string());

        format!(
            "{:3}. {:30} {:>3} -> {:>3}  {} [{:>8.2}ms]",
            index + 1,
            truncate(&result.spec.route, 30),
            result.spec.expect_return_code,
            code,
            self.status_label(result.status()),
            result.response_time_ms()
        )
    }

    fn format_run_table(&self, run: &RunResult) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════════\n");
        let _ = writeln!(output, " {}", run.title);
        let _ = writeln!(output, " Target: {}", run.target);
        output.push_str("══════════════════════════════════════════════════════════════════\n");

        for (index, result) in run.test_cases.iter().enumerate() {
            output.push_str(&self.format_case_row(index, result));
            output.push('\n');
            for msg in &result.err_messages {
                let _ = writeln!(output, "       - {msg}");
            }
        }

        output.push_str("──────────────────────────────────────────────────────────────────\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", run.passed())
        } else {
            run.passed().to_string()
        };
        let fail_str = if self.colorize && run.failed() > 0 {
            format!("\x1b[31m{}\x1b[0m", run.failed())
        } else {
            run.failed().to_string()
        };

        let _ = writeln!(
            output,
            " Total: {} | Pass: {} | Fail: {} | Not run: {}",
            run.total(),
            pass_str,
            fail_str,
            run.not_run()
        );
        let _ = writeln!(
            output,
            " Success: {}% | Duration: {}ms",
            run.success_percentage(),
            run.total_duration_ms
        );
        if let Some(reason) = &run.aborted {
            let _ = writeln!(output, " Aborted: {reason}");
        }
        output.push_str("══════════════════════════════════════════════════════════════════\n");

        output
    }

    fn format_run_summary(&self, run: &RunResult) -> String {
        let mut summary = format!(
            "{}: {}/{} passed ({}%) in {}ms",
            run.title,
            run.passed(),
            run.total(),
            run.success_percentage(),
            run.total_duration_ms
        );
        if let Some(reason) = &run.aborted {
            let _ = write!(summary, " [{reason}, {} not run]", run.not_run());
        }
        summary
    }

    fn format_run_csv(&self, run: &RunResult) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "case",
            "route",
            "expected_status",
            "actual_status",
            "status",
            "response_time_ms",
            "errors",
        ])?;

        for (index, result) in run.test_cases.iter().enumerate() {
            writer.write_record([
                (index + 1).to_string(),
                result.spec.route.clone(),
                result.spec.expect_return_code.to_string(),
                result
                    .actual_return_code
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                result.status().to_string(),
                format!("{:.3}", result.response_time_ms()),
                result.err_messages.join("; "),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {e}"))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }

    fn format_run_html(&self, run: &RunResult) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_html(&run.title));
        html.push_str(
            "<style>\n\
             body { font-family: sans-serif; margin: 2em; }\n\
             table { border-collapse: collapse; width: 100%; }\n\
             th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }\n\
             tr.pass td.status { color: #2e7d32; }\n\
             tr.fail td.status, tr.error td.status { color: #c62828; }\n\
             pre { margin: 0; white-space: pre-wrap; }\n\
             </style>\n</head>\n<body>\n",
        );

        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&run.title));
        let _ = writeln!(
            html,
            "<p>Target: <code>{}</code></p>",
            escape_html(&run.target)
        );
        let _ = writeln!(
            html,
            "<p>Success: {}% ({}/{}) | Total duration: {}ms</p>",
            run.success_percentage(),
            run.passed(),
            run.total(),
            run.total_duration_ms
        );
        if let Some(reason) = &run.aborted {
            let _ = writeln!(
                html,
                "<p><strong>Aborted:</strong> {} ({} cases not run)</p>",
                escape_html(reason),
                run.not_run()
            );
        }

        html.push_str(
            "<table>\n<tr><th>#</th><th>Route</th><th>Expected</th><th>Actual</th>\
             <th>Status</th><th>Time</th><th>Response</th><th>Errors</th></tr>\n",
        );

        for (index, result) in run.test_cases.iter().enumerate() {
            let status = result.status();
            let errors = result
                .err_messages
                .iter()
                .map(|m| format!("<li>{}</li>", escape_html(m)))
                .collect::<String>();

            let _ = writeln!(
                html,
                "<tr class=\"{}\"><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td>\
                 <td class=\"status\">{}</td><td>{:.2}ms</td><td><pre>{}</pre></td><td><ul>{}</ul></td></tr>",
                status.to_string().to_lowercase(),
                index + 1,
                escape_html(&result.spec.route),
                result.spec.expect_return_code,
                result
                    .actual_return_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                status,
                result.response_time_ms(),
                escape_html(&result.response_body),
                errors
            );
        }

        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

/// Write a run report to a file
pub fn write_report_to_file(
    path: impl AsRef<Path>,
    run: &RunResult,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    let content = ResultFormatter::new(format).no_color().format_run(run)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, TestCaseSpec};

    fn sample_run() -> RunResult {
        let mut run = RunResult::titled("Testresult from 3:04PM", "http://localhost:8181", 3);

        let mut ok = TestCaseResult::new(
            TestCaseSpec::new("/health", 200).with_condition("status", Condition::equals("ok")),
        );
        ok.actual_return_code = Some(200);
        ok.response_time_us = 12_345;
        ok.response_body = r#"{"status":"ok"}"#.to_string();
        run.test_cases.push(ok.finish());

        let mut failed = TestCaseResult::new(TestCaseSpec::new("/search?q=<b>", 200));
        failed.actual_return_code = Some(404);
        failed.add_err_msg("expected status code 200, got 404 instead");
        run.test_cases.push(failed.finish());

        run.total_duration_ms = 40;
        run
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("html"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("report.html")),
            Some(OutputFormat::Html)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("report.csv")),
            Some(OutputFormat::Csv)
        );
        assert_eq!(OutputFormat::from_path(Path::new("report")), None);
    }

    #[test]
    fn test_table_lists_errors() {
        let output = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_run(&sample_run())
            .unwrap();

        assert!(output.contains("/health"));
        assert!(output.contains("✓ PASS"));
        assert!(output.contains("✗ FAIL"));
        assert!(output.contains("expected status code 200, got 404 instead"));
        assert!(output.contains("Success: 50%"));
        assert!(output.contains("Not run: 1"));
    }

    #[test]
    fn test_summary() {
        let output = ResultFormatter::new(OutputFormat::Summary)
            .format_run(&sample_run())
            .unwrap();
        assert_eq!(output, "Testresult from 3:04PM: 1/2 passed (50%) in 40ms");
    }

    #[test]
    fn test_json_round_trips_through_serde() {
        let output = ResultFormatter::new(OutputFormat::Json)
            .format_run(&sample_run())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["test_cases"].as_array().unwrap().len(), 2);
        assert_eq!(value["test_cases"][0]["case"]["Route"], "/health");
        assert_eq!(value["test_cases"][1]["success"], false);
    }

    #[test]
    fn test_csv_quotes_fields() {
        let output = ResultFormatter::new(OutputFormat::Csv)
            .format_run(&sample_run())
            .unwrap();
        let mut lines = output.lines();

        assert_eq!(
            lines.next(),
            Some("case,route,expected_status,actual_status,status,response_time_ms,errors")
        );
        assert_eq!(lines.next(), Some("1,/health,200,200,PASS,12.345,"));
        assert_eq!(
            lines.next(),
            Some("2,/search?q=<b>,200,404,FAIL,0.000,\"expected status code 200, got 404 instead\"")
        );
    }

    #[test]
    fn test_html_escapes_content() {
        let output = ResultFormatter::new(OutputFormat::Html)
            .format_run(&sample_run())
            .unwrap();

        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("/search?q=&lt;b&gt;"));
        assert!(output.contains("{&quot;status&quot;:&quot;ok&quot;}"));
        assert!(output.contains("Success: 50% (1/2)"));
        assert!(!output.contains("<b>"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report_to_file(&path, &sample_run(), OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("case,route"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("/short", 30), "/short");
        assert_eq!(truncate("/abcdefghij", 8), "/abcd...");
    }
}
