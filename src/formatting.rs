use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use serde_json::Value;

use seo_audit_lib::{AuditError, CheckKind, ErrorOutput, Report};

use crate::cli::OutputFormat;

/// Write a report in the requested format.
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> seo_audit_lib::Result<()> {
    match format {
        OutputFormat::Json => write_json_output(report, output.as_deref())?,
        OutputFormat::Pretty => {
            write_pretty_output(report, |c| format_report(report, c), output.as_deref())?
        }
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: AuditError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = ErrorOutput::from(&err);

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) =
                write_pretty_output(&payload, |c| format_error(&payload, c), output.as_deref())
            {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output<T: Serialize>(body: &T, output: Option<&Path>) -> seo_audit_lib::Result<()> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Human text on a terminal; pretty JSON for files and pipes.
fn write_pretty_output<T: Serialize>(
    body: &T,
    human: impl FnOnce(bool) -> String,
    output: Option<&Path>,
) -> io::Result<()> {
    if output.is_none() && std::io::stdout().is_terminal() {
        println!("{}", human(true));
        return Ok(());
    }

    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format a report for a terminal, one line per field, grouped by check.
pub fn format_report(report: &Report, colorize: bool) -> String {
    let mut buf = String::new();
    let header = color("[AUDIT]", "36", colorize);
    writeln!(buf, "{} {}", header, report.url).ok();

    let fields = serde_json::to_value(report).unwrap_or(Value::Null);
    for kind in CheckKind::all() {
        for field in kind.fields() {
            let value = fields.get(*field).unwrap_or(&Value::Null);
            writeln!(buf, "{:24} {}", field, format_value(value, colorize)).ok();
        }
    }

    if report.failed_checks.is_empty() {
        writeln!(buf, "{}", color("All checks completed", "32", colorize)).ok();
    } else {
        let failed = format!("Failed checks: {}", report.failed_checks.join(", "));
        writeln!(buf, "{}", color(&failed, "31", colorize)).ok();
    }
    buf
}

fn format_value(value: &Value, colorize: bool) -> String {
    match value {
        Value::Null => color("n/a", "90", colorize),
        Value::Bool(true) => color("yes", "32", colorize),
        Value::Bool(false) => color("no", "33", colorize),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => "none".to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(map) => {
            let friend = map.get("friend").and_then(Value::as_bool).unwrap_or(false);
            let links = map
                .get("link_details")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let verdict = if friend {
                color("seo-friendly", "32", colorize)
            } else {
                color("not seo-friendly", "33", colorize)
            };
            format!("{links} links, {verdict}")
        }
    }
}

pub fn format_error(out: &ErrorOutput, colorize: bool) -> String {
    let mut buf = String::new();
    let header = color("[ERROR]", "31", colorize);
    let message = out
        .message
        .as_deref()
        .unwrap_or_else(|| out.error.message.as_str());
    writeln!(buf, "{} {}", header, message).ok();
    if let Some(remediation) = &out.error.remediation {
        writeln!(buf, "Hint: {}", remediation).ok();
    }
    buf
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
