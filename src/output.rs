//! Rendering of command results and failures.
//!
//! Results go to stdout, failures to stderr. With `--format json` both are
//! single JSON documents so scripts can parse either stream.

use serde::Serialize;
use tabled::{Table, Tabled};

use purview_core::error::{AppError, ErrorKind, NameCandidate};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

/// Print rows as a table, or as a JSON array.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(rows, "[]")),
        OutputFormat::Table if rows.is_empty() => println!("Nothing to show."),
        OutputFormat::Table => println!("{}", Table::new(rows)),
    }
}

/// Print a single value as JSON, or through `render` for tables.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat, render: impl FnOnce(&T)) {
    match format {
        OutputFormat::Json => println!("{}", to_json(item, "{}")),
        OutputFormat::Table => render(item),
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Aligned `key: value` line under a status message.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// A failure before any command ran, such as an unreadable config file.
pub fn print_startup_error(msg: &str) {
    eprintln!("✗ {msg}");
}

#[derive(Debug, Serialize, Tabled)]
struct CandidateRow<'a> {
    id: &'a str,
    friendly_name: &'a str,
    parent: &'a str,
}

impl<'a> From<&'a NameCandidate> for CandidateRow<'a> {
    fn from(c: &'a NameCandidate) -> Self {
        Self {
            id: &c.id,
            friendly_name: &c.friendly_name,
            parent: c.parent_friendly_name.as_deref().unwrap_or("-"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: ErrorKind,
    message: &'a str,
    #[serde(skip_serializing_if = "no_candidates")]
    candidates: &'a [NameCandidate],
}

fn no_candidates(candidates: &&[NameCandidate]) -> bool {
    candidates.is_empty()
}

/// Print a failed command to stderr.
///
/// Ambiguous names list their candidates as a table so the user can pick an
/// id and run the command again.
pub fn print_failure(err: &AppError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let body = ErrorBody {
                kind: err.kind,
                message: &err.message,
                candidates: &err.candidates,
            };
            eprintln!("{}", to_json(&body, "{}"));
        }
        OutputFormat::Table if err.candidates.is_empty() => eprintln!("✗ {err}"),
        OutputFormat::Table => {
            let headline = err.message.lines().next().unwrap_or_default();
            let rows: Vec<CandidateRow<'_>> = err.candidates.iter().map(Into::into).collect();
            eprintln!("✗ {}: {headline}", err.kind);
            eprintln!("{}", Table::new(rows));
            eprintln!("Pass one of these ids, or --force-actual-name to use the literal id.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambiguous() -> AppError {
        AppError::ambiguous(
            "Sales",
            vec![
                NameCandidate {
                    id: "sales".into(),
                    friendly_name: "Sales".into(),
                    parent_friendly_name: Some("contoso".into()),
                },
                NameCandidate {
                    id: "xyz789".into(),
                    friendly_name: "Sales".into(),
                    parent_friendly_name: None,
                },
            ],
        )
    }

    #[test]
    fn test_candidate_row_without_parent() {
        let err = ambiguous();
        let rows: Vec<CandidateRow<'_>> = err.candidates.iter().map(Into::into).collect();
        assert_eq!(rows[0].parent, "contoso");
        assert_eq!(rows[1].parent, "-");
    }

    #[test]
    fn test_error_body_lists_candidates_only_when_present() {
        let err = ambiguous();
        let body = ErrorBody {
            kind: err.kind,
            message: &err.message,
            candidates: &err.candidates,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["kind"], "AmbiguousName");
        assert_eq!(value["candidates"][1]["id"], "xyz789");

        let err = AppError::not_found("gone");
        let body = ErrorBody {
            kind: err.kind,
            message: &err.message,
            candidates: &err.candidates,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("candidates").is_none());
    }
}
