use std::fmt;

/// Coarse error buckets used for the `[CODE]` prefix, the hint line and the
/// `category` field of `command.failed` telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Provider,
    Session,
    Workflow,
    Internal,
}

/// Checked in order against the lowercased error chain; first match wins.
const CATEGORY_RULES: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::Input,
        &["cannot be empty", "profile", "unknown argument"],
    ),
    (
        ErrorCategory::Provider,
        &["api_key", "provider", "ollama_host"],
    ),
    (ErrorCategory::Session, &["session", "sqlite"]),
    (ErrorCategory::Workflow, &["agent", "runner", "workflow"]),
];

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Provider => "PROVIDER",
            ErrorCategory::Session => "SESSION",
            ErrorCategory::Workflow => "WORKFLOW",
            ErrorCategory::Internal => "INTERNAL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ErrorCategory::Input => {
                "Check the trip request and flags, or run trip-planner --help."
            }
            ErrorCategory::Provider => {
                "Export GOOGLE_API_KEY (or another provider key) or pass --provider ollama."
            }
            ErrorCategory::Session => {
                "Check --session-backend and --session-db-url; `trip-planner doctor` opens the store."
            }
            ErrorCategory::Workflow => {
                "Inspect the plan with `trip-planner agents` and rerun with RUST_LOG=info."
            }
            ErrorCategory::Internal => "Rerun with RUST_LOG=debug and keep the log.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn categorize_error(err: &anyhow::Error) -> ErrorCategory {
    let chain = format!("{err:#}").to_ascii_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| chain.contains(needle)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::Internal)
}

/// Two-line rendering printed on stderr when a command fails.
pub fn format_cli_error(err: &anyhow::Error, show_sensitive_config: bool) -> String {
    let category = categorize_error(err);
    let mut message = format!("{err:#}");
    if !show_sensitive_config {
        message = redact_sqlite_urls(&message);
    }
    format!("[{category}] {message}\nHint: {}", category.hint())
}

/// Replace every `sqlite:` URL embedded in free text.
pub fn redact_sqlite_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("sqlite:") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = tail.find(ends_url).unwrap_or(tail.len());
        out.push_str(&redact_sqlite_url_value(&tail[..end]));
        rest = &tail[end..];
    }

    out.push_str(rest);
    out
}

fn ends_url(ch: char) -> bool {
    ch.is_whitespace() || "\"'()[]{},;".contains(ch)
}

pub fn redact_sqlite_url_value(url: &str) -> String {
    if url.starts_with("sqlite://") {
        "sqlite://[REDACTED]".to_string()
    } else if url.starts_with("sqlite:") {
        "sqlite:[REDACTED]".to_string()
    } else {
        url.to_string()
    }
}
