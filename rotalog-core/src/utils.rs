use std::error::Error;

use chrono::Utc;

fn timestamp() -> impl std::fmt::Display {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f")
}

/// `source()` chain of `err`, outermost first.
pub fn error_trace(err: &dyn Error) -> String {
    let mut trace = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push(cause.to_string());
        source = cause.source();
    }
    trace.join(" <- ")
}

/// Formats one newline-terminated record line.
pub fn format_record(message: &str, error: Option<&dyn Error>) -> String {
    let time = timestamp();
    match error {
        None => format!("{time} - {message}\n"),
        Some(err) => format!(
            "{time} - {message}. EXCEPTION: {err}. STACK TRACE: {}.\n",
            error_trace(err)
        ),
    }
}
