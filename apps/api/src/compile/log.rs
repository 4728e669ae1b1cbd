//! Maps a TeX log to line-tagged errors.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::document::CompilationError;

static RE_LINE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"l\.(\d+)").unwrap());

/// How far past a `!` line TeX prints the `l.<n>` context.
const LINE_LOOKAHEAD: usize = 4;

/// One error per `! message` line, tagged with the first `l.<n>` found in the
/// next few lines (0 when there is none). Falls back to `fallback` alone when
/// the log has no error lines.
pub fn compile_errors(logs: &str, fallback: &str) -> Vec<CompilationError> {
    let lines: Vec<&str> = logs.lines().collect();
    let mut errors = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(message) = line.strip_prefix("! ") else {
            continue;
        };
        let message = message.trim();
        if message.is_empty() {
            continue;
        }
        let line_number = lines
            .iter()
            .skip(i + 1)
            .take(LINE_LOOKAHEAD)
            .find_map(|next| RE_LINE_REF.captures(next))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0);
        errors.push(CompilationError {
            line: line_number,
            message: message.to_string(),
        });
    }

    if errors.is_empty() {
        errors.push(CompilationError::unattributed(fallback));
    }
    errors
}
