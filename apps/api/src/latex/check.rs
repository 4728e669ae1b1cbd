//! Structural sanity checks run on every generated document before it is handed out.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::latex::scan::strip_comments;

static RE_ENVIRONMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(begin|end)\s*\{([^{}]+)\}").unwrap());

const LIST_ENVIRONMENTS: &[&str] = &["itemize", "enumerate", "description"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupIssue {
    #[error("missing {0}")]
    MissingEnvelope(&'static str),

    #[error("unexpected closing brace at byte {0}")]
    UnexpectedClosingBrace(usize),

    #[error("{0} unclosed brace(s) at end of document")]
    UnclosedBraces(usize),

    #[error("unbalanced math delimiters")]
    UnbalancedMath,

    #[error("\\end{{{found}}} does not close \\begin{{{expected}}}")]
    MismatchedEnvironment { expected: String, found: String },

    #[error("\\begin{{{0}}} is never closed")]
    UnclosedEnvironment(String),

    #[error("\\end{{{0}}} has no matching \\begin")]
    StrayEnd(String),

    #[error("{0} environment has no items")]
    EmptyList(String),
}

/// Checks that a document has its envelope, balanced braces and math, properly
/// nested body environments and no list without an item.
pub fn check_well_formed(source: &str) -> Result<(), MarkupIssue> {
    let source = strip_comments(source);

    if !source.contains(r"\documentclass") {
        return Err(MarkupIssue::MissingEnvelope(r"\documentclass"));
    }
    let body_start = source
        .find(r"\begin{document}")
        .ok_or(MarkupIssue::MissingEnvelope(r"\begin{document}"))?;
    let body_end = source
        .rfind(r"\end{document}")
        .ok_or(MarkupIssue::MissingEnvelope(r"\end{document}"))?;
    if body_end < body_start {
        return Err(MarkupIssue::MissingEnvelope(r"\end{document}"));
    }

    check_delimiters(&source)?;
    check_environments(&source[body_start + r"\begin{document}".len()..body_end])
}

fn check_delimiters(source: &str) -> Result<(), MarkupIssue> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut dollars = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(MarkupIssue::UnexpectedClosingBrace(i))?;
            }
            b'$' => dollars += 1,
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return Err(MarkupIssue::UnclosedBraces(depth));
    }
    if dollars % 2 != 0 {
        return Err(MarkupIssue::UnbalancedMath);
    }
    Ok(())
}

fn check_environments(body: &str) -> Result<(), MarkupIssue> {
    // (name, offset just past the \begin{..})
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for caps in RE_ENVIRONMENT.captures_iter(body) {
        let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().trim();
        if kind.as_str() == "begin" {
            stack.push((name, whole.end()));
            continue;
        }
        match stack.pop() {
            Some((open, inner_start)) if open == name => {
                let inner = &body[inner_start..whole.start()];
                if LIST_ENVIRONMENTS.contains(&name) && !inner.contains(r"\item") {
                    return Err(MarkupIssue::EmptyList(name.to_string()));
                }
            }
            Some((open, _)) => {
                return Err(MarkupIssue::MismatchedEnvironment {
                    expected: open.to_string(),
                    found: name.to_string(),
                })
            }
            None => return Err(MarkupIssue::StrayEnd(name.to_string())),
        }
    }

    match stack.pop() {
        Some((open, _)) => Err(MarkupIssue::UnclosedEnvironment(open.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> String {
        format!("\\documentclass{{article}}\n\\begin{{document}}\n{body}\n\\end{{document}}\n")
    }

    #[test]
    fn test_accepts_minimal_document() {
        assert_eq!(check_well_formed(&doc("Hello \\& welcome")), Ok(()));
    }

    #[test]
    fn test_missing_envelope() {
        assert_eq!(
            check_well_formed("\\begin{document}x\\end{document}"),
            Err(MarkupIssue::MissingEnvelope(r"\documentclass"))
        );
        assert_eq!(
            check_well_formed("\\documentclass{article}\n\\begin{document}x"),
            Err(MarkupIssue::MissingEnvelope(r"\end{document}"))
        );
    }

    #[test]
    fn test_braces() {
        assert!(matches!(
            check_well_formed(&doc("\\textbf{open")),
            Err(MarkupIssue::UnclosedBraces(1))
        ));
        assert!(matches!(
            check_well_formed(&doc("close}")),
            Err(MarkupIssue::UnexpectedClosingBrace(_))
        ));
        assert_eq!(check_well_formed(&doc(r"escaped \{ and \}")), Ok(()));
    }

    #[test]
    fn test_math_delimiters() {
        assert_eq!(check_well_formed(&doc("a $|$ b")), Ok(()));
        assert_eq!(check_well_formed(&doc("costs $5")), Err(MarkupIssue::UnbalancedMath));
        assert_eq!(check_well_formed(&doc(r"costs \$5")), Ok(()));
    }

    #[test]
    fn test_environment_nesting() {
        let bad = doc("\\begin{center}\\begin{minipage}{1cm}x\\end{center}\\end{minipage}");
        assert!(matches!(
            check_well_formed(&bad),
            Err(MarkupIssue::MismatchedEnvironment { .. })
        ));
        assert_eq!(
            check_well_formed(&doc("\\begin{center}x")),
            Err(MarkupIssue::UnclosedEnvironment("center".into()))
        );
        assert_eq!(
            check_well_formed(&doc("x\\end{center}")),
            Err(MarkupIssue::StrayEnd("center".into()))
        );
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert_eq!(
            check_well_formed(&doc("\\begin{itemize}\n\\end{itemize}")),
            Err(MarkupIssue::EmptyList("itemize".into()))
        );
        assert_eq!(
            check_well_formed(&doc("\\begin{itemize}\\item one\\end{itemize}")),
            Ok(())
        );
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(check_well_formed(&doc("text % stray { in comment")), Ok(()));
    }
}
