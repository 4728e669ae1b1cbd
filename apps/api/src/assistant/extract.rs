//! Pulls usable payloads out of free-form model output.

use regex::Regex;
use std::sync::LazyLock;

use crate::llm_client::strip_code_fences;

static RE_TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

const DOCUMENT_START: &str = r"\documentclass";

/// The JSON object in `text`: fences stripped, cut from the first `{` to the
/// last `}`, trailing commas removed. `None` when there is no object at all.
pub fn json_object(text: &str) -> Option<String> {
    let text = strip_code_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(RE_TRAILING_COMMA.replace_all(&text[start..=end], "$1").into_owned())
}

/// The LaTeX document in `text`: fences stripped, cut from `\documentclass`.
pub fn latex_document(text: &str) -> Option<&str> {
    let text = strip_code_fences(text);
    let start = text.find(DOCUMENT_START)?;
    Some(text[start..].trim_end())
}
