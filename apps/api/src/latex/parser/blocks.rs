//! Splitting a section into entries for each supported layout dialect.

use regex::Regex;
use std::sync::LazyLock;

use crate::latex::scan::{
    environments, find_command, find_commands, leading_command, line_spans, list_items, plain,
    separators,
};

/// `\\` (with optional `*` and spacing argument) or a newline.
pub(super) static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\\*?(?:\[[^\]]*\])?|\n").unwrap());

static RE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\item\b(?:\[[^\]]*\])?").unwrap());

pub(super) const LIST_ENVIRONMENTS: &[&str] = &["itemize", "enumerate", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Dialect {
    /// Positional macro arguments, e.g. `\resumeSubheading{..}{..}{..}{..}`.
    Macro,
    /// `\subsection*{Title}` followed by detail lines.
    Subheading,
    /// A line led by `\textbf{Title}` with an optional column separator.
    BoldLabel,
}

/// One entry: its heading pieces and everything up to the next entry.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Block<'a> {
    pub args: Vec<&'a str>,
    /// Text on the heading line before any column separator.
    pub inline: &'a str,
    /// Text after the last column separator on the heading line.
    pub right: &'a str,
    pub body: &'a str,
}

impl<'a> Block<'a> {
    pub fn title(&self) -> String {
        self.args.first().map(|arg| plain(arg)).unwrap_or_default()
    }
}

pub(super) fn detect(section: &str, macro_name: &str) -> Option<Dialect> {
    if find_command(section, macro_name, 0).is_some() {
        Some(Dialect::Macro)
    } else if find_command(section, "subsection", 0).is_some() {
        Some(Dialect::Subheading)
    } else if !bold_blocks(section).is_empty() {
        Some(Dialect::BoldLabel)
    } else {
        None
    }
}

pub(super) fn blocks<'a>(section: &'a str, dialect: Dialect, macro_name: &str, arity: usize) -> Vec<Block<'a>> {
    match dialect {
        Dialect::Macro => command_blocks(section, macro_name, arity),
        Dialect::Subheading => command_blocks(section, "subsection", 1),
        Dialect::BoldLabel => bold_blocks(section),
    }
}

fn command_blocks<'a>(section: &'a str, name: &str, arity: usize) -> Vec<Block<'a>> {
    let found = find_commands(section, name, arity);
    found
        .iter()
        .enumerate()
        .map(|(k, cmd)| {
            let end = found.get(k + 1).map(|next| next.start).unwrap_or(section.len());
            Block {
                args: cmd.args.clone(),
                inline: "",
                right: "",
                body: &section[cmd.end.min(end)..end],
            }
        })
        .collect()
}

fn bold_blocks(section: &str) -> Vec<Block<'_>> {
    let lists = list_ranges(section);
    let mut heads = Vec::new();
    for (start, end) in line_spans(section) {
        if in_ranges(&lists, start) {
            continue;
        }
        if let Some((title, rest)) = leading_command(&section[start..end], "textbf") {
            heads.push((start, end, title, rest));
        }
    }

    heads
        .iter()
        .enumerate()
        .map(|(k, &(_, line_end, title, rest))| {
            let span_end = heads.get(k + 1).map(|next| next.0).unwrap_or(section.len());
            let (inline, right) = split_columns(rest);
            Block {
                args: vec![title],
                inline,
                right,
                body: &section[line_end.min(span_end)..span_end],
            }
        })
        .collect()
}

/// Splits a heading remainder at its first and last column separators.
pub(super) fn split_columns(rest: &str) -> (&str, &str) {
    let seps = separators(rest);
    match (seps.first(), seps.last()) {
        (Some(first), Some(last)) => (&rest[..first.0], &rest[last.1..]),
        _ => (rest, ""),
    }
}

fn list_ranges(src: &str) -> Vec<(usize, usize)> {
    environments(src, LIST_ENVIRONMENTS)
        .iter()
        .map(|env| (env.start, env.end))
        .collect()
}

fn in_ranges(ranges: &[(usize, usize)], offset: usize) -> bool {
    ranges.iter().any(|(start, end)| offset >= *start && offset < *end)
}

/// Lines outside list environments that carry text, excluding `\begin`/`\end` lines.
pub(super) fn body_lines(body: &str) -> Vec<&str> {
    let lists = list_ranges(body);
    line_spans(body)
        .into_iter()
        .filter(|(start, _)| !in_ranges(&lists, *start))
        .map(|(start, end)| &body[start..end])
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with(r"\begin") && !trimmed.starts_with(r"\end")
        })
        .filter(|line| !plain(line).is_empty())
        .collect()
}

/// The first body line led by `\textit{..}`: its argument and the rest of the line.
pub(super) fn detail_line(body: &str) -> Option<(&str, &str)> {
    body_lines(body)
        .into_iter()
        .find_map(|line| leading_command(line, "textit"))
}

/// Text following a detail's `\textit{..}`: after a column separator, or after a comma.
pub(super) fn trailing_text(rest: &str) -> String {
    if let Some(last) = separators(rest).last() {
        return plain(&rest[last.1..]);
    }
    let text = plain(rest);
    match text.strip_prefix(',') {
        Some(after) => after.trim().to_string(),
        None => text,
    }
}

/// Plain text of every top-level list item in `body`.
pub(super) fn bullets(body: &str) -> Vec<String> {
    environments(body, LIST_ENVIRONMENTS)
        .iter()
        .flat_map(|env| list_items(env.inner))
        .map(plain)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Plain text of every `\resumeItem{..}` in `body`.
pub(super) fn macro_items(body: &str) -> Vec<String> {
    find_commands(body, "resumeItem", 1)
        .iter()
        .filter_map(|cmd| cmd.args.first().map(|arg| plain(arg)))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Raw fragments split at line breaks and `\item` markers.
pub(super) fn fragments(section: &str) -> Vec<String> {
    let unitemized = RE_ITEM.replace_all(section, "\n");
    RE_LINE_BREAK
        .split(&unitemized)
        .map(str::to_string)
        .collect()
}
