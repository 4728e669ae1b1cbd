use regex::Regex;
use std::sync::LazyLock;

use super::blocks::LIST_ENVIRONMENTS;
use crate::latex::escape::{escape_latex, unescape_latex};
use crate::latex::scan::{balanced_group, environments, list_items, plain};

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:section|sectiontitle|cvsection)\*?\s*\{").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Custom,
}

const SYNONYMS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "executive summary",
            "career summary",
            "objective",
            "career objective",
            "profile",
            "professional profile",
            "about",
            "about me",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "professional experience",
            "work experience",
            "employment history",
            "employment",
            "work history",
            "research experience",
        ],
    ),
    (
        SectionKind::Education,
        &["education", "academic background", "education and training"],
    ),
    (
        SectionKind::Skills,
        &["skills", "technical skills", "core competencies", "key skills", "competencies"],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "key projects",
            "academic projects",
            "personal projects",
            "selected projects",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certification",
            "certificates",
            "licenses and certifications",
            "honours and awards",
            "honors and awards",
            "awards",
        ],
    ),
    (SectionKind::Languages, &["languages", "language skills"]),
];

/// Headings that title a user's own list as often as a built-in section. Under
/// one of these, a section that is only a plain-text list stays custom.
const AMBIGUOUS: &[&str] = &[
    "objective",
    "career objective",
    "profile",
    "professional profile",
    "about",
    "about me",
    "employment",
    "awards",
    "honours and awards",
    "honors and awards",
    "certificates",
];

#[derive(Debug, Clone)]
pub(super) struct Section<'a> {
    pub kind: SectionKind,
    pub title: String,
    pub start: usize,
    pub content: &'a str,
}

/// Maps a heading to a section kind; anything unrecognized is a custom section.
pub(super) fn classify(title: &str) -> SectionKind {
    let normalized = normalize(title);
    SYNONYMS
        .iter()
        .find(|(_, names)| names.contains(&normalized.as_str()))
        .map(|(kind, _)| *kind)
        .unwrap_or(SectionKind::Custom)
}

/// Like [`classify`], but an ambiguous heading over a plain-text list is custom.
fn classify_section(title: &str, content: &str) -> SectionKind {
    let kind = classify(title);
    if kind != SectionKind::Custom
        && AMBIGUOUS.contains(&normalize(title).as_str())
        && plain_list(content)
    {
        return SectionKind::Custom;
    }
    kind
}

fn normalize(title: &str) -> String {
    let normalized = title
        .to_lowercase()
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    normalized.trim_end_matches(':').trim().to_string()
}

/// The section opens with a list whose items are escaped text and nothing else,
/// optionally behind a font size switch.
fn plain_list(content: &str) -> bool {
    let content = content.trim_start();
    let Some(list) = environments(content, LIST_ENVIRONMENTS).into_iter().next() else {
        return false;
    };
    if list.start != 0 {
        return false;
    }
    let items = list_items(list.inner);
    !items.is_empty() && items.iter().all(|item| plain_item(item))
}

fn plain_item(item: &str) -> bool {
    let text = item.trim();
    let text = [r"\small ", r"\footnotesize "]
        .iter()
        .find_map(|size| text.strip_prefix(size))
        .unwrap_or(text)
        .trim();
    escape_latex(&unescape_latex(text)) == text
}

/// Splits a document body at its section headings.
pub(super) fn locate(body: &str) -> Vec<Section<'_>> {
    let mut heads = Vec::new();
    for m in RE_HEADING.find_iter(body) {
        if let Some((title, after)) = balanced_group(body, m.end() - 1) {
            heads.push((m.start(), after, plain(title)));
        }
    }

    let mut sections = Vec::with_capacity(heads.len());
    for (k, (start, after, title)) in heads.iter().enumerate() {
        let end = heads.get(k + 1).map(|next| next.0).unwrap_or(body.len());
        sections.push(Section {
            kind: classify_section(title, &body[(*after).min(end)..end]),
            title: title.clone(),
            start: *start,
            content: &body[(*after).min(end)..end],
        });
    }
    sections
}
