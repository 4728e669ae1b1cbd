//! Template registry and the shared building blocks of every layout.
//!
//! Each template is a pure `fn(&ResumeRecord) -> String`. Templates differ in
//! geometry, fonts, section order, columns and decoration, but they all follow
//! the same rules: a section with nothing to show emits no heading and no
//! body, no list environment is ever emitted without an `\item`, and every
//! free-text field goes through [`escape_latex`].

mod academic;
mod ats;
mod classic;
mod developer;
mod executive;
mod glacial;
mod minimal;
mod modern_compact;
mod sidebar;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::latex::{check_well_formed, escape_latex, latex_date, MarkupIssue};
use crate::models::resume::{
    CertificationItem, CustomSection, LanguageItem, PersonalInfo, ProfileLink, ResumeRecord,
    SkillCategory,
};

/// File name the compile step uploads the profile image under.
pub const PROFILE_IMAGE_PATH: &str = "profile.jpg";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub preview: &'static str,
    #[serde(skip)]
    pub example: fn() -> ResumeRecord,
    #[serde(skip)]
    pub render: fn(&ResumeRecord) -> String,
}

static TEMPLATES: [Template; 9] = [
    Template {
        id: "classic",
        name: "Classic Professional",
        description: "Clean and professional layout with centered header",
        preview: "/templates/classic-preview.png",
        example: classic::example,
        render: classic::render,
    },
    Template {
        id: "modern-compact",
        name: "Modern Compact",
        description: "Compact layout optimized for single-page resumes",
        preview: "/templates/modern-preview.png",
        example: modern_compact::example,
        render: modern_compact::render,
    },
    Template {
        id: "developer",
        name: "Developer Resume",
        description: "Optimized for software developers and engineers",
        preview: "/templates/developer-preview.png",
        example: developer::example,
        render: developer::render,
    },
    Template {
        id: "glacial",
        name: "Glacial Professional",
        description: "A professional two-column layout with profile picture support, skill bars, and blue accents. Perfect for business and management roles.",
        preview: "/templates/glacial-preview.png",
        example: glacial::example,
        render: glacial::render,
    },
    Template {
        id: "academic",
        name: "Academic CV",
        description: "Serif layout with one subsection per entry for research and teaching careers",
        preview: "/templates/academic-preview.png",
        example: academic::example,
        render: academic::render,
    },
    Template {
        id: "executive",
        name: "Executive",
        description: "Bold banner header and core competencies table for senior leadership roles",
        preview: "/templates/executive-preview.png",
        example: executive::example,
        render: executive::render,
    },
    Template {
        id: "minimal",
        name: "Minimal",
        description: "Sans-serif, whitespace-heavy layout without rules or color",
        preview: "/templates/minimal-preview.png",
        example: minimal::example,
        render: minimal::render,
    },
    Template {
        id: "sidebar",
        name: "Sidebar",
        description: "Two columns with skills, languages and certifications in a narrow sidebar",
        preview: "/templates/sidebar-preview.png",
        example: sidebar::example,
        render: sidebar::render,
    },
    Template {
        id: "ats",
        name: "ATS Friendly",
        description: "Single-column layout with plain structure that applicant tracking systems read reliably",
        preview: "/templates/ats-preview.png",
        example: ats::example,
        render: ats::render,
    },
];

pub fn all() -> &'static [Template] {
    &TEMPLATES
}

/// Returns the template with `id`, or the first (`classic`) when there is none.
pub fn lookup(id: &str) -> &'static Template {
    TEMPLATES
        .iter()
        .find(|template| template.id == id)
        .unwrap_or(&TEMPLATES[0])
}

pub fn exists(id: &str) -> bool {
    TEMPLATES.iter().any(|template| template.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("template '{template}' produced malformed markup: {issue}")]
    Malformed {
        template: &'static str,
        issue: MarkupIssue,
    },
}

/// Renders `record` with the template named `template_id` and checks the result.
pub fn generate(record: &ResumeRecord, template_id: &str) -> Result<String, GenerationError> {
    let template = lookup(template_id);
    let markup = (template.render)(record);
    check_well_formed(&markup).map_err(|issue| GenerationError::Malformed {
        template: template.id,
        issue,
    })?;
    debug!(template = template.id, bytes = markup.len(), "generated markup");
    Ok(markup)
}

// ────────────────────────────────────────────────────────────────────────────
// Shared rendering helpers
// ────────────────────────────────────────────────────────────────────────────

/// Trimmed and escaped free text.
pub(crate) fn esc(text: &str) -> String {
    escape_latex(text.trim())
}

pub(crate) fn present(text: &str) -> bool {
    !text.trim().is_empty()
}

/// A hyperlink target. `\href` reads its URL almost verbatim, so only the
/// characters that would break the argument are escaped or dropped.
pub(crate) fn href_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.trim().chars() {
        match c {
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '$' => out.push_str(r"\%24"),
            '^' => out.push_str(r"\%5E"),
            '\\' | '{' | '}' => {}
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn email_link(email: &str) -> String {
    format!(r"\href{{mailto:{}}}{{{}}}", href_target(email), esc(email))
}

pub(crate) fn phone_link(phone: &str) -> String {
    format!(r"\href{{tel:{}}}{{{}}}", href_target(phone), esc(phone))
}

/// Visible text of a profile: its label, else the network name, else the URL.
pub(crate) fn profile_text(profile: &ProfileLink) -> String {
    [&profile.label, &profile.network, &profile.url]
        .into_iter()
        .find(|text| present(text))
        .map(|text| esc(text))
        .unwrap_or_default()
}

pub(crate) fn profile_link(profile: &ProfileLink) -> String {
    if present(&profile.url) {
        format!(r"\href{{{}}}{{{}}}", href_target(&profile.url), profile_text(profile))
    } else {
        profile_text(profile)
    }
}

/// A link whose visible text is fixed, e.g. `Link`.
pub(crate) fn labeled_link(url: &str, text: &str) -> String {
    format!(r"\href{{{}}}{{{}}}", href_target(url), text)
}

/// Contact pieces in the usual order, each already rendered.
pub(crate) fn contact_parts(info: &PersonalInfo, location_first: bool) -> Vec<String> {
    let mut parts = Vec::new();
    if location_first && present(&info.location) {
        parts.push(esc(&info.location));
    }
    if present(&info.email) {
        parts.push(email_link(&info.email));
    }
    if present(&info.phone) {
        parts.push(phone_link(&info.phone));
    }
    if !location_first && present(&info.location) {
        parts.push(esc(&info.location));
    }
    parts.extend(info.profiles.iter().map(profile_link).filter(|p| !p.is_empty()));
    parts
}

/// An `itemize` holding one item per non-blank entry, or nothing at all.
pub(crate) fn itemize(options: &str, prefix: &str, items: &[String]) -> String {
    let body: Vec<String> = items
        .iter()
        .filter(|item| present(item))
        .map(|item| format!("  \\item {prefix}{}\n", esc(item)))
        .collect();
    if body.is_empty() {
        return String::new();
    }
    let options = if options.is_empty() {
        String::new()
    } else {
        format!("[{options}]")
    };
    format!("\\begin{{itemize}}{options}\n{}\\end{{itemize}}\n", body.concat())
}

/// Joins the non-empty lines with LaTeX line breaks.
pub(crate) fn stack(lines: &[String]) -> String {
    let lines: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n", lines.join("\\\\\n"))
}

/// Skill categories with a name or at least one skill.
pub(crate) fn visible_skills(record: &ResumeRecord) -> Vec<&SkillCategory> {
    record
        .skills
        .iter()
        .filter(|c| present(&c.category) || c.skills.iter().any(|s| present(s)))
        .collect()
}

pub(crate) fn visible_languages(record: &ResumeRecord) -> Vec<&LanguageItem> {
    record.languages.iter().filter(|l| present(&l.language)).collect()
}

/// Custom sections that have at least one non-blank item.
pub(crate) fn visible_custom(record: &ResumeRecord) -> Vec<&CustomSection> {
    record
        .custom_sections
        .iter()
        .filter(|s| s.items.iter().any(|item| present(item)))
        .collect()
}

pub(crate) fn has_header(info: &PersonalInfo) -> bool {
    present(&info.name) || info.has_contact()
}

/// `\textbf{Name} -- Issuer (Date) \href{..}{Link}`, leaving out whatever is blank.
pub(crate) fn certification_line(cert: &CertificationItem) -> String {
    let mut line = format!(r"\textbf{{{}}}", esc(&cert.name));
    if present(&cert.issuer) {
        line.push_str(&format!(" -- {}", esc(&cert.issuer)));
    }
    if present(&cert.date) {
        line.push_str(&format!(" ({})", latex_date(&cert.date)));
    }
    if let Some(link) = link_of(&cert.link) {
        line.push(' ');
        line.push_str(&labeled_link(link, "Link"));
    }
    line
}

/// `Language (Proficiency)`.
pub(crate) fn language_pair(language: &LanguageItem) -> String {
    format!("{} ({})", esc(&language.language), language.proficiency)
}

pub(crate) fn link_of(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|url| present(url))
}

/// Skills joined for display.
pub(crate) fn skill_list(skills: &[String]) -> String {
    skills
        .iter()
        .filter(|skill| present(skill))
        .map(|skill| esc(skill))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stable pseudo level in `60..100` for skill bars. The record has no skill
/// levels, so the bar length is derived from the name.
pub(crate) fn skill_level(skill: &str) -> u8 {
    let hash = skill
        .bytes()
        .fold(0x811c_9dc5_u32, |acc, b| (acc ^ u32::from(b)).wrapping_mul(0x0100_0193));
    60 + (hash % 40) as u8
}

#[cfg(test)]
pub(crate) mod testing;
