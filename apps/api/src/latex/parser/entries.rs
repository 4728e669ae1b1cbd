//! Turning the blocks of a section into typed record items.

use regex::Regex;
use std::sync::LazyLock;

use crate::latex::escape::{split_date_range, unescape_latex};
use crate::latex::parser::blocks::{
    blocks, body_lines, bullets, detail_line, detect, fragments, macro_items, trailing_text, Block,
    Dialect, LIST_ENVIRONMENTS,
};
use crate::latex::parser::header::RE_DELIMITERS;
use crate::latex::scan::{
    environments, find_command, find_commands, leading_command, list_items, plain,
    remove_commands, separators, strip_environment_markers,
};
use crate::models::resume::{
    new_id, CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem,
    ProjectItem, SkillCategory,
};

static RE_GPA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*GPA\s*:?\s*(.+?)\s*$").unwrap());
static RE_TECH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:tech(?:nologies)?|tech stack|stack)\s*:\s*(.+)$").unwrap()
});
static RE_GRADUATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:graduated|graduation|expected)\s*:?\s*").unwrap()
});
static RE_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*[:\-\x{2013}\x{2014}(]+\s*([^()]+?)\)?$").unwrap()
});

const EXPERIENCE_MACRO: &str = "resumeSubheading";
const PROJECT_MACRO: &str = "resumeProjectHeading";

// ─────────────────────────────────────────────────────────────────────────────
// Experience and education
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn experience(section: &str) -> Vec<ExperienceItem> {
    let Some(dialect) = detect(section, EXPERIENCE_MACRO) else {
        return Vec::new();
    };
    blocks(section, dialect, EXPERIENCE_MACRO, 4)
        .iter()
        .map(|block| experience_item(block, dialect))
        .collect()
}

fn experience_item(block: &Block<'_>, dialect: Dialect) -> ExperienceItem {
    let mut item = ExperienceItem {
        id: new_id(),
        ..ExperienceItem::default()
    };
    let dates = match dialect {
        Dialect::Macro => {
            item.job_title = block.title();
            item.company = arg_text(block, 2);
            item.location = arg_text(block, 3);
            item.bullet_points = macro_items(block.body);
            arg_text(block, 1)
        }
        Dialect::Subheading => {
            item.bullet_points = bullets(block.body);
            match placed_detail(block.body) {
                Some((place, dates)) => {
                    item.job_title = block.title();
                    item.company = place.first().cloned().unwrap_or_default();
                    item.location = place.get(1).cloned().unwrap_or_default();
                    dates
                }
                None => {
                    let (job, company) = split_at_word(&block.title(), "at");
                    item.job_title = job;
                    item.company = company;
                    let meta = meta_parts(block.body);
                    item.location = meta.get(1).cloned().unwrap_or_default();
                    meta.first().cloned().unwrap_or_default()
                }
            }
        }
        Dialect::BoldLabel => {
            item.job_title = block.title();
            match detail_line(block.body) {
                Some((company, rest)) => {
                    item.company = plain(company);
                    item.location = trailing_text(rest);
                }
                None => item.company = clean_inline(block.inline),
            }
            item.bullet_points = bullets(block.body);
            plain(block.right)
        }
    };
    if item.bullet_points.is_empty() {
        item.bullet_points = macro_items(block.body);
    }

    let (start, end, current) = split_date_range(&dates);
    item.start_date = start;
    item.end_date = end;
    item.current = current;
    item
}

pub(super) fn education(section: &str) -> Vec<EducationItem> {
    let Some(dialect) = detect(section, EXPERIENCE_MACRO) else {
        return Vec::new();
    };
    blocks(section, dialect, EXPERIENCE_MACRO, 4)
        .iter()
        .map(|block| education_item(block, dialect))
        .collect()
}

fn education_item(block: &Block<'_>, dialect: Dialect) -> EducationItem {
    let mut item = EducationItem {
        id: new_id(),
        ..EducationItem::default()
    };
    let mut notes = Vec::new();
    match dialect {
        Dialect::Macro => {
            item.institution = block.title();
            item.location = arg_text(block, 1);
            item.degree = arg_text(block, 2);
            item.graduation_date = arg_text(block, 3);
            item.bullet_points = macro_items(block.body);
        }
        Dialect::Subheading => {
            item.degree = block.title();
            if let Some(line) = body_lines(block.body)
                .into_iter()
                .find(|line| find_command(line, "textit", 1).is_some())
            {
                let meta = meta_parts(line);
                item.institution = meta.first().cloned().unwrap_or_default();
                item.location = meta.get(1).cloned().unwrap_or_default();
                if let Some(last) = separators(line).last() {
                    item.graduation_date = plain(&line[last.1..]);
                }
            }
            notes = body_lines(block.body).iter().map(|line| plain(line)).collect();
            item.bullet_points = bullets(block.body);
        }
        Dialect::BoldLabel => {
            item.institution = block.title();
            item.graduation_date = plain(block.right);
            let inline_degree = clean_inline(block.inline);
            let detail = detail_line(block.body).map(|(primary, rest)| (plain(primary), trailing_text(rest)));
            match (inline_degree.is_empty(), detail) {
                (true, Some((degree, location))) => {
                    item.degree = degree;
                    item.location = location;
                }
                (false, Some((primary, secondary))) => {
                    item.degree = inline_degree;
                    item.location = if secondary.is_empty() { primary } else { secondary };
                }
                (_, None) => item.degree = inline_degree,
            }
            notes = body_lines(block.body).iter().map(|line| plain(line)).collect();
            item.bullet_points = bullets(block.body);
        }
    }
    item.graduation_date = RE_GRADUATED
        .replace(&item.graduation_date, "")
        .trim()
        .to_string();

    item.gpa = take_gpa(&mut notes).or_else(|| take_gpa(&mut item.bullet_points));
    item
}

/// Splits `Title at Company` style headings.
fn split_at_word(title: &str, word: &str) -> (String, String) {
    let infix = format!(" {word} ");
    let prefix = format!("{word} ");
    if let Some((left, right)) = title.split_once(&infix) {
        (left.trim().to_string(), right.trim().to_string())
    } else if let Some(right) = title.strip_prefix(&prefix) {
        (String::new(), right.trim().to_string())
    } else {
        (title.to_string(), String::new())
    }
}

/// A `{\textit{Company | Location}} \hfill Dates` line: the place pieces and
/// the dates. Without the separator the line holds dates, as in `Title at Company`.
fn placed_detail(body: &str) -> Option<(Vec<String>, String)> {
    body.lines().find_map(|line| {
        let (place, rest) = leading_command(line, "textit")?;
        let (_, after) = separators(rest).last().copied()?;
        let parts = plain(place).split('|').map(|part| part.trim().to_string()).collect();
        Some((parts, plain(&rest[after..])))
    })
}

/// The `|`-separated pieces of the first `\textit{..}` in `text`.
fn meta_parts(text: &str) -> Vec<String> {
    find_command(text, "textit", 1)
        .and_then(|cmd| cmd.args.first().map(|arg| plain(arg)))
        .map(|meta| meta.split('|').map(|part| part.trim().to_string()).collect())
        .unwrap_or_default()
}

fn arg_text(block: &Block<'_>, index: usize) -> String {
    block.args.get(index).map(|arg| plain(arg)).unwrap_or_default()
}

/// Inline heading text with leading separators such as `--`, `,` or `at` removed.
fn clean_inline(inline: &str) -> String {
    let text = plain(inline);
    let text = text.trim_start_matches(|c: char| "-,:|\u{2013}\u{2014}".contains(c) || c.is_whitespace());
    text.strip_prefix("at ").unwrap_or(text).trim().to_string()
}

fn take_gpa(lines: &mut Vec<String>) -> Option<String> {
    let index = lines.iter().position(|line| RE_GPA.is_match(line))?;
    let line = lines.remove(index);
    RE_GPA
        .captures(&line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects and certifications
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn projects(section: &str) -> Vec<ProjectItem> {
    let Some(dialect) = detect(section, PROJECT_MACRO) else {
        return Vec::new();
    };
    blocks(section, dialect, PROJECT_MACRO, 2)
        .iter()
        .map(|block| project_item(block, dialect))
        .collect()
}

fn project_item(block: &Block<'_>, dialect: Dialect) -> ProjectItem {
    let mut item = ProjectItem {
        id: new_id(),
        ..ProjectItem::default()
    };

    if dialect == Dialect::Macro {
        let heading = block.args.first().copied().unwrap_or_default();
        let (name, rest) = bold_and_rest(heading);
        item.name = name;
        item.technologies = split_list(rest.trim_start_matches(|c: char| c == '|' || c.is_whitespace()));
        item.link = block.args.iter().find_map(|arg| first_link(arg));
        item.description = find_command(block.body, "resumeProjectDescription", 1)
            .and_then(|cmd| cmd.args.first().map(|arg| plain(arg)))
            .unwrap_or_default();
        item.bullet_points = macro_items(block.body);
        return item;
    }

    item.name = block.title();
    let heading_rest = [block.inline, block.right];
    let lines = body_lines(block.body);

    item.technologies = heading_rest
        .iter()
        .chain(lines.iter())
        .find_map(|line| tech_list(&plain(line)))
        .unwrap_or_default();
    item.link = heading_rest
        .iter()
        .chain(lines.iter())
        .find_map(|line| first_link(line));
    item.description = lines
        .iter()
        .map(|line| plain(&remove_commands(line, "href", 2)))
        .filter(|text| !text.is_empty() && tech_list(text).is_none())
        .collect::<Vec<_>>()
        .join(" ");
    item.bullet_points = bullets(block.body);
    item
}

fn tech_list(text: &str) -> Option<Vec<String>> {
    RE_TECH
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| split_list(m.as_str()))
}

pub(super) fn certifications(section: &str) -> Vec<CertificationItem> {
    match detect(section, PROJECT_MACRO) {
        Some(Dialect::Macro) => blocks(section, Dialect::Macro, PROJECT_MACRO, 2)
            .iter()
            .map(certification_from_macro)
            .collect(),
        Some(Dialect::BoldLabel) => blocks(section, Dialect::BoldLabel, PROJECT_MACRO, 0)
            .iter()
            .map(certification_from_block)
            .collect(),
        _ => environments(section, LIST_ENVIRONMENTS)
            .iter()
            .flat_map(|env| list_items(env.inner))
            .filter_map(certification_from_item)
            .collect(),
    }
}

fn certification_from_macro(block: &Block<'_>) -> CertificationItem {
    let heading = block.args.first().copied().unwrap_or_default();
    let without_links = remove_commands(heading, "href", 2);
    let (name, rest) = bold_and_rest(&without_links);
    let date_arg = block.args.get(1).copied().unwrap_or_default();

    CertificationItem {
        id: new_id(),
        name,
        issuer: rest
            .split('|')
            .map(str::trim)
            .find(|part| !part.is_empty())
            .unwrap_or_default()
            .to_string(),
        date: plain(&remove_commands(date_arg, "href", 2)),
        link: block.args.iter().find_map(|arg| first_link(arg)),
    }
}

fn certification_from_block(block: &Block<'_>) -> CertificationItem {
    // A bold line with no detail underneath reads like a list item: `Name -- Issuer (Date)`.
    let detail = detail_line(block.body);
    if detail.is_none() && separators(block.inline).is_empty() && block.right.is_empty() {
        let raw = format!(r"\textbf{{{}}}{}", block.args.first().copied().unwrap_or_default(), block.inline);
        if let Some(mut item) = certification_from_item(&raw) {
            item.link = item.link.or_else(|| first_link(block.body));
            return item;
        }
    }

    CertificationItem {
        id: new_id(),
        name: block.title(),
        issuer: detail
            .map(|(issuer, _)| plain(issuer))
            .unwrap_or_else(|| clean_inline(block.inline)),
        date: plain(&remove_commands(block.right, "href", 2)),
        link: [block.right, block.body].iter().find_map(|text| first_link(text)),
    }
}

/// `\textbf{Name} -- Issuer (Date) \href{url}{Link}`, every part but the name optional.
fn certification_from_item(raw: &str) -> Option<CertificationItem> {
    let link = first_link(raw);
    let without_links = remove_commands(raw, "href", 2);
    let (name, rest) = bold_and_rest(&without_links);
    if name.is_empty() && rest.is_empty() {
        return None;
    }
    let (name, rest) = if name.is_empty() {
        match rest.split_once(" -- ") {
            Some((name, rest)) => (name.trim().to_string(), rest.to_string()),
            None => (rest, String::new()),
        }
    } else {
        (name, rest)
    };

    let (issuer, date) = match rest.trim_end().strip_suffix(')').and_then(|head| head.rsplit_once('(')) {
        Some((issuer, date)) => (issuer.to_string(), date.trim().to_string()),
        None => (rest.clone(), String::new()),
    };
    let issuer = issuer
        .trim_matches(|c: char| "-,:|\u{2013}\u{2014}".contains(c) || c.is_whitespace())
        .to_string();

    Some(CertificationItem {
        id: new_id(),
        name,
        issuer,
        date,
        link,
    })
}

/// Plain text of the first `\textbf{..}` and of everything after it.
fn bold_and_rest(text: &str) -> (String, String) {
    match find_command(text, "textbf", 1) {
        Some(cmd) => (
            cmd.args.first().map(|arg| plain(arg)).unwrap_or_default(),
            plain(&text[cmd.end..]),
        ),
        None => (String::new(), plain(text)),
    }
}

/// The first non-mail, non-phone hyperlink target in `text`.
fn first_link(text: &str) -> Option<String> {
    find_commands(text, "href", 2)
        .iter()
        .filter_map(|cmd| cmd.args.first())
        .map(|url| unescape_latex(url.trim()))
        .find(|url| !url.is_empty() && !url.starts_with("mailto:") && !url.starts_with("tel:"))
}

// ─────────────────────────────────────────────────────────────────────────────
// List-like sections
// ─────────────────────────────────────────────────────────────────────────────

/// Skills as `\textbf{Category}: a, b` lines, skill bars, or a bare comma list.
pub(super) fn skills(section: &str, heading: &str) -> Vec<SkillCategory> {
    if find_command(section, "skillbar", 0).is_some() {
        return skill_bars(section);
    }

    let mut categories: Vec<SkillCategory> = Vec::new();
    for fragment in fragments(section) {
        if let Some((category, rest)) = leading_command(&fragment, "textbf") {
            let rest = plain(rest);
            categories.push(SkillCategory {
                id: new_id(),
                category: plain(category).trim_end_matches(':').trim().to_string(),
                skills: split_list(rest.trim_start_matches(|c: char| ":&|".contains(c) || c.is_whitespace())),
            });
            continue;
        }
        let text = plain(&fragment);
        if let Some(last) = categories.last_mut() {
            if last.skills.is_empty() && !text.is_empty() {
                last.skills = split_list(&text);
            }
        }
    }

    if categories.is_empty() {
        let skills = split_list(&plain(section));
        if !skills.is_empty() {
            categories.push(SkillCategory {
                id: new_id(),
                category: heading.to_string(),
                skills,
            });
        }
    }
    categories
}

fn skill_bars(section: &str) -> Vec<SkillCategory> {
    let mut marks: Vec<(usize, bool, String)> = Vec::new();
    for cmd in find_commands(section, "textbf", 1) {
        if let Some(arg) = cmd.args.first() {
            marks.push((cmd.start, true, plain(arg)));
        }
    }
    for cmd in find_commands(section, "skillbar", 2) {
        if let Some(arg) = cmd.args.first() {
            marks.push((cmd.start, false, plain(arg)));
        }
    }
    marks.sort_by_key(|mark| mark.0);

    let mut categories: Vec<SkillCategory> = Vec::new();
    for (_, is_category, text) in marks {
        if is_category {
            categories.push(SkillCategory {
                id: new_id(),
                category: text.trim_end_matches(':').trim().to_string(),
                skills: Vec::new(),
            });
            continue;
        }
        if categories.is_empty() {
            categories.push(SkillCategory {
                id: new_id(),
                category: "Skills".to_string(),
                skills: Vec::new(),
            });
        }
        if let Some(last) = categories.last_mut() {
            if !text.is_empty() {
                last.skills.push(text);
            }
        }
    }
    categories
}

pub(super) fn languages(section: &str) -> Vec<LanguageItem> {
    fragments(&strip_environment_markers(section))
        .iter()
        .flat_map(|fragment| {
            RE_DELIMITERS
                .replace_all(fragment, "|")
                .split(['|', ','])
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter_map(|part| language_item(&part))
        .collect()
}

fn language_item(raw: &str) -> Option<LanguageItem> {
    let seps = separators(raw);
    let (language, proficiency) = if let Some((name, rest)) = leading_command(raw, "textbf") {
        (plain(name), plain(rest))
    } else if let (Some(first), Some(last)) = (seps.first(), seps.last()) {
        (plain(&raw[..first.0]), plain(&raw[last.1..]))
    } else {
        let text = plain(raw);
        match RE_LANGUAGE.captures(&text) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            ),
            None => (text, String::new()),
        }
    };

    let language = language.trim_end_matches(':').trim().to_string();
    if language.is_empty() {
        return None;
    }
    let proficiency = proficiency
        .trim_matches(|c: char| ":()-\u{2013}\u{2014}".contains(c) || c.is_whitespace())
        .parse()
        .unwrap_or_default();

    Some(LanguageItem {
        id: new_id(),
        language,
        proficiency,
    })
}

pub(super) fn custom(title: &str, section: &str) -> CustomSection {
    let mut items = bullets(section);
    if items.is_empty() {
        items = macro_items(section);
    }
    if items.is_empty() {
        items = fragments(section)
            .iter()
            .map(|fragment| plain(fragment))
            .filter(|text| !text.is_empty())
            .collect();
    }
    CustomSection {
        id: new_id(),
        title: title.to_string(),
        items,
    }
}

pub(super) fn summary(section: &str) -> String {
    plain(section)
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Proficiency;

    #[test]
    fn test_experience_macro_dialect() {
        let section = r"
  \resumeSubHeadingListStart
    \resumeSubheading
      {Software Engineer}{Jun 2021 -- Present}
      {Initech}{Austin, TX}
      \resumeItemListStart
        \resumeItem{Cut deploy time by 40\%}
      \resumeItemListEnd
  \resumeSubHeadingListEnd";
        let items = experience(section);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].job_title, "Software Engineer");
        assert_eq!(items[0].company, "Initech");
        assert_eq!(items[0].location, "Austin, TX");
        assert_eq!(items[0].start_date, "Jun 2021");
        assert!(items[0].current);
        assert_eq!(items[0].bullet_points, vec!["Cut deploy time by 40%"]);
    }

    #[test]
    fn test_experience_subheading_dialect() {
        let section = "\\subsection*{Research Assistant at MIT}\n{\\textit{Sep 2019 -- Aug 2021 $|$ Cambridge, MA}}\n\\begin{itemize}\n\\item Published 3 papers\n\\end{itemize}\n";
        let items = experience(section);
        assert_eq!(items[0].job_title, "Research Assistant");
        assert_eq!(items[0].company, "MIT");
        assert_eq!(items[0].location, "Cambridge, MA");
        assert_eq!(items[0].start_date, "Sep 2019");
        assert_eq!(items[0].end_date, "Aug 2021");
        assert!(!items[0].current);
        assert_eq!(items[0].bullet_points, vec!["Published 3 papers"]);
    }

    #[test]
    fn test_experience_bold_label_dialect() {
        let section = "\\textbf{Manager} \\hfill Jan 2018 -- Dec 2019\\\\\n\\textit{Globex}, Springfield\n";
        let items = experience(section);
        assert_eq!(items[0].job_title, "Manager");
        assert_eq!(items[0].company, "Globex");
        assert_eq!(items[0].location, "Springfield");
        assert_eq!(items[0].end_date, "Dec 2019");
    }

    #[test]
    fn test_education_bold_label_with_gpa() {
        let section = "\\textbf{State University} \\hfill May 2015\\\\\n\\textit{BSc Physics} \\hfill Columbus, OH\\\\\nGPA: 3.7/4.0\n";
        let items = education(section);
        assert_eq!(items[0].institution, "State University");
        assert_eq!(items[0].degree, "BSc Physics");
        assert_eq!(items[0].location, "Columbus, OH");
        assert_eq!(items[0].graduation_date, "May 2015");
        assert_eq!(items[0].gpa.as_deref(), Some("3.7/4.0"));
    }

    #[test]
    fn test_education_inline_degree() {
        let section = "\\textbf{Oxford} -- MSc Economics \\hfill 2012\n";
        let items = education(section);
        assert_eq!(items[0].institution, "Oxford");
        assert_eq!(items[0].degree, "MSc Economics");
        assert_eq!(items[0].graduation_date, "2012");
    }

    #[test]
    fn test_education_subheading_dialect() {
        let section = "\\subsection*{PhD Computer Science}\n{\\textit{Stanford University $|$ Stanford, CA}} \\hfill Graduated: Jun 2020\n";
        let items = education(section);
        assert_eq!(items[0].degree, "PhD Computer Science");
        assert_eq!(items[0].institution, "Stanford University");
        assert_eq!(items[0].location, "Stanford, CA");
        assert_eq!(items[0].graduation_date, "Jun 2020");
    }

    #[test]
    fn test_projects_bold_label() {
        let section = "\\textbf{Ledger} \\hfill \\textit{Tech: Rust, Tokio}\\\\\nA double-entry bookkeeping service.\\\\\n\\href{https://github.com/x/ledger}{github.com/x/ledger}\n";
        let items = projects(section);
        assert_eq!(items[0].name, "Ledger");
        assert_eq!(items[0].technologies, vec!["Rust", "Tokio"]);
        assert_eq!(items[0].description, "A double-entry bookkeeping service.");
        assert_eq!(items[0].link.as_deref(), Some("https://github.com/x/ledger"));
    }

    #[test]
    fn test_projects_macro() {
        let section = r"\resumeProjectHeading
  {\textbf{Gitlytics} $|$ \emph{Python, Flask}}{\href{https://gitlytics.dev}{\underline{Link}}}
  \resumeProjectDescription{Commit analytics}
  \resumeItemListStart
    \resumeItem{Served 1k users}
  \resumeItemListEnd";
        let items = projects(section);
        assert_eq!(items[0].name, "Gitlytics");
        assert_eq!(items[0].technologies, vec!["Python", "Flask"]);
        assert_eq!(items[0].link.as_deref(), Some("https://gitlytics.dev"));
        assert_eq!(items[0].description, "Commit analytics");
        assert_eq!(items[0].bullet_points, vec!["Served 1k users"]);
    }

    #[test]
    fn test_certifications_itemize() {
        let section = "\\begin{itemize}\n\\item \\textbf{CKA} -- CNCF (Mar 2022) \\href{https://cncf.io/c}{Link}\n\\item \\textbf{PMP}\n\\end{itemize}";
        let items = certifications(section);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "CKA");
        assert_eq!(items[0].issuer, "CNCF");
        assert_eq!(items[0].date, "Mar 2022");
        assert_eq!(items[0].link.as_deref(), Some("https://cncf.io/c"));
        assert_eq!(items[1].name, "PMP");
        assert_eq!(items[1].issuer, "");
    }

    #[test]
    fn test_certifications_bold_label() {
        let section = "\\textbf{\\small AWS SA} \\hfill {\\footnotesize 2021}\\\\\n\\textit{\\footnotesize Amazon}\n";
        let items = certifications(section);
        assert_eq!(items[0].name, "AWS SA");
        assert_eq!(items[0].issuer, "Amazon");
        assert_eq!(items[0].date, "2021");
    }

    #[test]
    fn test_skills_lines_and_bars() {
        let section = "\\textbf{Languages:} Rust, Go\\\\\n\\textbf{Cloud} & AWS, GCP\\\\\n";
        let found = skills(section, "Skills");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].category, "Languages");
        assert_eq!(found[0].skills, vec!["Rust", "Go"]);
        assert_eq!(found[1].skills, vec!["AWS", "GCP"]);

        let bars = "\\textbf{\\small Tools}\\\\\n\\skillbar{Figma}{80}\n\\skillbar{Excel}{70}\n";
        let found = skills(bars, "Skills");
        assert_eq!(found[0].category, "Tools");
        assert_eq!(found[0].skills, vec!["Figma", "Excel"]);
    }

    #[test]
    fn test_skills_category_on_its_own_line() {
        let section = "\\textbf{Design}\\\\\n{\\small Figma, Sketch}\\\\[4pt]\n";
        let found = skills(section, "Skills");
        assert_eq!(found[0].skills, vec!["Figma", "Sketch"]);
    }

    #[test]
    fn test_skills_bare_list() {
        let found = skills("Excel, SQL", "Toolbox");
        assert_eq!(found[0].category, "Toolbox");
        assert_eq!(found[0].skills, vec!["Excel", "SQL"]);
    }

    #[test]
    fn test_languages_variants() {
        let section = "\\begin{itemize}\n\\item \\textbf{English}: Native\n\\item French \\hfill Fluent\n\\item German (Basic)\n\\item Spanish -- Intermediate\n\\item Klingon\n\\end{itemize}";
        let found = languages(section);
        let pairs: Vec<_> = found
            .iter()
            .map(|l| (l.language.as_str(), l.proficiency))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("English", Proficiency::Native),
                ("French", Proficiency::Fluent),
                ("German", Proficiency::Basic),
                ("Spanish", Proficiency::Intermediate),
                ("Klingon", Proficiency::Professional),
            ]
        );
    }

    #[test]
    fn test_languages_ignore_list_options_and_layout() {
        let section = "\\begin{itemize}[leftmargin=*, label={}]\n\\item \\textbf{Welsh}: Fluent\n\\end{itemize}\n\\end{minipage}\n\\hfill\n\\begin{minipage}[t]{0.4\\textwidth}\n";
        let found = languages(section);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].language, "Welsh");
        assert_eq!(found[0].proficiency, Proficiency::Fluent);
    }

    #[test]
    fn test_languages_inline_delimited() {
        let found = languages(r"English (Native) $\cdot$ Italian (Fluent)");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].language, "Italian");
        assert_eq!(found[1].proficiency, Proficiency::Fluent);
    }

    #[test]
    fn test_custom_items_and_lines() {
        let listed = custom("Volunteering", "\\begin{itemize}\\item Food bank\\item Tutor\\end{itemize}");
        assert_eq!(listed.items, vec!["Food bank", "Tutor"]);
        let lines = custom("Interests", "Chess\\\\\nHiking\n");
        assert_eq!(lines.items, vec!["Chess", "Hiking"]);
    }

    #[test]
    fn test_split_at_word() {
        assert_eq!(
            split_at_word("Engineer at Acme", "at"),
            ("Engineer".to_string(), "Acme".to_string())
        );
        assert_eq!(split_at_word("at Acme", "at"), (String::new(), "Acme".to_string()));
        assert_eq!(split_at_word("Engineer", "at"), ("Engineer".to_string(), String::new()));
    }
}
