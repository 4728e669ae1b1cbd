//! Best-effort extraction of a [`ResumeRecord`] from LaTeX.
//!
//! The parser understands the layouts our own templates emit plus the common
//! hand-written ones: macro-argument entries (`\resumeSubheading{..}`),
//! `\subsection*` entries, and `\textbf{..}`-led lines. It never fails on
//! unfamiliar markup; it just recovers less. Every recovered item gets a fresh id.

mod blocks;
mod entries;
mod header;
mod sections;

use thiserror::Error;
use tracing::debug;

use crate::latex::scan::strip_comments;
use crate::models::resume::ResumeRecord;
use sections::SectionKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,

    #[error("no document body or section headings found")]
    NoStructure,
}

pub fn parse(source: &str) -> Result<ResumeRecord, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let source = strip_comments(source);
    let (body, has_body) = document_body(&source);
    let found = sections::locate(body);
    if !has_body && found.is_empty() {
        return Err(ParseError::NoStructure);
    }

    let header_end = found.first().map(|s| s.start).unwrap_or(body.len());
    let mut record = ResumeRecord {
        personal_info: header::parse_header(&body[..header_end]),
        ..ResumeRecord::default()
    };

    for section in &found {
        let content = section.content;
        match section.kind {
            SectionKind::Summary => {
                if record.personal_info.summary.is_empty() {
                    record.personal_info.summary = entries::summary(content);
                }
            }
            SectionKind::Experience => record.experience.extend(entries::experience(content)),
            SectionKind::Education => record.education.extend(entries::education(content)),
            SectionKind::Skills => record.skills.extend(entries::skills(content, &section.title)),
            SectionKind::Projects => record.projects.extend(entries::projects(content)),
            SectionKind::Certifications => {
                record.certifications.extend(entries::certifications(content))
            }
            SectionKind::Languages => record.languages.extend(entries::languages(content)),
            SectionKind::Custom => {
                let custom = entries::custom(&section.title, content);
                if !custom.items.is_empty() {
                    record.custom_sections.push(custom);
                }
            }
        }
    }

    debug!(
        sections = found.len(),
        experience = record.experience.len(),
        education = record.education.len(),
        "parsed markup"
    );
    record.normalize();
    Ok(record)
}

/// The text between `\begin{document}` and `\end{document}`, or the whole input
/// when there is no document environment.
fn document_body(source: &str) -> (&str, bool) {
    const BEGIN: &str = r"\begin{document}";
    const END: &str = r"\end{document}";

    match source.find(BEGIN) {
        Some(start) => {
            let body = &source[start + BEGIN.len()..];
            let body = body.find(END).map(|end| &body[..end]).unwrap_or(body);
            (body, true)
        }
        None => (source, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Proficiency;

    const HAND_WRITTEN: &str = r"\documentclass{article}
% personal resume, edited by hand
\begin{document}
\begin{center}
{\Huge Maria Garcia}\\
maria@example.com $|$ 555-123-4567 $|$ Madrid, Spain $|$ \href{https://linkedin.com/in/mgarcia}{linkedin.com/in/mgarcia}
\end{center}

\section*{Objective}
Operations lead looking for a \textbf{logistics} role.

\section*{Employment History}
\textbf{Operations Lead} \hfill 2019-03 -- Present\\
\textit{Logistica SA}, Madrid
\begin{itemize}
  \item Ran a 40-person warehouse team
  \item Reduced shrinkage by 12\%
\end{itemize}

\section*{Languages}
Spanish (Native), English (Fluent)

\section*{Hobbies}
\begin{itemize}
  \item Climbing
\end{itemize}
\end{document}
";

    #[test]
    fn test_parse_hand_written_document() {
        let record = parse(HAND_WRITTEN).unwrap();
        let info = &record.personal_info;
        assert_eq!(info.name, "Maria Garcia");
        assert_eq!(info.email, "maria@example.com");
        assert_eq!(info.phone, "555-123-4567");
        assert_eq!(info.location, "Madrid, Spain");
        assert_eq!(info.profiles[0].network, "LinkedIn");
        assert_eq!(info.summary, "Operations lead looking for a logistics role.");

        assert_eq!(record.experience.len(), 1);
        let job = &record.experience[0];
        assert_eq!(job.job_title, "Operations Lead");
        assert_eq!(job.company, "Logistica SA");
        assert_eq!(job.location, "Madrid");
        assert_eq!(job.start_date, "2019-03");
        assert!(job.current);
        assert_eq!(job.bullet_points[1], "Reduced shrinkage by 12%");

        assert_eq!(record.custom_sections.len(), 1);
        assert_eq!(record.custom_sections[0].title, "Hobbies");
        assert_eq!(record.custom_sections[0].items, vec!["Climbing"]);
    }

    #[test]
    fn test_parse_comma_separated_languages() {
        let record = parse(HAND_WRITTEN).unwrap();
        assert_eq!(record.languages.len(), 2);
        assert_eq!(record.languages[0].language, "Spanish");
        assert_eq!(record.languages[0].proficiency, Proficiency::Native);
        assert_eq!(record.languages[1].language, "English");
        assert_eq!(record.languages[1].proficiency, Proficiency::Fluent);
    }

    #[test]
    fn test_every_item_gets_an_id() {
        let record = parse(HAND_WRITTEN).unwrap();
        assert!(record.experience.iter().all(|e| !e.id.is_empty()));
        assert!(record.custom_sections.iter().all(|c| !c.id.is_empty()));
    }

    #[test]
    fn test_blank_input_is_an_error() {
        assert_eq!(parse("   \n"), Err(ParseError::Empty));
    }

    #[test]
    fn test_unstructured_text_is_an_error() {
        assert_eq!(parse("just some notes"), Err(ParseError::NoStructure));
    }

    #[test]
    fn test_bare_body_without_sections_yields_header_only() {
        let record = parse("\\begin{document}\n{\\Large Solo Person}\n\\end{document}").unwrap();
        assert_eq!(record.personal_info.name, "Solo Person");
        assert!(record.experience.is_empty());
    }

    #[test]
    fn test_sections_without_document_environment() {
        let record = parse("\\section{Skills}\n\\textbf{Tools:} Git, Make\n").unwrap();
        assert_eq!(record.skills[0].skills, vec!["Git", "Make"]);
    }

    #[test]
    fn test_unknown_markup_does_not_fail() {
        let source = "\\begin{document}\n\\weirdmacro{a}{b}\n\\section{Experience}\n\\foo\n\\end{document}";
        let record = parse(source).unwrap();
        assert!(record.experience.is_empty());
    }
}
