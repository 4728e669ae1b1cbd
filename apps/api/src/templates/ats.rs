//! ATS friendly: one column, labelled contacts, no tables, graphics or color.

use super::{
    certification_line, email_link, esc, has_header, itemize, labeled_link, language_pair,
    link_of, phone_link, present, profile_link, skill_list, stack, visible_custom,
    visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[11pt,letterpaper]{article}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage[margin=0.8in]{geometry}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\input{glyphtounicode}
\pdfgentounicode=1

\titleformat{\section}{\large\bfseries}{}{0em}{}
\titlespacing*{\section}{0pt}{10pt}{4pt}

\setlist[itemize]{leftmargin=1.5em, itemsep=1pt, topsep=2pt}
\setlength{\parindent}{0pt}
\pagestyle{empty}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str(&format!("{{\\LARGE\\textbf{{{}}}}}\\\\\n", esc(&info.name)));
        let contacts = contacts(info);
        if !contacts.is_empty() {
            out.push_str(&format!("{}\n", contacts.join(r" \textbar{} ")));
        }
        out.push('\n');
    }

    if present(&info.summary) {
        out.push_str(&format!(
            "\\section*{{Professional Summary}}\n{}\n\n",
            esc(&info.summary)
        ));
    }

    if !record.experience.is_empty() {
        out.push_str("\\section*{Work Experience}\n");
        for exp in &record.experience {
            out.push_str(&stack(&[
                heading(&exp.job_title, &date_range(&exp.start_date, &exp.end_date, exp.current)),
                detail(&exp.company, &exp.location),
            ]));
            out.push_str(&itemize("", "", &exp.bullet_points));
            out.push('\n');
        }
    }

    if !record.education.is_empty() {
        out.push_str("\\section*{Education}\n");
        for edu in &record.education {
            let gpa = edu
                .gpa
                .as_deref()
                .filter(|gpa| present(gpa))
                .map(|gpa| format!("GPA: {}", esc(gpa)))
                .unwrap_or_default();
            out.push_str(&stack(&[
                heading(&edu.institution, &latex_date(&edu.graduation_date)),
                detail(&edu.degree, &edu.location),
                gpa,
            ]));
            out.push_str(&itemize("", "", &edu.bullet_points));
            out.push('\n');
        }
    }

    if !record.projects.is_empty() {
        out.push_str("\\section*{Projects}\n");
        for project in &record.projects {
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, "Link"))
                .unwrap_or_default();
            let tech = skill_list(&project.technologies);
            let tech = if tech.is_empty() {
                tech
            } else {
                format!("Technologies: {tech}")
            };
            out.push_str(&stack(&[
                heading(&project.name, &link),
                esc(&project.description),
                tech,
            ]));
            out.push_str(&itemize("", "", &project.bullet_points));
            out.push('\n');
        }
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        let lines: Vec<String> = skills
            .iter()
            .map(|category| {
                format!(
                    "\\textbf{{{}:}} {}",
                    esc(&category.category),
                    skill_list(&category.skills)
                )
            })
            .collect();
        out.push_str("\\section*{Skills}\n");
        out.push_str(&stack(&lines));
        out.push('\n');
    }

    if !record.certifications.is_empty() {
        out.push_str("\\section*{Certifications}\n\\begin{itemize}\n");
        for cert in &record.certifications {
            out.push_str(&format!("  \\item {}\n", certification_line(cert)));
        }
        out.push_str("\\end{itemize}\n\n");
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let pairs: Vec<String> = languages.into_iter().map(language_pair).collect();
        out.push_str(&format!("\\section*{{Languages}}\n{}\n\n", pairs.join(", ")));
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section*{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize("", "", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

/// Every contact spelled out with a text label so parsers never have to guess.
fn contacts(info: &PersonalInfo) -> Vec<String> {
    let mut parts = Vec::new();
    if present(&info.email) {
        parts.push(format!("Email: {}", email_link(&info.email)));
    }
    if present(&info.phone) {
        parts.push(format!("Phone: {}", phone_link(&info.phone)));
    }
    if present(&info.location) {
        parts.push(format!("Location: {}", esc(&info.location)));
    }
    for profile in &info.profiles {
        let link = profile_link(profile);
        if link.is_empty() {
            continue;
        }
        if present(&profile.network) {
            parts.push(format!("{}: {link}", esc(&profile.network)));
        } else {
            parts.push(link);
        }
    }
    parts
}

fn heading(title: &str, right: &str) -> String {
    if right.is_empty() {
        format!("\\textbf{{{}}}", esc(title))
    } else {
        format!("\\textbf{{{}}} \\hfill {right}", esc(title))
    }
}

fn detail(primary: &str, secondary: &str) -> String {
    match (present(primary), present(secondary)) {
        (false, false) => String::new(),
        (_, false) => format!("\\textit{{{}}}", esc(primary)),
        _ => format!("\\textit{{{}}}, {}", esc(primary), esc(secondary)),
    }
}

pub fn example() -> ResumeRecord {
    let mut mba = EducationItem::new("MBA", "University of Texas at Austin", "Austin, TX", "2016-05");
    mba.gpa = Some("3.7".to_string());

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Marcus Bell".to_string(),
            email: "marcus.bell@gmail.com".to_string(),
            phone: "(512) 555-0147".to_string(),
            location: "Austin, TX".to_string(),
            summary: "Operations manager with ten years in logistics and supply chain. Known for cutting fulfilment costs while improving on-time delivery across multi-site networks.".to_string(),
            profiles: vec![ProfileLink {
                network: "LinkedIn".to_string(),
                label: "marcusbell".to_string(),
                url: "https://www.linkedin.com/in/marcusbell".to_string(),
            }],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Regional Operations Manager",
                "H-E-B",
                "Austin, TX",
                "2019-03",
                "",
                &[
                    "Run fulfilment for 42 stores across central Texas",
                    "Reduced late deliveries by 35% through route and shift redesign",
                ],
            ),
            ExperienceItem::new(
                "Distribution Center Supervisor",
                "Amazon",
                "San Marcos, TX",
                "2016-06",
                "2019-02",
                &["Supervised 120 associates across two shifts"],
            ),
        ],
        education: vec![mba],
        skills: vec![
            SkillCategory::new("Operations", &["Lean", "Six Sigma", "Inventory Planning"]),
            SkillCategory::new("Tools", &["SAP", "Tableau", "Excel"]),
        ],
        projects: vec![ProjectItem::new(
            "Cross-Dock Pilot",
            "Piloted cross-docking at two sites, cutting dwell time from 30 to 9 hours.",
            &["SAP EWM", "Tableau"],
            None,
        )],
        certifications: vec![CertificationItem::new(
            "Lean Six Sigma Green Belt",
            "ASQ",
            "2018-09",
            Some("https://asq.org/cert/verify/4471"),
        )],
        languages: vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("Spanish", Proficiency::Professional),
        ],
        custom_sections: vec![CustomSection::new(
            "Volunteer Work",
            &["Logistics lead, Central Texas Food Bank"],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::parse;

    #[test]
    fn test_plain_structure() {
        let markup = render(&example());
        assert!(markup.contains(r"\pdfgentounicode=1"));
        assert!(!markup.contains("tabular"));
        assert!(!markup.contains("xcolor"));
        assert!(!markup.contains("graphicx"));
        assert!(markup.contains(r"Location: Austin, TX \textbar{} LinkedIn: \href"));
    }

    #[test]
    fn test_labelled_contacts_parse_back() {
        let parsed = parse(&render(&example())).unwrap();
        let info = parsed.personal_info;
        assert_eq!(info.name, "Marcus Bell");
        assert_eq!(info.email, "marcus.bell@gmail.com");
        assert_eq!(info.phone, "(512) 555-0147");
        assert_eq!(info.location, "Austin, TX");
        assert_eq!(info.profiles.len(), 1);
        assert_eq!(info.profiles[0].network, "LinkedIn");
    }

    #[test]
    fn test_languages_on_one_line() {
        let markup = render(&example());
        assert!(markup.contains("English (Native), Spanish (Professional)"));
        let parsed = parse(&markup).unwrap();
        assert_eq!(parsed.languages.len(), 2);
        assert_eq!(parsed.languages[1].proficiency, Proficiency::Professional);
    }
}
