//! Minimal: sans-serif, generous spacing, no rules and no color.

use super::{
    contact_parts, esc, has_header, itemize, labeled_link, language_pair, link_of, present,
    skill_list, stack, visible_custom, visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[10pt,a4paper]{article}
\usepackage[T1]{fontenc}
\usepackage[scaled]{helvet}
\renewcommand{\familydefault}{\sfdefault}
\usepackage[margin=2.2cm]{geometry}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\titleformat{\section}{\normalsize\bfseries}{}{0pt}{\MakeUppercase}
\titlespacing*{\section}{0pt}{18pt}{8pt}

\setlist[itemize]{leftmargin=1em, label={--}, itemsep=2pt, topsep=4pt}
\setlength{\parindent}{0pt}
\setlength{\parskip}{4pt}
\linespread{1.15}
\pagestyle{empty}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str(&format!("{{\\huge {}}}\\\\[6pt]\n", esc(&info.name)));
        let contacts = contact_parts(info, false);
        if !contacts.is_empty() {
            out.push_str(&format!("{{\\small {}}}\n", contacts.join(" \\quad ")));
        }
        out.push_str("\\vspace{12pt}\n\n");
    }

    if present(&info.summary) {
        out.push_str(&format!("\\section*{{About}}\n{}\n\n", esc(&info.summary)));
    }

    if !record.experience.is_empty() {
        out.push_str("\\section*{Experience}\n");
        for exp in &record.experience {
            out.push_str(&stack(&[
                heading(&exp.job_title, &date_range(&exp.start_date, &exp.end_date, exp.current)),
                detail(&exp.company, &exp.location),
            ]));
            out.push_str(&itemize("", "", &exp.bullet_points));
            out.push_str("\\vspace{6pt}\n\n");
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
            out.push_str("\\vspace{6pt}\n\n");
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
                format!("{{\\small Tech: {tech}}}")
            };
            out.push_str(&stack(&[
                heading(&project.name, &link),
                esc(&project.description),
                tech,
            ]));
            out.push_str(&itemize("", "", &project.bullet_points));
            out.push_str("\\vspace{6pt}\n\n");
        }
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        let lines: Vec<String> = skills
            .iter()
            .map(|category| {
                format!(
                    "\\textbf{{{}}}\\quad {}",
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
        let lines: Vec<String> = record.certifications.iter().map(certification).collect();
        out.push_str("\\section*{Certifications}\n");
        out.push_str(&stack(&lines));
        out.push('\n');
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let pairs: Vec<String> = languages.into_iter().map(language_pair).collect();
        out.push_str(&format!("\\section*{{Languages}}\n{}\n\n", pairs.join(" \\quad ")));
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section*{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize("", "", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

fn heading(title: &str, right: &str) -> String {
    if right.is_empty() {
        format!("\\textbf{{{}}}", esc(title))
    } else {
        format!("\\textbf{{{}}} \\hfill {{\\small {right}}}", esc(title))
    }
}

/// `\textit{primary}, secondary`, or an empty line when both are blank.
fn detail(primary: &str, secondary: &str) -> String {
    match (present(primary), present(secondary)) {
        (false, false) => String::new(),
        (_, false) => format!("\\textit{{{}}}", esc(primary)),
        _ => format!("\\textit{{{}}}, {}", esc(primary), esc(secondary)),
    }
}

/// `\textbf{Name}, Issuer \hfill Date \href{..}{Link}` on one line.
fn certification(cert: &CertificationItem) -> String {
    let mut line = format!("\\textbf{{{}}}", esc(&cert.name));
    if present(&cert.issuer) {
        line.push_str(&format!(", {}", esc(&cert.issuer)));
    }
    let mut right = latex_date(&cert.date);
    if let Some(url) = link_of(&cert.link) {
        if !right.is_empty() {
            right.push_str(" \\quad ");
        }
        right.push_str(&labeled_link(url, "Link"));
    }
    if !right.is_empty() {
        line.push_str(&format!(" \\hfill {{\\small {right}}}"));
    }
    line
}

pub fn example() -> ResumeRecord {
    let mut quiet_mode = ProjectItem::new(
        "Quiet Mode",
        "Accessibility setting that reduces motion and notifications for anxious users.",
        &["Figma", "Principle"],
        Some("https://novak.design/quiet-mode"),
    );
    quiet_mode.bullet_points = vec!["Adopted by 18% of active users in the first quarter".to_string()];

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Elena Novak".to_string(),
            email: "elena@novak.design".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            location: "London, UK".to_string(),
            summary: "Product designer who turns messy research into calm, usable software. Eight years across fintech and healthcare, most recently leading design for a banking app with two million users.".to_string(),
            profiles: vec![ProfileLink {
                network: "Website".to_string(),
                label: "novak.design".to_string(),
                url: "https://novak.design".to_string(),
            }],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Lead Product Designer",
                "Monzo",
                "London, UK",
                "2020-02",
                "",
                &[
                    "Lead a team of 5 designers across savings and payments",
                    "Rebuilt the design system, halving time from sketch to shipped screen",
                ],
            ),
            ExperienceItem::new(
                "Product Designer",
                "Babylon Health",
                "London, UK",
                "2016-09",
                "2020-01",
                &["Designed the symptom checker flow used in 4 countries"],
            ),
        ],
        education: vec![EducationItem::new(
            "BA Graphic Design",
            "Central Saint Martins",
            "London, UK",
            "2016-06",
        )],
        skills: vec![
            SkillCategory::new("Design", &["Figma", "Prototyping", "Design Systems"]),
            SkillCategory::new("Research", &["Usability Testing", "Interviews", "Journey Mapping"]),
        ],
        projects: vec![quiet_mode],
        certifications: vec![CertificationItem::new(
            "Certified Usability Analyst",
            "Human Factors International",
            "2018-03",
            None,
        )],
        languages: vec![
            LanguageItem::new("Czech", Proficiency::Native),
            LanguageItem::new("English", Proficiency::Fluent),
        ],
        custom_sections: vec![CustomSection::new(
            "Speaking",
            &["Config 2023: Designing for calm", "UX London 2021: Small defaults, big outcomes"],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::parse;

    #[test]
    fn test_no_rules_or_color() {
        let markup = render(&example());
        assert!(!markup.contains(r"\titlerule"));
        assert!(!markup.contains("xcolor"));
        assert!(markup.contains("{\\huge Elena Novak}\\\\[6pt]"));
    }

    #[test]
    fn test_certification_variants_parse_back() {
        let mut record = ResumeRecord::default();
        record.certifications = vec![
            CertificationItem::new("PSM I", "Scrum.org", "", None),
            CertificationItem::new("CPACC", "", "2021-05", Some("https://iaap.org/v/123")),
            CertificationItem::new("First Aid", "", "", None),
        ];
        let parsed = parse(&render(&record)).unwrap();
        let got: Vec<_> = parsed
            .certifications
            .iter()
            .map(|c| (c.name.as_str(), c.issuer.as_str(), c.date.as_str(), c.link.as_deref()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("PSM I", "Scrum.org", "", None),
                ("CPACC", "", "May 2021", Some("https://iaap.org/v/123")),
                ("First Aid", "", "", None),
            ]
        );
    }
}
