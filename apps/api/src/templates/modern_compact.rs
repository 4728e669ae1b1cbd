//! Modern Compact: tight margins, 10pt body, everything on one page if it can be.

use super::{
    contact_parts, esc, has_header, itemize, labeled_link, language_pair, link_of, present,
    skill_list, stack, visible_custom, visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    EducationItem, ExperienceItem, PersonalInfo, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[10pt, letterpaper]{article}

\usepackage[
    top=0.8 cm,
    bottom=0.8 cm,
    left=1.2 cm,
    right=1.2 cm,
]{geometry}
\usepackage{titlesec, tabularx, array, enumitem, hyperref}
\usepackage[dvipsnames]{xcolor}

\linespread{1.02}
\raggedright
\pagestyle{empty}
\setlength{\parindent}{0pt}

\titleformat{\section}{\bfseries\large}{}{0pt}{}[\vspace{-2pt}\titlerule]
\titlespacing{\section}{-1pt}{7pt}{4pt}

\setlist[itemize]{leftmargin=*,itemsep=1pt,topsep=1pt}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str("\\begin{center}\n");
        out.push_str(&format!(
            "    \\fontsize{{20pt}}{{20pt}}\\selectfont \\textbf{{{}}}\\\\\n",
            esc(&info.name)
        ));
        let contacts = contact_parts(info, true);
        if !contacts.is_empty() {
            out.push_str("    \\vspace{4pt}\n    \\footnotesize\n");
            out.push_str(&format!("    {}\n", contacts.join(" $|$ ")));
        }
        out.push_str("\\end{center}\n\n");
    }

    if present(&info.summary) {
        out.push_str(&format!("\\section{{Professional Summary}}\n{}\n\n", esc(&info.summary)));
    }

    if !record.education.is_empty() {
        out.push_str("\\section{Education}\n");
        for edu in &record.education {
            let gpa = edu
                .gpa
                .as_deref()
                .filter(|gpa| present(gpa))
                .map(|gpa| format!("GPA: {}", esc(gpa)))
                .unwrap_or_default();
            out.push_str(&stack(&[
                bold_line(&edu.institution, &latex_date(&edu.graduation_date)),
                italic_line(&edu.degree, &edu.location),
                gpa,
            ]));
            out.push_str(&itemize("", "", &edu.bullet_points));
            out.push('\n');
        }
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str("\\section{Technical Skills}\n");
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
        out.push_str(&stack(&lines));
        out.push('\n');
    }

    if !record.experience.is_empty() {
        out.push_str("\\section{Professional Experience}\n");
        for exp in &record.experience {
            out.push_str(&stack(&[
                bold_line(
                    &exp.job_title,
                    &date_range(&exp.start_date, &exp.end_date, exp.current),
                ),
                italic_line(&exp.company, &exp.location),
            ]));
            out.push_str(&itemize("", "", &exp.bullet_points));
            out.push('\n');
        }
    }

    if !record.projects.is_empty() {
        out.push_str("\\section{Key Projects}\n");
        for project in &record.projects {
            out.push_str(&project_block(project));
        }
    }

    if !record.certifications.is_empty() {
        out.push_str("\\section{Certifications}\n");
        for cert in &record.certifications {
            let link = link_of(&cert.link)
                .map(|url| labeled_link(url, "Verify"))
                .unwrap_or_default();
            let detail = if present(&cert.issuer) || !link.is_empty() {
                let mut line = format!("\\textit{{{}}}", esc(&cert.issuer));
                if !link.is_empty() {
                    line.push_str(&format!(" \\hfill {link}"));
                }
                line
            } else {
                String::new()
            };
            out.push_str(&stack(&[bold_line(&cert.name, &latex_date(&cert.date)), detail]));
            out.push('\n');
        }
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let pairs: Vec<String> = languages.into_iter().map(language_pair).collect();
        out.push_str(&format!("\\section{{Languages}}\n{}\n\n", pairs.join(" $|$ ")));
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize("", "", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

/// `\textbf{title} \hfill right`; the fill is left out when there is nothing to push right.
fn bold_line(title: &str, right: &str) -> String {
    if right.is_empty() {
        format!("\\textbf{{{}}}", esc(title))
    } else {
        format!("\\textbf{{{}}} \\hfill {right}", esc(title))
    }
}

fn italic_line(primary: &str, secondary: &str) -> String {
    match (present(primary), present(secondary)) {
        (false, false) => String::new(),
        (_, false) => format!("\\textit{{{}}}", esc(primary)),
        _ => format!("\\textit{{{}}} \\hfill {}", esc(primary), esc(secondary)),
    }
}

fn project_block(project: &ProjectItem) -> String {
    let tech = skill_list(&project.technologies);
    let heading = if tech.is_empty() {
        format!("\\textbf{{{}}}", esc(&project.name))
    } else {
        format!("\\textbf{{{}}} \\hfill \\textit{{Tech: {tech}}}", esc(&project.name))
    };
    let link = link_of(&project.link)
        .map(|url| labeled_link(url, &esc(url)))
        .unwrap_or_default();
    let mut out = stack(&[heading, esc(&project.description), link]);
    out.push_str(&itemize("", "", &project.bullet_points));
    out.push('\n');
    out
}

pub fn example() -> ResumeRecord {
    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Sarah Smith".to_string(),
            email: "sarah.smith@design.com".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            location: "San Francisco, CA".to_string(),
            summary: "Creative UX/UI Designer with a passion for building user-centric digital products. Expertise in user research, wireframing, prototyping, and visual design. Dedicated to creating seamless and enjoyable user experiences.".to_string(),
            ..PersonalInfo::default()
        },
        experience: vec![
            ExperienceItem::new(
                "Lead Product Designer",
                "Creative Studio",
                "San Francisco, CA",
                "2021-03-01",
                "",
                &[
                    "Spearheaded the redesign of the company's flagship mobile app, resulting in a 20% increase in user engagement.",
                    "Mentored junior designers and established a unified design system.",
                    "Conducted user testing sessions to gather feedback and iterate on designs.",
                ],
            ),
            ExperienceItem::new(
                "UX Designer",
                "Web Innovators",
                "Austin, TX",
                "2018-06-01",
                "2021-02-28",
                &[
                    "Designed intuitive interfaces for web and mobile applications.",
                    "Collaborated with developers to ensure accurate implementation of designs.",
                    "Created user personas and journey maps to guide product decisions.",
                ],
            ),
        ],
        education: vec![EducationItem::new(
            "Bachelor of Fine Arts in Interaction Design",
            "California College of the Arts",
            "San Francisco, CA",
            "2018-05-01",
        )],
        skills: vec![
            SkillCategory::new(
                "Design Tools",
                &["Figma", "Sketch", "Adobe XD", "Photoshop", "Illustrator"],
            ),
            SkillCategory::new(
                "Skills",
                &["User Research", "Prototyping", "Wireframing", "HTML/CSS"],
            ),
        ],
        projects: vec![ProjectItem::new(
            "E-commerce Redesign",
            "Redesigned the checkout flow for a major e-commerce retailer, reducing cart abandonment by 15%.",
            &["Figma", "User Testing"],
            Some("https://portfolio.com/ecommerce"),
        )],
        ..ResumeRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{CertificationItem, LanguageItem, Proficiency};

    #[test]
    fn test_header_uses_fontsize_name() {
        let markup = render(&example());
        assert!(markup.contains(r"\fontsize{20pt}{20pt}\selectfont \textbf{Sarah Smith}\\"));
        assert!(markup.contains(r"San Francisco, CA $|$ \href{mailto:"));
    }

    #[test]
    fn test_certification_without_details_is_a_bare_line() {
        let mut record = ResumeRecord::default();
        record
            .certifications
            .push(CertificationItem::new("First Aid", "", "", None));
        let markup = render(&record);
        assert!(markup.contains("\\section{Certifications}\n\\textbf{First Aid}\n"));
    }

    #[test]
    fn test_languages_share_one_line() {
        let mut record = ResumeRecord::default();
        record.languages = vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("German", Proficiency::Basic),
        ];
        assert!(render(&record).contains("English (Native) $|$ German (Basic)"));
    }
}
