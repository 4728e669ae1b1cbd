//! Sidebar: skills, certifications and languages in a narrow left column beside the main story.

use super::{
    contact_parts, esc, has_header, itemize, labeled_link, link_of, present, skill_list, stack,
    visible_custom, visible_languages, visible_skills, PROFILE_IMAGE_PATH,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[10pt,a4paper]{article}
\usepackage[T1]{fontenc}
\usepackage{helvet}
\renewcommand{\familydefault}{\sfdefault}
\usepackage[margin=1.4cm]{geometry}
\usepackage{xcolor}
\usepackage{enumitem}
\usepackage{graphicx}
\usepackage{hyperref}

\definecolor{accent}{RGB}{0, 110, 110}
\hypersetup{colorlinks, urlcolor=accent, linkcolor=accent}

\newcommand{\cvsection}[1]{
    \vspace{8pt}
    {\color{accent}\large\bfseries #1}\\[-6pt]
    {\color{accent}\rule{\linewidth}{0.6pt}}
    \vspace{2pt}
}

\setlist[itemize]{leftmargin=1.2em, nosep, topsep=2pt}
\setlength{\parindent}{0pt}
\pagestyle{empty}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str(&format!(
            "{{\\color{{accent}}\\Huge\\bfseries {}}}\\\\[4pt]\n",
            esc(&info.name)
        ));
        let contacts = contact_parts(info, false);
        if !contacts.is_empty() {
            out.push_str(&format!("{{\\small {}}}\n", contacts.join(r" $\bullet$ ")));
        }
        out.push_str("\\vspace{10pt}\n\n");
    }

    let side = side_column(record);
    let main = main_column(record);
    match (side.is_empty(), main.is_empty()) {
        (true, true) => {}
        (false, true) => out.push_str(&column("0.3", &side)),
        (true, false) => out.push_str(&column("0.66", &main)),
        (false, false) => {
            out.push_str(&column("0.3", &side));
            out.push_str("\\hfill\n");
            out.push_str(&column("0.66", &main));
        }
    }

    out.push_str("\n\\end{document}\n");
    out
}

fn column(width: &str, content: &str) -> String {
    format!("\\begin{{minipage}}[t]{{{width}\\textwidth}}\n{content}\\end{{minipage}}\n")
}

fn side_column(record: &ResumeRecord) -> String {
    let mut out = String::new();

    if record.personal_info.profile_image_payload().is_some() {
        out.push_str(&format!(
            "    {{\\centering\\includegraphics[width=0.8\\linewidth]{{{PROFILE_IMAGE_PATH}}}\\par}}\n\n"
        ));
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str("    \\cvsection{Skills}\n");
        for category in skills {
            out.push_str(&format!("    \\textbf{{{}}}\\\\\n", esc(&category.category)));
            let list = skill_list(&category.skills);
            if !list.is_empty() {
                out.push_str(&format!("    {{\\small {list}}}\\\\[4pt]\n"));
            }
        }
        out.push('\n');
    }

    if !record.certifications.is_empty() {
        out.push_str("    \\cvsection{Certifications}\n");
        for cert in &record.certifications {
            out.push_str(&certification(cert));
        }
        out.push('\n');
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        out.push_str("    \\cvsection{Languages}\n");
        for language in languages {
            out.push_str(&format!(
                "    {} \\hfill {{\\footnotesize {}}}\\\\\n",
                esc(&language.language),
                language.proficiency
            ));
        }
        out.push('\n');
    }

    out
}

fn main_column(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::new();

    if present(&info.summary) {
        out.push_str(&format!("    \\cvsection{{Summary}}\n    {}\n\n", esc(&info.summary)));
    }

    if !record.experience.is_empty() {
        out.push_str("    \\cvsection{Experience}\n");
        for exp in &record.experience {
            out.push_str(&stack(&[
                heading(&exp.job_title, &date_range(&exp.start_date, &exp.end_date, exp.current)),
                detail(&exp.company, &exp.location),
            ]));
            out.push_str(&itemize("", "", &exp.bullet_points));
            out.push_str("    \\vspace{4pt}\n\n");
        }
    }

    if !record.education.is_empty() {
        out.push_str("    \\cvsection{Education}\n");
        for edu in &record.education {
            let gpa = edu
                .gpa
                .as_deref()
                .filter(|gpa| present(gpa))
                .map(|gpa| format!("    {{\\small GPA: {}}}", esc(gpa)))
                .unwrap_or_default();
            out.push_str(&stack(&[
                heading(&edu.institution, &latex_date(&edu.graduation_date)),
                detail(&edu.degree, &edu.location),
                gpa,
            ]));
            out.push_str(&itemize("", "", &edu.bullet_points));
            out.push_str("    \\vspace{4pt}\n\n");
        }
    }

    if !record.projects.is_empty() {
        out.push_str("    \\cvsection{Projects}\n");
        for project in &record.projects {
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, "Link"))
                .unwrap_or_default();
            let description = if present(&project.description) {
                format!("    {}", esc(&project.description))
            } else {
                String::new()
            };
            let tech = skill_list(&project.technologies);
            let tech = if tech.is_empty() {
                tech
            } else {
                format!("    {{\\small\\textit{{Tech: {tech}}}}}")
            };
            out.push_str(&stack(&[heading(&project.name, &link), description, tech]));
            out.push_str(&itemize("", "", &project.bullet_points));
            out.push_str("    \\vspace{4pt}\n\n");
        }
    }

    for section in visible_custom(record) {
        out.push_str(&custom(section));
    }

    out
}

fn heading(title: &str, right: &str) -> String {
    if right.is_empty() {
        format!("    \\textbf{{{}}}", esc(title))
    } else {
        format!("    \\textbf{{{}}} \\hfill {{\\small\\color{{accent}} {right}}}", esc(title))
    }
}

fn detail(primary: &str, secondary: &str) -> String {
    match (present(primary), present(secondary)) {
        (false, false) => String::new(),
        (_, false) => format!("    \\textit{{{}}}", esc(primary)),
        _ => format!("    \\textit{{{}}} \\hfill {{\\small {}}}", esc(primary), esc(secondary)),
    }
}

/// Name and date on the first line, issuer and link on the second.
fn certification(cert: &CertificationItem) -> String {
    let date = if present(&cert.date) {
        format!(" \\hfill {{\\footnotesize {}}}", latex_date(&cert.date))
    } else {
        String::new()
    };
    let link = link_of(&cert.link)
        .map(|url| format!(" \\hfill {{\\footnotesize {}}}", labeled_link(url, "Link")))
        .unwrap_or_default();
    let issuer = if present(&cert.issuer) || !link.is_empty() {
        format!("    \\textit{{\\footnotesize {}}}{link}", esc(&cert.issuer))
    } else {
        String::new()
    };
    let mut out = stack(&[format!("    \\textbf{{\\small {}}}{date}", esc(&cert.name)), issuer]);
    out.push_str("    \\vspace{3pt}\n\n");
    out
}

fn custom(section: &CustomSection) -> String {
    format!(
        "    \\cvsection{{{}}}\n{}\n",
        esc(&section.title),
        itemize("", "", &section.items)
    )
}

pub fn example() -> ResumeRecord {
    let mut bsc = EducationItem::new("BSc Economics", "University of Warwick", "Coventry, UK", "2015-07");
    bsc.gpa = Some("First Class Honours".to_string());

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Daniel Okafor".to_string(),
            email: "daniel.okafor@proton.me".to_string(),
            phone: "+44 7700 900461".to_string(),
            location: "Manchester, UK".to_string(),
            summary: "Data analyst who builds the dashboards teams actually open. Comfortable from raw SQL to stakeholder presentations, with a focus on retail and subscription businesses.".to_string(),
            profiles: vec![
                ProfileLink {
                    network: "LinkedIn".to_string(),
                    label: "danielokafor".to_string(),
                    url: "https://www.linkedin.com/in/danielokafor".to_string(),
                },
                ProfileLink {
                    network: "GitHub".to_string(),
                    label: "dokafor".to_string(),
                    url: "https://github.com/dokafor".to_string(),
                },
            ],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Senior Data Analyst",
                "Boohoo Group",
                "Manchester, UK",
                "2021-05",
                "",
                &[
                    "Own the weekly trading pack read by the executive team",
                    "Moved 60 legacy reports from Excel to Looker, saving 30 analyst hours a week",
                ],
            ),
            ExperienceItem::new(
                "Data Analyst",
                "Auto Trader UK",
                "Manchester, UK",
                "2015-09",
                "2021-04",
                &["Built the pricing indicator model behind 400k monthly valuations"],
            ),
        ],
        education: vec![bsc],
        skills: vec![
            SkillCategory::new("Analysis", &["SQL", "Python", "dbt", "A/B Testing"]),
            SkillCategory::new("Visualisation", &["Looker", "Tableau", "Power BI"]),
        ],
        projects: vec![ProjectItem::new(
            "Open Rail Delays",
            "Public dashboard of UK rail punctuality built on open data feeds.",
            &["Python", "DuckDB", "Streamlit"],
            Some("https://github.com/dokafor/rail-delays"),
        )],
        certifications: vec![
            CertificationItem::new(
                "Google Data Analytics Certificate",
                "Google",
                "2020-11",
                Some("https://coursera.org/verify/ABC123"),
            ),
            CertificationItem::new("dbt Analytics Engineering", "dbt Labs", "2022-06", None),
        ],
        languages: vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("Yoruba", Proficiency::Intermediate),
        ],
        custom_sections: vec![CustomSection::new(
            "Community",
            &["Organiser, Manchester Data Meetup", "Mentor, Code Your Future"],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_comes_first() {
        let markup = render(&example());
        let skills = markup.find(r"\cvsection{Skills}").unwrap();
        let experience = markup.find(r"\cvsection{Experience}").unwrap();
        assert!(skills < experience);
        assert!(markup.contains("\\begin{minipage}[t]{0.3\\textwidth}"));
    }

    #[test]
    fn test_profile_image_tops_the_sidebar() {
        let mut record = example();
        record.personal_info.profile_image = Some("QUJD".to_string());
        let markup = render(&record);
        let image = markup.find(PROFILE_IMAGE_PATH).unwrap();
        assert!(image < markup.find(r"\cvsection{Skills}").unwrap());
    }

    #[test]
    fn test_main_column_alone_when_sidebar_is_empty() {
        let mut record = ResumeRecord::default();
        record.personal_info.summary = "Short.".to_string();
        let markup = render(&record);
        assert!(markup.contains("\\begin{minipage}[t]{0.66\\textwidth}"));
        assert!(!markup.contains("\\hfill\n\\begin{minipage}"));
    }
}
