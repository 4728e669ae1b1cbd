//! Executive: navy banner header, competencies table, macro-driven entry lists.

use super::{
    contact_parts, esc, has_header, labeled_link, link_of, present, skill_list, visible_custom,
    visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[letterpaper,11pt]{article}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage[margin=0.7in]{geometry}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage{tabularx}
\usepackage[dvipsnames]{xcolor}
\usepackage[hidelinks]{hyperref}

\definecolor{banner}{RGB}{25, 42, 86}

\pagestyle{empty}
\raggedright
\setlength{\tabcolsep}{0in}
\setlength{\parindent}{0pt}

\titleformat{\section}{\large\bfseries\scshape\color{banner}}{}{0em}{}[\color{banner}\titlerule]
\titlespacing*{\section}{0pt}{10pt}{5pt}

\newcommand{\resumeItem}[1]{\item\small{#1}}
\newcommand{\resumeSubheading}[4]{
  \item
    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}
      \textbf{#1} & #2 \\
      \textit{\small #3} & \textit{\small #4} \\
    \end{tabular*}\vspace{-5pt}
}
\newcommand{\resumeProjectHeading}[2]{
  \item
    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}
      \small #1 & #2 \\
    \end{tabular*}\vspace{-5pt}
}
\newcommand{\resumeProjectDescription}[1]{\par{\small #1}\par}
\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.1in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}[leftmargin=0.2in, itemsep=1pt]}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-3pt}}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str(&banner(info));
    }

    if present(&info.summary) {
        out.push_str(&format!("\\section{{Executive Summary}}\n{}\n\n", esc(&info.summary)));
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str("\\section{Core Competencies}\n");
        out.push_str("\\begin{tabularx}{\\textwidth}{@{}l@{\\hspace{1em}}X@{}}\n");
        for category in skills {
            out.push_str(&format!(
                "  \\textbf{{{}}} & {} \\\\\n",
                esc(&category.category),
                skill_list(&category.skills)
            ));
        }
        out.push_str("\\end{tabularx}\n\n");
    }

    if !record.experience.is_empty() {
        out.push_str("\\section{Professional Experience}\n  \\resumeSubHeadingListStart\n");
        for exp in &record.experience {
            out.push_str(&subheading([
                esc(&exp.job_title),
                date_range(&exp.start_date, &exp.end_date, exp.current),
                esc(&exp.company),
                esc(&exp.location),
            ]));
            out.push_str(&items(exp.bullet_points.iter().map(|b| esc(b))));
        }
        out.push_str("  \\resumeSubHeadingListEnd\n\n");
    }

    if !record.projects.is_empty() {
        out.push_str("\\section{Selected Projects}\n  \\resumeSubHeadingListStart\n");
        for project in &record.projects {
            out.push_str(&project_heading(project));
            if present(&project.description) {
                out.push_str(&format!(
                    "      \\resumeProjectDescription{{{}}}\n",
                    esc(&project.description)
                ));
            }
            out.push_str(&items(project.bullet_points.iter().map(|b| esc(b))));
        }
        out.push_str("  \\resumeSubHeadingListEnd\n\n");
    }

    if !record.education.is_empty() {
        out.push_str("\\section{Education}\n  \\resumeSubHeadingListStart\n");
        for edu in &record.education {
            out.push_str(&subheading([
                esc(&edu.institution),
                esc(&edu.location),
                esc(&edu.degree),
                latex_date(&edu.graduation_date),
            ]));
            let gpa = edu
                .gpa
                .as_deref()
                .filter(|gpa| present(gpa))
                .map(|gpa| format!("GPA: {}", esc(gpa)));
            out.push_str(&items(gpa.into_iter().chain(edu.bullet_points.iter().map(|b| esc(b)))));
        }
        out.push_str("  \\resumeSubHeadingListEnd\n\n");
    }

    if !record.certifications.is_empty() {
        out.push_str("\\section{Certifications}\n  \\resumeSubHeadingListStart\n");
        for cert in &record.certifications {
            out.push_str(&certification(cert));
        }
        out.push_str("  \\resumeSubHeadingListEnd\n\n");
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let pairs: Vec<String> = languages
            .iter()
            .map(|language| format!("\\textbf{{{}}}: {}", esc(&language.language), language.proficiency))
            .collect();
        out.push_str(&format!("\\section{{Languages}}\n{}\n\n", pairs.join(" $|$ ")));
    }

    for section in visible_custom(record) {
        out.push_str(&custom(section));
    }

    out.push_str("\\end{document}\n");
    out
}

fn banner(info: &PersonalInfo) -> String {
    let mut out = String::from(
        "\\noindent\\colorbox{banner}{\\parbox{\\dimexpr\\textwidth-2\\fboxsep\\relax}{\\centering\\color{white}\n",
    );
    out.push_str("    \\vspace{6pt}\n");
    let contacts = contact_parts(info, false);
    if contacts.is_empty() {
        out.push_str(&format!("    {{\\Huge\\bfseries {}}}\n", esc(&info.name)));
    } else {
        out.push_str(&format!("    {{\\Huge\\bfseries {}}}\\\\[6pt]\n", esc(&info.name)));
        out.push_str(&format!("    {}\n", contacts.join(" $|$ ")));
    }
    out.push_str("    \\vspace{6pt}\n}}\n\n");
    out
}

/// `\resumeSubheading` with its four arguments already rendered.
fn subheading(args: [String; 4]) -> String {
    let [top_left, top_right, bottom_left, bottom_right] = args;
    format!(
        "    \\resumeSubheading\n      {{{top_left}}}{{{top_right}}}\n      {{{bottom_left}}}{{{bottom_right}}}\n"
    )
}

/// A `\resumeItem` list, or nothing when no item has text.
fn items(texts: impl Iterator<Item = String>) -> String {
    let body: String = texts
        .filter(|text| !text.trim().is_empty())
        .map(|text| format!("        \\resumeItem{{{text}}}\n"))
        .collect();
    if body.is_empty() {
        return String::new();
    }
    format!("      \\resumeItemListStart\n{body}      \\resumeItemListEnd\n")
}

fn project_heading(project: &ProjectItem) -> String {
    let tech = skill_list(&project.technologies);
    let mut heading = format!("\\textbf{{{}}}", esc(&project.name));
    if !tech.is_empty() {
        heading.push_str(&format!(" $|$ \\emph{{{tech}}}"));
    }
    let link = link_of(&project.link)
        .map(|url| labeled_link(url, "\\underline{Link}"))
        .unwrap_or_default();
    format!("    \\resumeProjectHeading\n      {{{heading}}}{{{link}}}\n")
}

fn certification(cert: &CertificationItem) -> String {
    let mut heading = format!("\\textbf{{{}}}", esc(&cert.name));
    if present(&cert.issuer) {
        heading.push_str(&format!(" $|$ {}", esc(&cert.issuer)));
    }
    let mut right = latex_date(&cert.date);
    if let Some(url) = link_of(&cert.link) {
        if !right.is_empty() {
            right.push(' ');
        }
        right.push_str(&labeled_link(url, "\\underline{Verify}"));
    }
    format!("    \\resumeProjectHeading\n      {{{heading}}}{{{right}}}\n")
}

fn custom(section: &CustomSection) -> String {
    let mut out = format!("\\section{{{}}}\n", esc(&section.title));
    out.push_str("\\begin{itemize}[leftmargin=0.2in, itemsep=1pt]\n");
    for item in section.items.iter().filter(|item| present(item)) {
        out.push_str(&format!("  \\item \\small {}\n", esc(item)));
    }
    out.push_str("\\end{itemize}\n\n");
    out
}

pub fn example() -> ResumeRecord {
    let mut program = ProjectItem::new(
        "Network Consolidation Program",
        "Merged 14 regional hubs into 5 automated facilities over three years.",
        &["SAP S/4HANA", "Blue Yonder"],
        None,
    );
    program.bullet_points = vec!["Delivered $38M in annual savings with no service disruption".to_string()];

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Margaret Chen".to_string(),
            email: "margaret.chen@outlook.com".to_string(),
            phone: "+1 (312) 555-0188".to_string(),
            location: "Chicago, IL".to_string(),
            summary: "Operations executive with 18 years of experience scaling logistics and manufacturing businesses. Known for disciplined turnarounds, data-driven decision making and building leadership teams that outlast the plan.".to_string(),
            profiles: vec![ProfileLink {
                network: "LinkedIn".to_string(),
                label: "linkedin.com/in/margaretchen".to_string(),
                url: "https://www.linkedin.com/in/margaretchen".to_string(),
            }],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Chief Operating Officer",
                "Meridian Freight Group",
                "Chicago, IL",
                "2019-01",
                "",
                &[
                    "Grew revenue from $480M to $1.1B through network expansion and two acquisitions",
                    "Cut cost per shipment by 22% with a company-wide lean program",
                    "Built and led an executive team of 9 across operations, technology and safety",
                ],
            ),
            ExperienceItem::new(
                "Vice President, Operations",
                "Atlas Manufacturing",
                "Milwaukee, WI",
                "2013-04",
                "2018-12",
                &[
                    "Returned a loss-making division to 12% operating margin within 18 months",
                    "Negotiated supplier consolidation worth $60M over five years",
                ],
            ),
        ],
        education: vec![
            EducationItem::new(
                "Master of Business Administration",
                "Kellogg School of Management",
                "Evanston, IL",
                "2008-06",
            ),
            EducationItem::new(
                "BS Industrial Engineering",
                "Purdue University",
                "West Lafayette, IN",
                "2004-05",
            ),
        ],
        skills: vec![
            SkillCategory::new(
                "Leadership",
                &["P&L Management", "Mergers & Acquisitions", "Board Relations"],
            ),
            SkillCategory::new(
                "Operations",
                &["Lean Six Sigma", "Supply Chain Strategy", "Change Management"],
            ),
        ],
        projects: vec![program],
        certifications: vec![
            CertificationItem::new("Certified Supply Chain Professional", "APICS", "2011-09", None),
            CertificationItem::new(
                "Lean Six Sigma Black Belt",
                "ASQ",
                "2010",
                Some("https://asq.org/cert/verify"),
            ),
        ],
        languages: vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("Mandarin", Proficiency::Fluent),
        ],
        custom_sections: vec![CustomSection::new(
            "Board Memberships",
            &[
                "Director, Illinois Manufacturers' Association (2020 - Present)",
                "Advisory Board, Purdue School of Industrial Engineering",
            ],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_holds_name_and_contacts() {
        let markup = render(&example());
        assert!(markup.contains("{\\Huge\\bfseries Margaret Chen}\\\\[6pt]"));
        assert!(markup.contains(r"\colorbox{banner}"));
    }

    #[test]
    fn test_entry_without_bullets_has_no_item_list() {
        let mut record = ResumeRecord::default();
        record
            .experience
            .push(ExperienceItem::new("Advisor", "Acme", "", "2020-01", "2020-12", &["  "]));
        let markup = render(&record);
        assert!(markup.contains("{Advisor}{Jan 2020 -- Dec 2020}"));
        assert!(!markup.contains("\\resumeItemListStart\n      \\resumeItemListEnd"));
        assert!(!markup[markup.find(r"\begin{document}").unwrap_or(0)..].contains(r"\resumeItem{"));
    }

    #[test]
    fn test_gpa_travels_as_first_item() {
        let mut record = ResumeRecord::default();
        let mut edu = EducationItem::new("MBA", "Kellogg", "", "2008-06");
        edu.gpa = Some("3.7".to_string());
        record.education.push(edu);
        let markup = render(&record);
        assert!(markup.contains(r"\resumeItem{GPA: 3.7}"));
    }
}
