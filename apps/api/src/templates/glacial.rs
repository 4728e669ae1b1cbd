//! Glacial Professional: two columns, optional round profile picture, skill bars, blue accents.

use super::{
    email_link, esc, has_header, itemize, labeled_link, link_of, phone_link, present,
    profile_link, skill_level, skill_list, stack, visible_custom, visible_languages,
    visible_skills, PROFILE_IMAGE_PATH,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[9pt,a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage[english]{babel}
\usepackage{geometry}
\usepackage{xcolor}
\usepackage{fontawesome5}
\usepackage{enumitem}
\usepackage{tikz}
\usepackage{graphicx}
\usepackage{hyperref}
\usepackage{helvet}

\renewcommand{\familydefault}{\sfdefault}

\geometry{
    left=1cm,
    right=1cm,
    top=1cm,
    bottom=1cm
}

\definecolor{primary}{RGB}{70, 130, 180}
\definecolor{darktext}{RGB}{40, 40, 40}
\definecolor{lighttext}{RGB}{100, 100, 100}

\newcommand{\sectiontitle}[1]{
    \vspace{0.25cm}
    {\color{darktext}\large\textbf{\uppercase{#1}}} \\
    {\color{primary}\rule{\linewidth}{0.8pt}}
    \vspace{0.15cm}
}

\newcommand{\skillbar}[2]{
    \noindent\begin{minipage}{0.45\linewidth}
        \small #1
    \end{minipage}
    \begin{minipage}{0.5\linewidth}
        \begin{tikzpicture}
            \fill[lightgray!30, rounded corners=2pt] (0,0) rectangle (3.5, 0.15);
            \fill[primary, rounded corners=2pt] (0,0) rectangle (#2*0.035, 0.15);
            \draw[primary!50] (3.5, 0.075) circle (0.08);
        \end{tikzpicture}
    \end{minipage}
    \vspace{0.05cm}
}

\setlength{\parindent}{0pt}

\begin{document}

";

const BULLETS: &str = "leftmargin=*, nosep, itemsep=1pt, topsep=2pt";
const SQUARES: &str = r"label={\color{primary}$\blacksquare$}, nosep, itemsep=1pt, leftmargin=*";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str(&header(info));
    }

    let left = left_column(record);
    let right = right_column(record);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => {}
        (false, true) => out.push_str(&column("0.58", &left)),
        (true, false) => out.push_str(&column("0.38", &right)),
        (false, false) => {
            out.push_str(&column("0.58", &left));
            out.push_str("\\hfill\n");
            out.push_str(&column("0.38", &right));
        }
    }

    out.push_str("\n\\end{document}\n");
    out
}

fn header(info: &PersonalInfo) -> String {
    let mut out = String::new();
    out.push_str("\\begin{minipage}[t]{0.45\\textwidth}\n");
    out.push_str(&format!("    {{\\LARGE\\textbf{{{}}}}}\n", esc(&info.name)));
    out.push_str("\\end{minipage}\n\\hfill\n");

    out.push_str("\\begin{minipage}[t]{0.2\\textwidth}\n    \\centering\n    \\vspace{0.2cm}\n");
    if info.profile_image_payload().is_some() {
        out.push_str(&format!(
            "    \\begin{{tikzpicture}}\n        \\clip (0,0) circle (1.2cm);\n        \\node at (0,0) {{\\includegraphics[width=2.4cm]{{{PROFILE_IMAGE_PATH}}}}};\n    \\end{{tikzpicture}}\n"
        ));
    } else {
        out.push_str("    \\begin{tikzpicture}\n        \\fill[gray!20] (0,0) circle (1.2cm);\n        \\node[text=gray!50] at (0,0) {\\Large\\faUser};\n    \\end{tikzpicture}\n");
    }
    out.push_str("\\end{minipage}\n\\hfill\n");

    let mut lines = Vec::new();
    if present(&info.email) {
        lines.push(format!("{} \\hspace{{0.1cm}} \\faEnvelope", email_link(&info.email)));
    }
    if present(&info.phone) {
        lines.push(format!("{} \\hspace{{0.1cm}} \\faMobile", phone_link(&info.phone)));
    }
    if present(&info.location) {
        lines.push(format!("{} \\hspace{{0.1cm}} \\faMapMarker", esc(&info.location)));
    }
    lines.extend(info.profiles.iter().filter_map(profile_line));

    out.push_str("\\begin{minipage}[t]{0.3\\textwidth}\n    \\raggedleft\n    \\footnotesize\n");
    if !lines.is_empty() {
        out.push_str(&format!("    {}\n", lines.join(" \\\\\n    ")));
    }
    out.push_str("\\end{minipage}\n\n");
    out.push_str("\\vspace{0.3cm}\n{\\color{primary}\\rule{\\linewidth}{0.8pt}}\n\\vspace{0.3cm}\n\n");
    out
}

fn profile_line(profile: &ProfileLink) -> Option<String> {
    let text = profile_link(profile);
    if text.is_empty() {
        return None;
    }
    let icon = match profile.network.to_lowercase().as_str() {
        "linkedin" => "\\faLinkedin",
        "github" => "\\faGithub",
        "gitlab" => "\\faGitlab",
        "twitter" => "\\faTwitter",
        _ => "\\faGlobe",
    };
    Some(format!("{text} \\hspace{{0.1cm}} {icon}"))
}

fn column(width: &str, content: &str) -> String {
    format!("\\begin{{minipage}}[t]{{{width}\\textwidth}}\n{content}\\end{{minipage}}\n")
}

fn left_column(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::new();

    if present(&info.summary) {
        out.push_str(&format!(
            "    \\sectiontitle{{Profile}}\n    {{\\footnotesize {}}}\n\n",
            esc(&info.summary)
        ));
    }

    if !record.experience.is_empty() {
        out.push_str("    \\sectiontitle{Work Experience}\n\n");
        for exp in &record.experience {
            out.push_str(&entry(&stack(&[
                bold_line(
                    &exp.job_title,
                    &date_range(&exp.start_date, &exp.end_date, exp.current),
                ),
                detail_line(&exp.company, &esc(&exp.location)),
            ]), &exp.bullet_points));
        }
    }

    if !record.education.is_empty() {
        out.push_str("    \\sectiontitle{Education}\n\n");
        for edu in &record.education {
            let gpa = edu
                .gpa
                .as_deref()
                .filter(|gpa| present(gpa))
                .map(|gpa| format!("{{\\footnotesize GPA: {}}}", esc(gpa)))
                .unwrap_or_default();
            out.push_str(&entry(&stack(&[
                bold_line(&edu.institution, &latex_date(&edu.graduation_date)),
                detail_line(&edu.degree, &esc(&edu.location)),
                gpa,
            ]), &edu.bullet_points));
        }
    }

    if !record.projects.is_empty() {
        out.push_str("    \\sectiontitle{Projects}\n\n");
        for project in &record.projects {
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, "Link"))
                .unwrap_or_default();
            let description = if present(&project.description) {
                format!("{{\\footnotesize {}}}", esc(&project.description))
            } else {
                String::new()
            };
            let tech = skill_list(&project.technologies);
            let tech = if tech.is_empty() {
                tech
            } else {
                format!("{{\\footnotesize\\textit{{Tech: {tech}}}}}")
            };
            out.push_str(&entry(
                &stack(&[bold_line(&project.name, &link), description, tech]),
                &project.bullet_points,
            ));
        }
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        out.push_str(&format!("    \\sectiontitle{{Languages}}\n    \\begin{{itemize}}[{SQUARES}]\n"));
        for language in languages {
            out.push_str(&format!(
                "        \\item \\small {} \\hfill {{\\color{{lighttext}}\\footnotesize {}}}\n",
                esc(&language.language),
                language.proficiency
            ));
        }
        out.push_str("    \\end{itemize}\n\n");
    }

    out
}

fn right_column(record: &ResumeRecord) -> String {
    let mut out = String::new();

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str("    \\sectiontitle{Skills}\n\n");
        for category in skills {
            out.push_str(&format!("    \\textbf{{\\small {}}}\\\\[2pt]\n", esc(&category.category)));
            for skill in category.skills.iter().filter(|skill| present(skill)) {
                out.push_str(&format!(
                    "    \\skillbar{{{}}}{{{}}}\n",
                    esc(skill),
                    skill_level(skill.trim())
                ));
            }
            out.push('\n');
        }
    }

    for section in visible_custom(record) {
        out.push_str(&custom(section));
    }

    if !record.certifications.is_empty() {
        out.push_str("    \\sectiontitle{Honours and Awards}\n\n");
        for cert in &record.certifications {
            out.push_str(&award(cert));
        }
    }

    out
}

/// Square marker beside a minipage holding the entry.
fn entry(lines: &str, bullets: &[String]) -> String {
    let mut out = String::from(
        "    \\begin{minipage}[t]{0.05\\linewidth}\n        {\\color{primary}\\rule{0.25cm}{0.25cm}}\n    \\end{minipage}\n",
    );
    out.push_str("    \\begin{minipage}[t]{0.9\\linewidth}\n");
    out.push_str(lines);
    let list = itemize(BULLETS, "\\footnotesize ", bullets);
    if !list.is_empty() {
        out.push_str("    \\vspace{0.05cm}\n");
        out.push_str(&list);
    }
    out.push_str("    \\end{minipage}\n    \\vspace{0.2cm}\n\n");
    out
}

fn bold_line(title: &str, right: &str) -> String {
    if right.is_empty() {
        format!("    \\textbf{{\\normalsize {}}}", esc(title))
    } else {
        format!(
            "    \\textbf{{\\normalsize {}}} \\hfill {{\\color{{primary}}\\footnotesize {right}}}",
            esc(title)
        )
    }
}

/// Italic primary text with `right` (already LaTeX) pushed to the right edge.
fn detail_line(primary: &str, right: &str) -> String {
    if !present(primary) && right.is_empty() {
        return String::new();
    }
    let mut line = format!("    \\textit{{\\small {}}}", esc(primary));
    if !right.is_empty() {
        line.push_str(&format!(" \\hfill {{\\color{{primary}}\\footnotesize {right}}}"));
    }
    line
}

fn custom(section: &CustomSection) -> String {
    format!(
        "    \\sectiontitle{{{}}}\n{}\n",
        esc(&section.title),
        itemize("leftmargin=*, nosep, itemsep=1pt", "\\footnotesize ", &section.items)
    )
}

fn award(cert: &CertificationItem) -> String {
    let date = if present(&cert.date) {
        format!(" \\hfill {{\\color{{lighttext}}\\footnotesize {}}}", latex_date(&cert.date))
    } else {
        String::new()
    };
    let link = link_of(&cert.link)
        .map(|url| format!(" \\hfill {{\\footnotesize {}}}", labeled_link(url, "Link")))
        .unwrap_or_default();
    let detail = if present(&cert.issuer) || !link.is_empty() {
        format!("    \\textit{{\\footnotesize {}}}{link}", esc(&cert.issuer))
    } else {
        String::new()
    };
    let mut out = stack(&[format!("    \\textbf{{\\small {}}}{date}", esc(&cert.name)), detail]);
    out.push_str("    \\vspace{0.1cm}\n\n");
    out
}

pub fn example() -> ResumeRecord {
    ResumeRecord {
        personal_info: PersonalInfo {
            name: "John Doe".to_string(),
            email: "john.doe@gmail.com".to_string(),
            phone: "202-555-0166".to_string(),
            location: "New York, USA".to_string(),
            summary: "Professional Business Developer with more than four years of experience in the business development processes. Involved in product testing, management, and development of new business opportunities.".to_string(),
            profiles: vec![
                ProfileLink {
                    network: "LinkedIn".to_string(),
                    label: "linkedin.com/in/john.doe".to_string(),
                    url: "https://linkedin.com/in/john.doe".to_string(),
                },
                ProfileLink {
                    network: "Website".to_string(),
                    label: "john.doe".to_string(),
                    url: "https://john.doe".to_string(),
                },
            ],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Business Development Manager",
                "AirState Solutions",
                "New York, USA",
                "2014-09",
                "2017-06",
                &[
                    "Successfully managed $2 - 3 million budget projects and successfully achieved the project scheduled goals.",
                    "Developed and implemented new marketing and sales plans and defined the strategy for the next 5 years.",
                    "Reviewed constantly the customer feedback and then suggested ways to improve the processes and customer service levels which increased the satisfaction rate from 81% to 95%.",
                    "Ensured that new clients will grow into a loyal customer base in a specialist niche market by implementing a new loyalty program.",
                ],
            ),
            ExperienceItem::new(
                "Business Development Assistant",
                "AirState Solutions",
                "Chicago, USA",
                "2012-08",
                "2014-05",
                &[
                    "Increased the customer satisfaction rate by 25% by improving the customer service.",
                    "Planned, supervised, and coordinated daily activity of 3 junior business analysts.",
                    "Improved the communication with the Marketing department to better understand the competitive position.",
                    "Directed the creation and implementation of a Business Continuity Plan, and the management of audit programs.",
                ],
            ),
        ],
        education: vec![EducationItem::new(
            "MSc in Economics and Business Administration",
            "The University of Chicago",
            "Chicago, USA",
            "2010-06",
        )],
        skills: vec![SkillCategory::new(
            "Professional Skills",
            &[
                "SEO",
                "Public Speaking",
                "Negotiation",
                "Teamwork",
                "Decision Making",
                "Research & Strategy",
                "Emotional Intelligence",
                "Outbound Marketing",
                "Email Marketing",
                "Google Analytics",
                "Sales & Marketing",
            ],
        )],
        certifications: vec![
            CertificationItem::new(
                "Jury Member, Venture Cup Entrepreneurship Competition",
                "Venture Cup USA",
                "2016",
                None,
            ),
            CertificationItem::new(
                "Sales Individual & Business Development Award",
                "AirState Business Awards",
                "2015",
                None,
            ),
            CertificationItem::new(
                "Excellence in Customer Partnering Award",
                "IES - Institute of Excellence in Sales",
                "",
                None,
            ),
        ],
        languages: vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("Spanish", Proficiency::Fluent),
            LanguageItem::new("French", Proficiency::Intermediate),
        ],
        custom_sections: vec![CustomSection::new(
            "ORGANIZATIONS",
            &[
                "American Management Association (2015 - Present)",
                "Association of Private Enterprise Education (2014 - Present)",
                "eBusiness Association (eBA) (2013 - Present)",
            ],
        )],
        ..ResumeRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::parse;

    #[test]
    fn test_placeholder_without_image() {
        let markup = render(&example());
        assert!(markup.contains(r"\faUser"));
        assert!(!markup.contains(PROFILE_IMAGE_PATH));
    }

    #[test]
    fn test_profile_image_is_referenced_by_path() {
        let mut record = example();
        record.personal_info.profile_image = Some("data:image/jpeg;base64,QUJD".to_string());
        let markup = render(&record);
        assert!(markup.contains(r"\includegraphics[width=2.4cm]{profile.jpg}"));
        assert!(!markup.contains("QUJD"));
    }

    #[test]
    fn test_skill_bars_are_stable() {
        let markup = render(&example());
        let level = skill_level("Negotiation");
        assert!(markup.contains(&format!(r"\skillbar{{Negotiation}}{{{level}}}")));
        assert_eq!(markup, render(&example()));
    }

    #[test]
    fn test_awards_without_date_or_issuer_parse_back() {
        let mut record = ResumeRecord::default();
        record.certifications = vec![
            CertificationItem::new("Top Seller", "", "2019", None),
            CertificationItem::new("Mentor of the Year", "", "", Some("https://awards.example.com/m")),
        ];
        let parsed = parse(&render(&record)).unwrap();
        assert_eq!(parsed.certifications.len(), 2);
        assert_eq!(parsed.certifications[0].name, "Top Seller");
        assert_eq!(parsed.certifications[0].date, "2019");
        assert_eq!(
            parsed.certifications[1].link.as_deref(),
            Some("https://awards.example.com/m")
        );
    }
}
