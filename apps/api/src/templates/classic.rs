//! Classic Professional: one column, centered header, ruled small-caps headings.

use super::{
    certification_line, contact_parts, esc, has_header, itemize, labeled_link, link_of, present,
    skill_list, visible_custom, visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    EducationItem, ExperienceItem, PersonalInfo, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[a4paper,12pt]{article}
\usepackage{url}
\usepackage{parskip}
\usepackage[usenames,dvipsnames]{xcolor}
\usepackage[scale=0.9]{geometry}
\usepackage{tabularx}
\usepackage{enumitem}
\usepackage{titlesec}
\usepackage[unicode, draft=false]{hyperref}

\definecolor{linkcolour}{rgb}{0,0.2,0.6}
\hypersetup{colorlinks,breaklinks,urlcolor=linkcolour,linkcolor=linkcolour}

\newcolumntype{C}{>{\centering\arraybackslash}X}

\titleformat{\section}{\Large\scshape\raggedright}{}{0em}{}[\titlerule]
\titlespacing{\section}{0pt}{10pt}{10pt}

\pagestyle{empty}

\begin{document}

";

const BULLETS: &str = r"nosep,after=\strut,leftmargin=1em,itemsep=3pt,label=--";
const PLAIN_LIST: &str = "leftmargin=*,label={}";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str("\\begin{tabularx}{\\linewidth}{@{} C @{}}\n");
        out.push_str(&format!("\\Huge{{{}}} \\\\[7.5pt]\n", esc(&info.name)));
        let contacts = contact_parts(info, false);
        if !contacts.is_empty() {
            out.push_str(&format!("{} \\\\\n", contacts.join(" $|$ ")));
        }
        out.push_str("\\end{tabularx}\n\n");
    }

    if present(&info.summary) {
        out.push_str(&format!("\\section{{Summary}}\n{}\n\n", esc(&info.summary)));
    }

    if !record.experience.is_empty() {
        out.push_str("\\section{Work Experience}\n\n");
        for exp in &record.experience {
            out.push_str(&heading(
                &esc(&exp.job_title),
                &date_range(&exp.start_date, &exp.end_date, exp.current),
            ));
            out.push_str(&detail(&exp.company, &exp.location));
            out.push_str(&itemize(BULLETS, "", &exp.bullet_points));
            out.push('\n');
        }
    }

    if !record.projects.is_empty() {
        out.push_str("\\section{Projects}\n\n");
        for project in &record.projects {
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, "Link"))
                .unwrap_or_default();
            out.push_str(&heading(&esc(&project.name), &link));
            if present(&project.description) {
                out.push_str(&format!("{}\n\n", esc(&project.description)));
            }
            let tech = skill_list(&project.technologies);
            if !tech.is_empty() {
                out.push_str(&format!("\\textit{{Tech: {tech}}}\n\n"));
            }
            out.push_str(&itemize(BULLETS, "", &project.bullet_points));
            out.push('\n');
        }
    }

    if !record.education.is_empty() {
        out.push_str("\\section{Education}\n\n");
        for edu in &record.education {
            out.push_str(&education(edu));
        }
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str(&format!("\\section{{Skills}}\n\\begin{{itemize}}[{PLAIN_LIST}]\n"));
        for category in skills {
            out.push_str(&format!("  \\item {}\n", skill_line(category)));
        }
        out.push_str("\\end{itemize}\n\n");
    }

    if !record.certifications.is_empty() {
        out.push_str(&format!("\\section{{Certifications}}\n\\begin{{itemize}}[{PLAIN_LIST}]\n"));
        for cert in &record.certifications {
            out.push_str(&format!("  \\item {}\n", certification_line(cert)));
        }
        out.push_str("\\end{itemize}\n\n");
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        out.push_str(&format!("\\section{{Languages}}\n\\begin{{itemize}}[{PLAIN_LIST}]\n"));
        for language in languages {
            out.push_str(&format!(
                "  \\item \\textbf{{{}}}: {}\n",
                esc(&language.language),
                language.proficiency
            ));
        }
        out.push_str("\\end{itemize}\n\n");
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize(BULLETS, "", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

/// Bold title on the left, `right` flush right.
fn heading(title: &str, right: &str) -> String {
    format!(
        "\\begin{{tabularx}}{{\\linewidth}}{{@{{}}l X r@{{}}}}\n\\textbf{{{title}}} & \\hfill & {right} \\\\[3.75pt]\n\\end{{tabularx}}\n"
    )
}

/// `\textit{primary}, secondary`, or nothing when both are blank.
fn detail(primary: &str, secondary: &str) -> String {
    if !present(primary) && !present(secondary) {
        return String::new();
    }
    let mut line = format!("\\textit{{{}}}", esc(primary));
    if present(secondary) {
        line.push_str(&format!(", {}", esc(secondary)));
    }
    line.push_str("\n\n");
    line
}

fn education(edu: &EducationItem) -> String {
    let mut out = heading(&esc(&edu.institution), &latex_date(&edu.graduation_date));
    out.push_str(&detail(&edu.degree, &edu.location));
    if let Some(gpa) = edu.gpa.as_deref().filter(|gpa| present(gpa)) {
        out.push_str(&format!("GPA: {}\n\n", esc(gpa)));
    }
    out.push_str(&itemize(BULLETS, "", &edu.bullet_points));
    out.push('\n');
    out
}

fn skill_line(category: &SkillCategory) -> String {
    format!(
        "\\textbf{{{}:}} {}",
        esc(&category.category),
        skill_list(&category.skills)
    )
}

pub fn example() -> ResumeRecord {
    let mut mba = EducationItem::new(
        "Master of Business Administration (MBA)",
        "Harvard Business School",
        "Boston, MA",
        "2017-05-01",
    );
    mba.bullet_points = vec!["Focus on Strategy and Analytics".to_string()];

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            location: "New York, NY".to_string(),
            summary: "Experienced Business Analyst with over 5 years of experience in data analysis, project management, and strategic planning. Proven track record of improving operational efficiency and driving business growth through data-driven insights.".to_string(),
            ..PersonalInfo::default()
        },
        experience: vec![
            ExperienceItem::new(
                "Senior Business Analyst",
                "Global Corp",
                "New York, NY",
                "2020-01-01",
                "",
                &[
                    "Led a team of 5 analysts to deliver key insights that increased revenue by 15%.",
                    "Streamlined reporting processes, reducing manual work by 30%.",
                    "Collaborated with cross-functional teams to define project requirements and deliverables.",
                ],
            ),
            ExperienceItem::new(
                "Business Analyst",
                "Tech Solutions Inc.",
                "Boston, MA",
                "2017-06-01",
                "2019-12-31",
                &[
                    "Conducted market research and competitor analysis to identify new business opportunities.",
                    "Developed and maintained dashboards to track key performance indicators (KPIs).",
                    "Assisted in the implementation of a new CRM system.",
                ],
            ),
        ],
        education: vec![
            mba,
            EducationItem::new(
                "Bachelor of Science in Economics",
                "University of Chicago",
                "Chicago, IL",
                "2015-05-01",
            ),
        ],
        skills: vec![
            SkillCategory::new("Analysis", &["SQL", "Tableau", "Power BI", "Excel", "Python"]),
            SkillCategory::new(
                "Management",
                &["Agile", "Scrum", "Project Management", "Strategic Planning"],
            ),
        ],
        ..ResumeRecord::default()
    }
}
