//! Developer Resume: tabular header with labelled links, tabular entries, accent-colored headings.

use super::{
    certification_line, email_link, esc, has_header, itemize, labeled_link, language_pair,
    link_of, phone_link, present, profile_link, skill_list, visible_custom, visible_languages,
    visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, EducationItem, ExperienceItem, PersonalInfo, ProfileLink, ProjectItem,
    ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[a4paper,11pt]{article}

\usepackage[usenames,dvipsnames]{xcolor}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage{array}
\usepackage[margin=0.5in]{geometry}
\usepackage[hidelinks]{hyperref}

\pagestyle{empty}
\setlength{\tabcolsep}{0in}

\raggedbottom
\raggedright

\definecolor{sectioncolor}{RGB}{65,105,225}

\titleformat{\section}{\scshape\large\color{sectioncolor}}{}{0em}{}[\color{black}\titlerule\vspace{0pt}]

\begin{document}

";

const ROW_TABLE: &str = r"\begin{tabular*}{\textwidth}[t]{l@{\extracolsep{\fill}}r}";
const LIST: &str = "leftmargin=0.15in";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str("\\begin{tabular*}{\\textwidth}{l@{\\extracolsep{\\fill}}r}\n");
        let location = if present(&info.location) {
            format!("Location: {}", esc(&info.location))
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  \\textbf{{\\Huge {} \\vspace{{2pt}}}} & {location} \\\\\n",
            esc(&info.name)
        ));
        let links = labelled_links(info);
        if !links.is_empty() {
            out.push_str(&format!("  & {} \\\\\n", links.join(" $|$ ")));
        }
        out.push_str("\\end{tabular*}\n\n");
    }

    if present(&info.summary) {
        out.push_str(&format!(
            "\\section{{Professional Summary}}\n{{\\small\n  {}\n}}\n\n",
            esc(&info.summary)
        ));
    }

    let skills = visible_skills(record);
    if !skills.is_empty() {
        out.push_str("\\section{Technical Skills}\n");
        out.push_str("\\begin{tabular}{@{}p{0.2\\textwidth}p{0.76\\textwidth}}\n");
        for category in skills {
            out.push_str(&format!(
                "  \\textbf{{{}}} & {} \\\\\n",
                esc(&category.category),
                skill_list(&category.skills)
            ));
        }
        out.push_str("\\end{tabular}\n\n");
    }

    if !record.experience.is_empty() {
        out.push_str("\\section{Experience}\n");
        for exp in &record.experience {
            out.push_str(&rows(
                &exp.job_title,
                &date_range(&exp.start_date, &exp.end_date, exp.current),
                &exp.company,
                &exp.location,
            ));
            out.push_str(&itemize(LIST, "\\small ", &exp.bullet_points));
            out.push('\n');
        }
    }

    if !record.education.is_empty() {
        out.push_str("\\section{Education}\n");
        for edu in &record.education {
            out.push_str(&rows(
                &edu.institution,
                &latex_date(&edu.graduation_date),
                &edu.degree,
                &edu.location,
            ));
            if let Some(gpa) = edu.gpa.as_deref().filter(|gpa| present(gpa)) {
                out.push_str(&format!("{{\\small GPA: {}}}\n\n", esc(gpa)));
            }
            out.push_str(&itemize(LIST, "\\small ", &edu.bullet_points));
            out.push('\n');
        }
    }

    if !record.projects.is_empty() {
        out.push_str("\\section{Projects}\n");
        for project in &record.projects {
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, "Link"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{ROW_TABLE}\n  \\textbf{{{}}} & {link} \\\\\n\\end{{tabular*}}\n",
                esc(&project.name)
            ));
            if present(&project.description) {
                out.push_str(&format!("{{\\small {}}}\n\n", esc(&project.description)));
            }
            let tech = skill_list(&project.technologies);
            if !tech.is_empty() {
                out.push_str(&format!("{{\\small \\textit{{Tech: {tech}}}}}\n\n"));
            }
            out.push_str(&itemize(LIST, "\\small ", &project.bullet_points));
            out.push('\n');
        }
    }

    if !record.certifications.is_empty() {
        let lines: Vec<String> = record.certifications.iter().map(certification_line).collect();
        out.push_str("\\section{Certifications}\n");
        out.push_str(&raw_list(&lines));
        out.push('\n');
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let lines: Vec<String> = languages.into_iter().map(language_pair).collect();
        out.push_str("\\section{Languages}\n");
        out.push_str(&raw_list(&lines));
        out.push('\n');
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize(LIST, "\\small ", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

/// `Email: ..`, `Mobile: ..` and one `Network: ..` per profile.
fn labelled_links(info: &PersonalInfo) -> Vec<String> {
    let mut links = Vec::new();
    if present(&info.email) {
        links.push(format!("Email: {}", email_link(&info.email)));
    }
    if present(&info.phone) {
        links.push(format!("Mobile: {}", phone_link(&info.phone)));
    }
    for profile in &info.profiles {
        let link = profile_link(profile);
        if link.is_empty() {
            continue;
        }
        if present(&profile.network) {
            links.push(format!("{}: {link}", esc(&profile.network)));
        } else {
            links.push(link);
        }
    }
    links
}

/// Two-row entry table: bold title and date, then italic detail and location.
fn rows(title: &str, right: &str, detail: &str, location: &str) -> String {
    let mut out = format!("{ROW_TABLE}\n  \\textbf{{{}}} & {right} \\\\\n", esc(title));
    if present(detail) || present(location) {
        out.push_str(&format!(
            "  \\textit{{\\small {}}} & \\textit{{\\small {}}} \\\\\n",
            esc(detail),
            esc(location)
        ));
    }
    out.push_str("\\end{tabular*}\n");
    out
}

/// An itemize over lines that are already LaTeX.
fn raw_list(lines: &[String]) -> String {
    let items: String = lines
        .iter()
        .map(|line| format!("  \\item \\small {line}\n"))
        .collect();
    format!("\\begin{{itemize}}[{LIST}]\n{items}\\end{{itemize}}\n")
}

pub fn example() -> ResumeRecord {
    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Alex Coder".to_string(),
            email: "alex.coder@dev.io".to_string(),
            phone: "+1 (555) 555-0199".to_string(),
            location: "Seattle, WA".to_string(),
            summary: "Full Stack Developer with 4+ years of experience building scalable web applications. Proficient in JavaScript, React, Node.js, and cloud technologies. Passionate about writing clean, maintainable code and solving complex problems.".to_string(),
            profiles: vec![
                ProfileLink {
                    network: "GitHub".to_string(),
                    label: "alexcoder".to_string(),
                    url: "https://github.com/alexcoder".to_string(),
                },
                ProfileLink {
                    network: "LinkedIn".to_string(),
                    label: "alexcoder".to_string(),
                    url: "https://linkedin.com/in/alexcoder".to_string(),
                },
            ],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Senior Software Engineer",
                "Tech Giants",
                "Seattle, WA",
                "2022-01-01",
                "",
                &[
                    "Architected and built a microservices-based backend using Node.js and Kubernetes.",
                    "Optimized frontend performance, achieving a 40% reduction in load times.",
                    "Implemented CI/CD pipelines to automate testing and deployment.",
                ],
            ),
            ExperienceItem::new(
                "Software Developer",
                "StartUp Inc",
                "Remote",
                "2019-05-01",
                "2021-12-31",
                &[
                    "Developed full-stack features for a SaaS platform using React and Python.",
                    "Integrated third-party APIs for payment processing and email services.",
                    "Participated in code reviews and daily stand-ups.",
                ],
            ),
        ],
        education: vec![EducationItem::new(
            "Bachelor of Science in Computer Science",
            "University of Washington",
            "Seattle, WA",
            "2019-06-01",
        )],
        skills: vec![
            SkillCategory::new("Languages", &["JavaScript", "TypeScript", "Python", "Go", "Java"]),
            SkillCategory::new("Frameworks", &["React", "Next.js", "Node.js", "Express", "Django"]),
            SkillCategory::new("Tools", &["Git", "Docker", "Kubernetes", "AWS", "Linux"]),
        ],
        projects: vec![
            ProjectItem::new(
                "Cloud Resume Challenge",
                "Built a serverless resume website using AWS Lambda, API Gateway, and DynamoDB.",
                &["AWS", "Python", "Terraform"],
                Some("https://github.com/alexcoder/cloud-resume"),
            ),
            ProjectItem::new(
                "Task Manager App",
                "A real-time task management application with collaborative features.",
                &["React", "Firebase", "Tailwind CSS"],
                Some("https://taskmanager.demo"),
            ),
        ],
        certifications: vec![CertificationItem::new(
            "AWS Certified Solutions Architect \u{2013} Associate",
            "Amazon Web Services",
            "2023-08-15",
            Some("https://aws.amazon.com/verification"),
        )],
        ..ResumeRecord::default()
    }
}
