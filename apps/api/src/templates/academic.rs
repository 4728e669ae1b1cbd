//! Academic CV: serif body, one `\subsection*` per entry, awards and teaching up front.

use super::{
    certification_line, contact_parts, esc, has_header, itemize, labeled_link, language_pair,
    link_of, present, skill_list, stack, visible_custom, visible_languages, visible_skills,
};
use crate::latex::{date_range, latex_date};
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

const PREAMBLE: &str = r"\documentclass[11pt,letterpaper]{article}
\usepackage[T1]{fontenc}
\usepackage{charter}
\usepackage[margin=1in]{geometry}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\titleformat{\section}{\large\scshape}{}{0em}{}[\titlerule]
\titlespacing*{\section}{0pt}{12pt}{6pt}
\titleformat{\subsection}{\normalsize\bfseries}{}{0em}{}
\titlespacing*{\subsection}{0pt}{6pt}{1pt}

\setlist[itemize]{nosep,leftmargin=1.5em}
\setlength{\parindent}{0pt}
\pagestyle{plain}

\begin{document}

";

pub fn render(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut out = String::from(PREAMBLE);

    if has_header(info) {
        out.push_str("\\begin{center}\n");
        out.push_str(&format!("    {{\\Huge\\scshape {}}}\\\\[4pt]\n", esc(&info.name)));
        let contacts = contact_parts(info, true);
        if !contacts.is_empty() {
            out.push_str(&format!("    {}\n", contacts.join(r" $\cdot$ ")));
        }
        out.push_str("\\end{center}\n\n");
    }

    if present(&info.summary) {
        out.push_str(&format!("\\section*{{Profile}}\n{}\n\n", esc(&info.summary)));
    }

    if !record.education.is_empty() {
        out.push_str("\\section*{Education}\n");
        for edu in &record.education {
            out.push_str(&education(edu));
        }
        out.push('\n');
    }

    if !record.experience.is_empty() {
        out.push_str("\\section*{Research Experience}\n");
        for exp in &record.experience {
            out.push_str(&format!("\\subsection*{{{}}}\n", esc(&exp.job_title)));
            // Emitted even when empty: the parser keys this layout on it.
            out.push_str(&format!(
                "{{\\textit{{{}}}}} \\hfill {}\n",
                meta(&esc(&exp.company), &esc(&exp.location)),
                date_range(&exp.start_date, &exp.end_date, exp.current)
            ));
            out.push_str(&itemize("", "", &exp.bullet_points));
        }
        out.push('\n');
    }

    if !record.projects.is_empty() {
        out.push_str("\\section*{Selected Projects}\n");
        for project in &record.projects {
            out.push_str(&format!("\\subsection*{{{}}}\n", esc(&project.name)));
            let tech = skill_list(&project.technologies);
            let tech = if tech.is_empty() {
                tech
            } else {
                format!("\\textit{{Tech: {tech}}}")
            };
            let link = link_of(&project.link)
                .map(|url| labeled_link(url, &format!("\\texttt{{{}}}", esc(url))))
                .unwrap_or_default();
            out.push_str(&stack(&[esc(&project.description), tech, link]));
            out.push_str(&itemize("", "", &project.bullet_points));
        }
        out.push('\n');
    }

    if !record.certifications.is_empty() {
        out.push_str("\\section*{Honors and Awards}\n\\begin{itemize}\n");
        for cert in &record.certifications {
            out.push_str(&format!("  \\item {}\n", certification_line(cert)));
        }
        out.push_str("\\end{itemize}\n\n");
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

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let pairs: Vec<String> = languages.into_iter().map(language_pair).collect();
        out.push_str(&format!("\\section*{{Languages}}\n{}\n\n", pairs.join(r" $\cdot$ ")));
    }

    for section in visible_custom(record) {
        out.push_str(&format!("\\section*{{{}}}\n", esc(&section.title)));
        out.push_str(&itemize("", "", &section.items));
        out.push('\n');
    }

    out.push_str("\\end{document}\n");
    out
}

/// `first $|$ second`; the first slot keeps its place when only the second is set.
fn meta(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, true) => String::new(),
        (false, true) => first.to_string(),
        (true, false) => format!(" $|$ {second}"),
        (false, false) => format!("{first} $|$ {second}"),
    }
}

fn education(edu: &EducationItem) -> String {
    let mut out = format!("\\subsection*{{{}}}\n", esc(&edu.degree));
    let place = meta(&esc(&edu.institution), &esc(&edu.location));
    let date = latex_date(&edu.graduation_date);
    let line = match (place.is_empty(), date.is_empty()) {
        (true, true) => String::new(),
        (_, true) => format!("{{\\textit{{{place}}}}}"),
        _ => format!("{{\\textit{{{place}}}}} \\hfill Graduated: {date}"),
    };
    let gpa = edu
        .gpa
        .as_deref()
        .filter(|gpa| present(gpa))
        .map(|gpa| format!("GPA: {}", esc(gpa)))
        .unwrap_or_default();
    out.push_str(&stack(&[line, gpa]));
    out.push_str(&itemize("", "", &edu.bullet_points));
    out
}

pub fn example() -> ResumeRecord {
    let mut phd = EducationItem::new(
        "PhD in Computational Biology",
        "Massachusetts Institute of Technology",
        "Cambridge, MA",
        "2018-06",
    );
    phd.bullet_points = vec!["Thesis: Probabilistic models of gene regulation in single cells".to_string()];
    let mut bsc = EducationItem::new("BSc in Mathematics", "University of Toronto", "Toronto, ON", "2012-05");
    bsc.gpa = Some("3.9/4.0".to_string());

    let mut toolkit = ProjectItem::new(
        "scRegNet",
        "Open-source toolkit for inferring regulatory networks from single-cell data.",
        &["Python", "PyTorch"],
        Some("https://github.com/praman/scregnet"),
    );
    toolkit.bullet_points = vec!["Used by more than 40 labs worldwide".to_string()];

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Priya Raman".to_string(),
            email: "p.raman@northeastern.edu".to_string(),
            phone: "+1 (617) 555-0123".to_string(),
            location: "Boston, MA".to_string(),
            summary: "Computational biologist developing statistical methods for single-cell genomics. Research combines probabilistic modelling with large-scale experimental data to understand gene regulation.".to_string(),
            profiles: vec![
                ProfileLink {
                    network: "Website".to_string(),
                    label: "Google Scholar".to_string(),
                    url: "https://scholar.google.com/citations?user=pRaman01".to_string(),
                },
                ProfileLink {
                    network: "GitHub".to_string(),
                    label: "praman".to_string(),
                    url: "https://github.com/praman".to_string(),
                },
            ],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Assistant Professor",
                "Northeastern University",
                "Boston, MA",
                "2021-09",
                "",
                &[
                    "Lead a group of 6 PhD students and 2 postdocs working on single-cell methods",
                    "Secured $1.2M in federal and foundation funding",
                ],
            ),
            ExperienceItem::new(
                "Postdoctoral Fellow",
                "Broad Institute",
                "Cambridge, MA",
                "2018-07",
                "2021-08",
                &["Developed a variational model for cell-type specific regulatory programs"],
            ),
        ],
        education: vec![phd, bsc],
        skills: vec![
            SkillCategory::new("Methods", &["Bayesian inference", "Single-cell RNA-seq", "Phylogenetics"]),
            SkillCategory::new("Programming", &["Python", "R", "Stan"]),
        ],
        projects: vec![toolkit],
        certifications: vec![
            CertificationItem::new(
                "NIH Pathway to Independence Award",
                "National Institutes of Health",
                "2020-04",
                None,
            ),
            CertificationItem::new("Best Paper Award", "RECOMB", "2019", None),
        ],
        languages: vec![
            LanguageItem::new("English", Proficiency::Fluent),
            LanguageItem::new("Tamil", Proficiency::Native),
        ],
        custom_sections: vec![
            CustomSection::new(
                "Teaching",
                &[
                    "CS 5800 Algorithms (Fall 2022 and Spring 2023)",
                    "BIOL 4300 Computational Genomics (Fall 2021)",
                ],
            ),
            CustomSection::new(
                "Selected Publications",
                &[
                    "Raman P. and Chen L. Regulatory programs from sparse single-cell data. Nature Methods, 2022.",
                    "Raman P. Identifiability of latent gene regulatory states. RECOMB, 2019.",
                ],
            ),
        ],
    }
}
