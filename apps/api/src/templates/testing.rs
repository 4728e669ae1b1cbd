//! Fixtures and recovery assertions shared by the template tests.

use crate::latex::format_date;
use crate::models::resume::{
    CertificationItem, CustomSection, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    Proficiency, ProfileLink, ProjectItem, ResumeRecord, SkillCategory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Custom,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
        Section::Languages,
        Section::Custom,
    ];

    /// Every heading text any template uses for the section.
    pub fn headings(self) -> &'static [&'static str] {
        match self {
            Section::Summary => &["Summary", "Profile", "About"],
            Section::Experience => &["Experience"],
            Section::Education => &["Education"],
            Section::Skills => &["Skills", "Competencies"],
            Section::Projects => &["Projects"],
            Section::Certifications => &["Certifications", "Awards"],
            Section::Languages => &["Languages"],
            Section::Custom => &["Volunteering"],
        }
    }
}

pub fn without_section(mut record: ResumeRecord, section: Section) -> ResumeRecord {
    match section {
        Section::Summary => record.personal_info.summary.clear(),
        Section::Experience => record.experience.clear(),
        Section::Education => record.education.clear(),
        Section::Skills => record.skills.clear(),
        Section::Projects => record.projects.clear(),
        Section::Certifications => record.certifications.clear(),
        Section::Languages => record.languages.clear(),
        Section::Custom => record.custom_sections.clear(),
    }
    record
}

/// A full record whose text never collides with a section heading.
pub fn neutral_record() -> ResumeRecord {
    let mut education = EducationItem::new(
        "BSc Computer Science",
        "University of Washington",
        "Seattle, WA",
        "2017-05",
    );
    education.gpa = Some("3.8/4.0".to_string());
    education.bullet_points = vec!["Teaching assistant for Operating Systems".to_string()];

    let mut project = ProjectItem::new(
        "Tidewatch",
        "Open-source alerting pipeline for tide gauge data.",
        &["Rust", "Tokio"],
        Some("https://github.com/jreyes/tidewatch"),
    );
    project.bullet_points = vec!["Processes 2M readings per day".to_string()];

    ResumeRecord {
        personal_info: PersonalInfo {
            name: "Jordan Reyes".to_string(),
            email: "jordan.reyes@example.com".to_string(),
            phone: "+1 (415) 555-0142".to_string(),
            location: "Oakland, CA".to_string(),
            summary: "Platform engineer focused on reliability, observability and fast feedback loops."
                .to_string(),
            profiles: vec![
                ProfileLink {
                    network: "GitHub".to_string(),
                    label: "jreyes".to_string(),
                    url: "https://github.com/jreyes".to_string(),
                },
                ProfileLink {
                    network: "LinkedIn".to_string(),
                    label: "in/jreyes".to_string(),
                    url: "https://www.linkedin.com/in/jreyes".to_string(),
                },
            ],
            profile_image: None,
        },
        experience: vec![
            ExperienceItem::new(
                "Staff Engineer",
                "Northwind Logistics",
                "Remote",
                "2021-03-01",
                "",
                &[
                    "Cut p99 latency by 35% across the routing API",
                    "Led migration of 40 services to Kubernetes",
                ],
            ),
            ExperienceItem::new(
                "Software Engineer",
                "Blue Harbor Bank",
                "Oakland, CA",
                "2017-06-01",
                "2021-02-28",
                &["Built the ledger reconciliation service"],
            ),
        ],
        education: vec![education],
        skills: vec![
            SkillCategory::new("Programming", &["Rust", "Go", "SQL"]),
            SkillCategory::new("Infrastructure", &["Kubernetes", "Terraform", "PostgreSQL"]),
        ],
        projects: vec![project],
        certifications: vec![
            CertificationItem::new(
                "Certified Kubernetes Administrator",
                "CNCF",
                "2022-11-01",
                Some("https://www.cncf.io/certification/cka/"),
            ),
            CertificationItem::new("AWS Solutions Architect Associate", "Amazon Web Services", "2020-04", None),
        ],
        languages: vec![
            LanguageItem::new("English", Proficiency::Native),
            LanguageItem::new("Spanish", Proficiency::Professional),
        ],
        custom_sections: vec![CustomSection::new(
            "Volunteering",
            &["Mentor at Code Club", "Organizer of the East Bay Rust meetup"],
        )],
    }
}

/// [`neutral_record`] with LaTeX-reserved characters in free-text fields. Name
/// and location differ so the header parser cannot confuse them.
pub fn reserved_record() -> ResumeRecord {
    let reserved = r"\ & % $ # _ { } ~ ^";
    let mut record = neutral_record();
    record.personal_info.name = "Smith & Jones_50%".to_string();
    record.personal_info.location = "Unit #4, Zone_B".to_string();
    record.personal_info.summary = format!("Saves 30% on R&D {reserved}");
    record.experience[0].job_title = "R&D Lead #2".to_string();
    record.experience[0].company = "Barnes & Noble".to_string();
    record.experience[0].bullet_points = vec![reserved.to_string(), "Grew ARR by $2M (40%)".to_string()];
    record.education[0].bullet_points = vec!["Course_work in C# & F#".to_string()];
    record.skills[0].skills = vec!["C#".to_string(), "R&D".to_string(), "50%".to_string()];
    record.custom_sections[0].items = vec![reserved.to_string(), "Raised $5k for Q&A_team".to_string()];
    record
}

/// Records at the edges of what a template must survive.
pub fn sparse_records() -> Vec<(&'static str, ResumeRecord)> {
    let reserved = r"\ & % $ # _ { } ~ ^";
    let mut records = vec![("empty", ResumeRecord::default())];

    let mut name_only = ResumeRecord::default();
    name_only.personal_info.name = "Solo".to_string();
    records.push(("name only", name_only));

    let mut contacts_only = ResumeRecord::default();
    contacts_only.personal_info.email = "someone@example.com".to_string();
    contacts_only.personal_info.profiles.push(ProfileLink::default());
    records.push(("contacts only", contacts_only));

    let mut blank_items = ResumeRecord::default();
    blank_items.experience.push(ExperienceItem::default());
    blank_items.education.push(EducationItem::default());
    blank_items.skills.push(SkillCategory::default());
    blank_items.projects.push(ProjectItem::default());
    blank_items.certifications.push(CertificationItem::default());
    blank_items.languages.push(LanguageItem::default());
    blank_items.custom_sections.push(CustomSection::default());
    blank_items.experience[0].bullet_points = vec![String::new(), "  ".to_string()];
    records.push(("blank items", blank_items));

    let mut hostile = neutral_record();
    hostile.personal_info.name = reserved.to_string();
    hostile.personal_info.summary = reserved.to_string();
    hostile.personal_info.location = reserved.to_string();
    hostile.personal_info.profiles[0].url = format!("https://x.io/{reserved}");
    hostile.experience[0].job_title = reserved.to_string();
    hostile.experience[0].bullet_points = vec![reserved.to_string()];
    hostile.education[0].gpa = Some(reserved.to_string());
    hostile.skills[0].skills = vec![reserved.to_string()];
    hostile.projects[0].link = Some(reserved.to_string());
    hostile.certifications[0].issuer = reserved.to_string();
    hostile.languages[0].language = reserved.to_string();
    hostile.custom_sections[0].title = reserved.to_string();
    hostile.custom_sections[0].items = vec![reserved.to_string()];
    records.push(("reserved characters", hostile));

    let mut with_image = neutral_record();
    with_image.personal_info.profile_image = Some("data:image/jpeg;base64,QUJD".to_string());
    records.push(("profile image", with_image));

    let mut experience_only = ResumeRecord::default();
    experience_only
        .experience
        .push(ExperienceItem::new("Clerk", "", "", "", "", &[]));
    records.push(("experience only", experience_only));

    records
}

fn norm(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn visible(items: &[String]) -> Vec<String> {
    items.iter().map(|item| norm(item)).filter(|item| !item.is_empty()).collect()
}

/// Asserts that every non-empty field of `expected` came back in `parsed`.
pub fn assert_recovers(template: &str, expected: &ResumeRecord, parsed: &ResumeRecord) {
    let want = &expected.personal_info;
    let got = &parsed.personal_info;
    for (field, a, b) in [
        ("name", &want.name, &got.name),
        ("email", &want.email, &got.email),
        ("phone", &want.phone, &got.phone),
        ("location", &want.location, &got.location),
        ("summary", &want.summary, &got.summary),
    ] {
        if !a.trim().is_empty() {
            assert_eq!(norm(b), norm(a), "{template}: personal {field}");
        }
    }
    for profile in want.profiles.iter().filter(|p| !p.url.is_empty()) {
        let found = got
            .profiles
            .iter()
            .find(|p| p.url == profile.url)
            .unwrap_or_else(|| panic!("{template}: profile {} missing", profile.url));
        assert_eq!(found.network, profile.network, "{template}: profile network");
        if !profile.label.is_empty() {
            assert_eq!(found.label, profile.label, "{template}: profile label");
        }
    }

    assert_eq!(parsed.experience.len(), expected.experience.len(), "{template}: experience count");
    for (want, got) in expected.experience.iter().zip(&parsed.experience) {
        assert_eq!(got.job_title, want.job_title, "{template}: job title");
        assert_eq!(got.company, want.company, "{template}: company");
        assert_eq!(got.location, want.location, "{template}: experience location");
        assert_eq!(
            format_date(&got.start_date, false),
            format_date(&want.start_date, false),
            "{template}: start date"
        );
        assert_eq!(
            format_date(&got.end_date, got.current),
            format_date(&want.end_date, want.current),
            "{template}: end date"
        );
        assert_eq!(got.current, want.current, "{template}: current flag");
        assert_eq!(got.bullet_points, visible(&want.bullet_points), "{template}: experience bullets");
    }

    assert_eq!(parsed.education.len(), expected.education.len(), "{template}: education count");
    for (want, got) in expected.education.iter().zip(&parsed.education) {
        assert_eq!(got.degree, want.degree, "{template}: degree");
        assert_eq!(got.institution, want.institution, "{template}: institution");
        assert_eq!(got.location, want.location, "{template}: education location");
        assert_eq!(
            format_date(&got.graduation_date, false),
            format_date(&want.graduation_date, false),
            "{template}: graduation date"
        );
        assert_eq!(got.gpa, want.gpa, "{template}: gpa");
        assert_eq!(got.bullet_points, visible(&want.bullet_points), "{template}: education bullets");
    }

    let want_skills: Vec<_> = expected
        .skills
        .iter()
        .map(|c| (norm(&c.category), visible(&c.skills)))
        .filter(|(category, skills)| !category.is_empty() || !skills.is_empty())
        .collect();
    let got_skills: Vec<_> = parsed
        .skills
        .iter()
        .map(|c| (c.category.clone(), c.skills.clone()))
        .collect();
    assert_eq!(got_skills, want_skills, "{template}: skills");

    assert_eq!(parsed.projects.len(), expected.projects.len(), "{template}: project count");
    for (want, got) in expected.projects.iter().zip(&parsed.projects) {
        assert_eq!(got.name, want.name, "{template}: project name");
        assert_eq!(norm(&got.description), norm(&want.description), "{template}: description");
        assert_eq!(got.technologies, visible(&want.technologies), "{template}: technologies");
        assert_eq!(got.link, want.link, "{template}: project link");
        assert_eq!(got.bullet_points, visible(&want.bullet_points), "{template}: project bullets");
    }

    assert_eq!(
        parsed.certifications.len(),
        expected.certifications.len(),
        "{template}: certification count"
    );
    for (want, got) in expected.certifications.iter().zip(&parsed.certifications) {
        assert_eq!(got.name, want.name, "{template}: certification name");
        assert_eq!(got.issuer, want.issuer, "{template}: issuer");
        assert_eq!(
            format_date(&got.date, false),
            format_date(&want.date, false),
            "{template}: certification date"
        );
        assert_eq!(got.link, want.link, "{template}: certification link");
    }

    let want_languages: Vec<_> = expected
        .languages
        .iter()
        .map(|l| (l.language.as_str(), l.proficiency))
        .collect();
    let got_languages: Vec<_> = parsed
        .languages
        .iter()
        .map(|l| (l.language.as_str(), l.proficiency))
        .collect();
    assert_eq!(got_languages, want_languages, "{template}: languages");

    let want_custom: Vec<_> = expected
        .custom_sections
        .iter()
        .map(|s| (norm(&s.title), visible(&s.items)))
        .collect();
    let got_custom: Vec<_> = parsed
        .custom_sections
        .iter()
        .map(|s| (s.title.clone(), s.items.clone()))
        .collect();
    assert_eq!(got_custom, want_custom, "{template}: custom sections");
}
