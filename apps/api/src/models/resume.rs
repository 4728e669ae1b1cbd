use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the professional summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Generates a fresh list-item id. Ids are never reused.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileLink {
    pub network: String,
    /// Display text of the link. AI output tends to call this `username`.
    #[serde(alias = "username")]
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub profiles: Vec<ProfileLink>,
    /// Base64 image data, optionally as a `data:image/...;base64,` URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl PersonalInfo {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.email.trim().is_empty()
            && self.phone.trim().is_empty()
            && self.location.trim().is_empty()
            && self.summary.trim().is_empty()
            && self.profiles.is_empty()
    }

    /// True if the header block of a template has anything to show.
    pub fn has_contact(&self) -> bool {
        !self.email.trim().is_empty()
            || !self.phone.trim().is_empty()
            || !self.location.trim().is_empty()
            || !self.profiles.is_empty()
    }

    /// Returns the raw base64 payload of the profile image, without any `data:` prefix.
    pub fn profile_image_payload(&self) -> Option<&str> {
        let image = self.profile_image.as_deref()?.trim();
        let payload = match image.split_once(',') {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => image,
        };
        (!payload.is_empty()).then_some(payload)
    }
}

/// Truncates a summary to `MAX_SUMMARY_CHARS` on a char boundary.
pub fn clamp_summary(summary: &str) -> String {
    summary.chars().take(MAX_SUMMARY_CHARS).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// Mutually exclusive with `end_date`.
    pub current: bool,
    pub bullet_points: Vec<String>,
}

impl ExperienceItem {
    pub fn new(
        job_title: &str,
        company: &str,
        location: &str,
        start_date: &str,
        end_date: &str,
        bullet_points: &[&str],
    ) -> Self {
        let current = end_date.is_empty();
        Self {
            id: new_id(),
            job_title: job_title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            current,
            bullet_points: bullet_points.iter().map(|b| b.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    pub bullet_points: Vec<String>,
}

impl EducationItem {
    pub fn new(degree: &str, institution: &str, location: &str, graduation_date: &str) -> Self {
        Self {
            id: new_id(),
            degree: degree.to_string(),
            institution: institution.to_string(),
            location: location.to_string(),
            graduation_date: graduation_date.to_string(),
            gpa: None,
            bullet_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategory {
    pub id: String,
    pub category: String,
    pub skills: Vec<String>,
}

impl SkillCategory {
    pub fn new(category: &str, skills: &[&str]) -> Self {
        Self {
            id: new_id(),
            category: category.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub bullet_points: Vec<String>,
}

impl ProjectItem {
    pub fn new(name: &str, description: &str, technologies: &[&str], link: Option<&str>) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            link: link.map(String::from),
            bullet_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationItem {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CertificationItem {
    pub fn new(name: &str, issuer: &str, date: &str, link: Option<&str>) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            issuer: issuer.to_string(),
            date: date.to_string(),
            link: link.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Proficiency {
    Native,
    Fluent,
    #[default]
    Professional,
    Intermediate,
    Basic,
}

impl Proficiency {
    pub const ALL: [Proficiency; 5] = [
        Proficiency::Native,
        Proficiency::Fluent,
        Proficiency::Professional,
        Proficiency::Intermediate,
        Proficiency::Basic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Native => "Native",
            Proficiency::Fluent => "Fluent",
            Proficiency::Professional => "Professional",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Basic => "Basic",
        }
    }

    /// Rough level for skill-bar style renderings, 0 – 100.
    pub fn level(&self) -> u8 {
        match self {
            Proficiency::Native => 100,
            Proficiency::Fluent => 90,
            Proficiency::Professional => 75,
            Proficiency::Intermediate => 55,
            Proficiency::Basic => 35,
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProficiency(pub String);

impl FromStr for Proficiency {
    type Err = UnknownProficiency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Proficiency::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownProficiency(needle.to_string()))
    }
}

impl From<String> for Proficiency {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<Proficiency> for String {
    fn from(value: Proficiency) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageItem {
    pub id: String,
    pub language: String,
    pub proficiency: Proficiency,
}

impl LanguageItem {
    pub fn new(language: &str, proficiency: Proficiency) -> Self {
        Self {
            id: new_id(),
            language: language.to_string(),
            proficiency,
        }
    }
}

/// A user-defined catch-all section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub items: Vec<String>,
}

impl CustomSection {
    pub fn new(title: &str, items: &[&str]) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            items: items.iter().map(|i| i.to_string()).collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Root aggregate
// ────────────────────────────────────────────────────────────────────────────

/// The structured resume model edited through the visual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<ProjectItem>,
    pub certifications: Vec<CertificationItem>,
    pub languages: Vec<LanguageItem>,
    pub custom_sections: Vec<CustomSection>,
}

impl ResumeRecord {
    pub fn is_blank(&self) -> bool {
        self.personal_info.is_blank()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
            && self.languages.is_empty()
            && self.custom_sections.is_empty()
    }

    /// Restores the record invariants after an external write (AI output, raw JSON):
    /// missing or duplicate ids are replaced and `current` clears the end date.
    pub fn normalize(&mut self) {
        fn fix_ids<'a>(ids: impl Iterator<Item = &'a mut String>) {
            let mut seen = std::collections::HashSet::new();
            for id in ids {
                if id.trim().is_empty() || !seen.insert(id.clone()) {
                    *id = new_id();
                    seen.insert(id.clone());
                }
            }
        }

        fix_ids(self.experience.iter_mut().map(|e| &mut e.id));
        fix_ids(self.education.iter_mut().map(|e| &mut e.id));
        fix_ids(self.skills.iter_mut().map(|e| &mut e.id));
        fix_ids(self.projects.iter_mut().map(|e| &mut e.id));
        fix_ids(self.certifications.iter_mut().map(|e| &mut e.id));
        fix_ids(self.languages.iter_mut().map(|e| &mut e.id));
        fix_ids(self.custom_sections.iter_mut().map(|e| &mut e.id));

        for exp in &mut self.experience {
            if exp.current {
                exp.end_date.clear();
            }
        }
        self.personal_info.summary = clamp_summary(&self.personal_info.summary);
    }
}
