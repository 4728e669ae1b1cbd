//! Structured edits to the resume record, one operation per visual-form action.

use serde::Deserialize;
use thiserror::Error;

use crate::models::resume::{
    clamp_summary, new_id, CertificationItem, CustomSection, EducationItem, ExperienceItem,
    LanguageItem, ProfileLink, Proficiency, ProjectItem, ResumeRecord, SkillCategory,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no {section} entry with id '{id}'")]
    NotFound { section: &'static str, id: String },

    #[error("cannot move experience entry {from} to {to}: only {len} entries")]
    OutOfRange { from: usize, to: usize, len: usize },
}

/// One edit, tagged by `op` on the wire, e.g. `{"op":"deleteProject","id":"..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RecordEdit {
    UpdatePersonalInfo { info: PersonalInfoPatch },
    SetProfileImage { image: String },
    ClearProfileImage,

    AddExperience { item: ExperienceItem },
    UpdateExperience { id: String, patch: ExperiencePatch },
    DeleteExperience { id: String },
    ReorderExperience { from: usize, to: usize },

    AddEducation { item: EducationItem },
    UpdateEducation { id: String, patch: EducationPatch },
    DeleteEducation { id: String },

    AddSkillCategory { item: SkillCategory },
    UpdateSkillCategory { id: String, patch: SkillCategoryPatch },
    DeleteSkillCategory { id: String },

    AddProject { item: ProjectItem },
    UpdateProject { id: String, patch: ProjectPatch },
    DeleteProject { id: String },

    AddCertification { item: CertificationItem },
    UpdateCertification { id: String, patch: CertificationPatch },
    DeleteCertification { id: String },

    AddLanguage { item: LanguageItem },
    UpdateLanguage { id: String, patch: LanguagePatch },
    DeleteLanguage { id: String },

    AddCustomSection { item: CustomSection },
    UpdateCustomSection { id: String, patch: CustomSectionPatch },
    DeleteCustomSection { id: String },
}

impl RecordEdit {
    /// Applies the edit in place. On error the record is left unchanged.
    pub fn apply(self, record: &mut ResumeRecord) -> Result<(), EditError> {
        match self {
            RecordEdit::UpdatePersonalInfo { info } => info.apply_to(record),
            RecordEdit::SetProfileImage { image } => {
                let image = image.trim();
                record.personal_info.profile_image =
                    (!image.is_empty()).then(|| image.to_string());
            }
            RecordEdit::ClearProfileImage => record.personal_info.profile_image = None,

            RecordEdit::AddExperience { mut item } => {
                if item.current {
                    item.end_date.clear();
                }
                add(&mut record.experience, item);
            }
            RecordEdit::UpdateExperience { id, patch } => {
                patch.apply_to(find(&mut record.experience, "experience", &id)?)
            }
            RecordEdit::DeleteExperience { id } => delete(&mut record.experience, "experience", &id)?,
            RecordEdit::ReorderExperience { from, to } => {
                let len = record.experience.len();
                if from >= len || to >= len {
                    return Err(EditError::OutOfRange { from, to, len });
                }
                let moved = record.experience.remove(from);
                record.experience.insert(to, moved);
            }

            RecordEdit::AddEducation { item } => add(&mut record.education, item),
            RecordEdit::UpdateEducation { id, patch } => {
                patch.apply_to(find(&mut record.education, "education", &id)?)
            }
            RecordEdit::DeleteEducation { id } => delete(&mut record.education, "education", &id)?,

            RecordEdit::AddSkillCategory { item } => add(&mut record.skills, item),
            RecordEdit::UpdateSkillCategory { id, patch } => {
                patch.apply_to(find(&mut record.skills, "skill category", &id)?)
            }
            RecordEdit::DeleteSkillCategory { id } => delete(&mut record.skills, "skill category", &id)?,

            RecordEdit::AddProject { item } => add(&mut record.projects, item),
            RecordEdit::UpdateProject { id, patch } => {
                patch.apply_to(find(&mut record.projects, "project", &id)?)
            }
            RecordEdit::DeleteProject { id } => delete(&mut record.projects, "project", &id)?,

            RecordEdit::AddCertification { item } => add(&mut record.certifications, item),
            RecordEdit::UpdateCertification { id, patch } => {
                patch.apply_to(find(&mut record.certifications, "certification", &id)?)
            }
            RecordEdit::DeleteCertification { id } => {
                delete(&mut record.certifications, "certification", &id)?
            }

            RecordEdit::AddLanguage { item } => add(&mut record.languages, item),
            RecordEdit::UpdateLanguage { id, patch } => {
                patch.apply_to(find(&mut record.languages, "language", &id)?)
            }
            RecordEdit::DeleteLanguage { id } => delete(&mut record.languages, "language", &id)?,

            RecordEdit::AddCustomSection { item } => add(&mut record.custom_sections, item),
            RecordEdit::UpdateCustomSection { id, patch } => {
                patch.apply_to(find(&mut record.custom_sections, "custom section", &id)?)
            }
            RecordEdit::DeleteCustomSection { id } => {
                delete(&mut record.custom_sections, "custom section", &id)?
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List plumbing
// ────────────────────────────────────────────────────────────────────────────

/// A list entry with a stable id.
trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

identified!(
    ExperienceItem,
    EducationItem,
    SkillCategory,
    ProjectItem,
    CertificationItem,
    LanguageItem,
    CustomSection,
);

/// Appends `item` under a fresh id; any id sent by the client is ignored.
fn add<T: Identified>(items: &mut Vec<T>, mut item: T) {
    item.set_id(new_id());
    items.push(item);
}

fn find<'a, T: Identified>(
    items: &'a mut [T],
    section: &'static str,
    id: &str,
) -> Result<&'a mut T, EditError> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or_else(|| EditError::NotFound {
            section,
            id: id.to_string(),
        })
}

fn delete<T: Identified>(items: &mut Vec<T>, section: &'static str, id: &str) -> Result<(), EditError> {
    let before = items.len();
    items.retain(|item| item.id() != id);
    if items.len() == before {
        return Err(EditError::NotFound {
            section,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub profiles: Option<Vec<ProfileLink>>,
}

impl PersonalInfoPatch {
    fn apply_to(self, record: &mut ResumeRecord) {
        let info = &mut record.personal_info;
        set(&mut info.name, self.name);
        set(&mut info.email, self.email);
        set(&mut info.phone, self.phone);
        set(&mut info.location, self.location);
        set(&mut info.summary, self.summary.map(|s| clamp_summary(&s)));
        set(&mut info.profiles, self.profiles);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePatch {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub bullet_points: Option<Vec<String>>,
}

impl ExperiencePatch {
    fn apply_to(self, item: &mut ExperienceItem) {
        let ends = self.end_date.as_deref().is_some_and(|end| !end.trim().is_empty());
        set(&mut item.job_title, self.job_title);
        set(&mut item.company, self.company);
        set(&mut item.location, self.location);
        set(&mut item.start_date, self.start_date);
        set(&mut item.end_date, self.end_date);
        set(&mut item.bullet_points, self.bullet_points);
        match self.current {
            Some(current) => item.current = current,
            None if ends => item.current = false,
            None => {}
        }
        if item.current {
            item.end_date.clear();
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub graduation_date: Option<String>,
    /// `Some(None)` is not expressible in JSON here; an empty string clears the GPA.
    pub gpa: Option<String>,
    pub bullet_points: Option<Vec<String>>,
}

impl EducationPatch {
    fn apply_to(self, item: &mut EducationItem) {
        set(&mut item.degree, self.degree);
        set(&mut item.institution, self.institution);
        set(&mut item.location, self.location);
        set(&mut item.graduation_date, self.graduation_date);
        set(&mut item.bullet_points, self.bullet_points);
        if let Some(gpa) = self.gpa {
            item.gpa = (!gpa.trim().is_empty()).then_some(gpa);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategoryPatch {
    pub category: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl SkillCategoryPatch {
    fn apply_to(self, item: &mut SkillCategory) {
        set(&mut item.category, self.category);
        set(&mut item.skills, self.skills);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    /// An empty string removes the link.
    pub link: Option<String>,
    pub bullet_points: Option<Vec<String>>,
}

impl ProjectPatch {
    fn apply_to(self, item: &mut ProjectItem) {
        set(&mut item.name, self.name);
        set(&mut item.description, self.description);
        set(&mut item.technologies, self.technologies);
        set(&mut item.bullet_points, self.bullet_points);
        if let Some(link) = self.link {
            item.link = (!link.trim().is_empty()).then_some(link);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationPatch {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    /// An empty string removes the link.
    pub link: Option<String>,
}

impl CertificationPatch {
    fn apply_to(self, item: &mut CertificationItem) {
        set(&mut item.name, self.name);
        set(&mut item.issuer, self.issuer);
        set(&mut item.date, self.date);
        if let Some(link) = self.link {
            item.link = (!link.trim().is_empty()).then_some(link);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguagePatch {
    pub language: Option<String>,
    pub proficiency: Option<Proficiency>,
}

impl LanguagePatch {
    fn apply_to(self, item: &mut LanguageItem) {
        set(&mut item.language, self.language);
        set(&mut item.proficiency, self.proficiency);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSectionPatch {
    pub title: Option<String>,
    pub items: Option<Vec<String>>,
}

impl CustomSectionPatch {
    fn apply_to(self, item: &mut CustomSection) {
        set(&mut item.title, self.title);
        set(&mut item.items, self.items);
    }
}
