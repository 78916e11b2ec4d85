// Organization flow: six structured posting fields → one generated job description.

pub mod handlers;
pub mod prompts;

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceRange {
    #[serde(rename = "1-3 years")]
    OneToThree,
    #[serde(rename = "3-5 years")]
    ThreeToFive,
    #[serde(rename = "5+ years")]
    FivePlus,
}

impl ExperienceRange {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceRange::OneToThree => "1-3 years",
            ExperienceRange::ThreeToFive => "3-5 years",
            ExperienceRange::FivePlus => "5+ years",
        }
    }
}

/// The job description generator form. Missing fields deserialize as blank so the
/// handler can answer with a single "fill in all fields" message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingForm {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub experience_range: Option<ExperienceRange>,
    #[serde(default)]
    pub job_location: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_summary: String,
}

// An unselected dropdown posts "" rather than omitting the field.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<ExperienceRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => ExperienceRange::deserialize(de::value::StrDeserializer::<D::Error>::new(
            label,
        ))
        .map(Some),
    }
}

impl JobPostingForm {
    pub fn is_complete(&self) -> bool {
        self.experience_range.is_some()
            && [
                &self.job_title,
                &self.required_skills,
                &self.job_location,
                &self.company_name,
                &self.job_summary,
            ]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}
