// Prompt template for the job description generator.

use crate::organization::JobPostingForm;

pub const JOB_DESCRIPTION_INSTRUCTIONS: &str = "\
Generate a detailed job description including:
- Responsibilities
- Qualifications
- Required Skills";

/// Lays the six posting fields out verbatim, followed by the generation instructions.
pub fn build_job_description_prompt(form: &JobPostingForm) -> String {
    let experience = form
        .experience_range
        .map(|r| r.as_str())
        .unwrap_or_default();

    format!(
        "Job Title: {}\n\
         Required Skills: {}\n\
         Experience Range: {}\n\
         Job Location: {}\n\
         Company Name: {}\n\
         Job Summary: {}\n\
         \n\
         {}",
        form.job_title,
        form.required_skills,
        experience,
        form.job_location,
        form.company_name,
        form.job_summary,
        JOB_DESCRIPTION_INSTRUCTIONS,
    )
}
