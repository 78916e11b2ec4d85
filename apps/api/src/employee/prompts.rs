// Prompt templates for the employee résumé checks.

pub const REVIEW_PROMPT: &str = "\
You are an experienced Technical Human Resource Manager. Review the resume against the job description.
Highlight strengths and weaknesses and assess alignment with the role.";

pub const PERCENTAGE_MATCH_PROMPT: &str = "\
You are an ATS (Applicant Tracking System) expert. Evaluate the resume vs the job description.
Give a percentage match, list missing keywords, and share your final thoughts.";
