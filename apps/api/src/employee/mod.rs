// Employee flow: résumé upload + job description → one of two canned model checks.

pub mod handlers;
pub mod prompts;

use crate::employee::prompts::{PERCENTAGE_MATCH_PROMPT, REVIEW_PROMPT};

/// The two buttons on the résumé checker form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeCheck {
    /// "Tell me about the resume"
    Review,
    PercentageMatch,
}

impl ResumeCheck {
    pub fn prompt(self) -> &'static str {
        match self {
            ResumeCheck::Review => REVIEW_PROMPT,
            ResumeCheck::PercentageMatch => PERCENTAGE_MATCH_PROMPT,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResumeCheck::Review => "Gemini Evaluation",
            ResumeCheck::PercentageMatch => "ATS Match Result",
        }
    }
}
