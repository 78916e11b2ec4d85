use serde::Serialize;

/// What a form submission renders: a heading and the model's text, unmodified.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOutput {
    pub title: String,
    pub text: String,
}

impl ModelOutput {
    pub fn new(title: &str, text: String) -> Self {
        Self {
            title: title.to_string(),
            text,
        }
    }
}
