use serde::{Deserialize, Serialize};

/// A named, ordered list of questions.
///
/// Surveys are immutable once loaded into the [`Catalog`](crate::catalog::Catalog).
/// The `id` doubles as the suffix of the completion cookie, so it is restricted
/// to ASCII alphanumerics, `-` and `_` at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub title: String,
    /// Shown on the start page before the first question.
    #[serde(default)]
    pub instructions: String,
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A single prompt with its selectable choices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    #[serde(default = "default_choices")]
    pub choices: Vec<String>,
    /// Whether the respondent may add free text alongside the choice.
    #[serde(default)]
    pub allow_text: bool,
}

fn default_choices() -> Vec<String> {
    vec!["Yes".to_string(), "No".to_string()]
}

/// Entry in the survey picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveyListing {
    pub id: String,
    pub title: String,
    pub instructions: String,
    pub question_count: usize,
}

impl From<&Survey> for SurveyListing {
    fn from(survey: &Survey) -> Self {
        Self {
            id: survey.id.clone(),
            title: survey.title.clone(),
            instructions: survey.instructions.clone(),
            question_count: survey.len(),
        }
    }
}
