use serde::{Deserialize, Serialize};

use super::survey::Question;

/// Most messages a session holds before the oldest is dropped.
pub const MAX_MESSAGES: usize = 5;

/// One answered question.
///
/// Responses are appended in order and never mutated; the position of a
/// response in [`SessionState::responses`] is the index of the question it answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub choice: String,
    #[serde(default)]
    pub text: String,
}

/// Per-user progress through a survey.
///
/// `responses` stays `None` until an attempt is begun. That distinction matters:
/// asking for a question without a begun attempt means the session expired or
/// the user skipped the start page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub current_survey_id: Option<String>,
    pub responses: Option<Vec<Response>>,
    /// One-shot messages shown on the next rendered question page.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl SessionState {
    pub fn answered(&self) -> Option<usize> {
        self.responses.as_ref().map(Vec::len)
    }

    /// Queue a message for the next rendered page. Repeats are dropped and
    /// only the newest [`MAX_MESSAGES`] are kept.
    pub fn flash(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.messages.contains(&message) {
            return;
        }
        if self.messages.len() >= MAX_MESSAGES {
            self.messages.remove(0);
        }
        self.messages.push(message);
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

/// A question paired with the response given to it, as shown on the summary page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: Question,
    pub choice: String,
    pub text: String,
}

/// Summary produced when an attempt is completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveySummary {
    pub survey_id: String,
    pub title: String,
    pub responses: Vec<AnsweredQuestion>,
}
