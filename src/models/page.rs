use serde::{Deserialize, Serialize};

use super::survey::{Question, Survey};

/// Body of the survey start endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum StartPage {
    Start { survey: Survey },
    /// The survey was completed recently and may not be retaken yet.
    AlreadyDone { survey_id: String },
}

/// Body of the question endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionPage {
    /// 0-based index of the question.
    pub question_num: usize,
    pub question: Question,
    /// Warnings queued by earlier requests, e.g. out-of-order access.
    pub messages: Vec<String>,
}
