//! Question progression.
//!
//! Each attempt moves through `NoSurvey → Started → Answering(k) → Completed`.
//! The only question a user may view is the next unanswered one; any other
//! index is corrected with a redirect and a flashed warning. Nothing here is
//! fatal: abnormal states come back as [`SurveyError`]s whose
//! [`directive`](SurveyError::directive) says where to send the user.

use chrono::Duration;

use crate::catalog::Catalog;
use crate::completion::CompletionMarkers;
use crate::error::{SurveyError, SurveyResult};
use crate::models::*;

/// Where an attempt stands, derived from session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoSurvey,
    Started,
    Answering(usize),
    Completed,
}

/// What the caller should do next: render a question or redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'c> {
    ShowQuestion { index: usize, question: &'c Question },
    RedirectToQuestion(usize),
    RedirectToCompletion,
    RedirectToPicker,
}

/// Result of picking a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome<'c> {
    Started(&'c Survey),
    /// A live completion marker exists; the start page is replaced by "already done".
    AlreadyCompleted(&'c Survey),
}

impl SurveyError {
    /// The redirect that recovers from this error, if it is recoverable.
    pub fn directive(&self) -> Option<Directive<'static>> {
        match self {
            Self::SessionExpired => Some(Directive::RedirectToPicker),
            Self::Incomplete { answered, .. } => Some(Directive::RedirectToQuestion(*answered)),
            Self::NotFound(_) | Self::MissingAnswer => None,
        }
    }
}

pub struct Progression<'c> {
    catalog: &'c Catalog,
}

impl<'c> Progression<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn phase(&self, state: &SessionState) -> Phase {
        let Some(survey) = state
            .current_survey_id
            .as_deref()
            .and_then(|id| self.catalog.get(id).ok())
        else {
            return Phase::NoSurvey;
        };

        match state.answered() {
            None => Phase::Started,
            Some(answered) if answered >= survey.len() => Phase::Completed,
            Some(answered) => Phase::Answering(answered),
        }
    }

    /// Select a survey. Responses are left alone; clearing them is
    /// [`begin_attempt`](Self::begin_attempt)'s job.
    pub fn start_survey(
        &self,
        state: &mut SessionState,
        markers: &CompletionMarkers,
        survey_id: &str,
    ) -> SurveyResult<StartOutcome<'c>> {
        let survey = self.catalog.get(survey_id)?;
        state.current_survey_id = Some(survey.id.clone());

        if markers.is_completed(&survey.id) {
            tracing::warn!("Survey {} already completed, blocking retake", survey.id);
            return Ok(StartOutcome::AlreadyCompleted(survey));
        }

        tracing::info!("Starting survey {}", survey.id);
        Ok(StartOutcome::Started(survey))
    }

    /// Discard any partial progress and point at the first question.
    ///
    /// Completion markers are not consulted here; the retake guard lives in
    /// [`start_survey`](Self::start_survey) only.
    pub fn begin_attempt(&self, state: &mut SessionState) -> Directive<'c> {
        state.responses = Some(Vec::new());
        tracing::info!(
            "Begin attempt on {}",
            state.current_survey_id.as_deref().unwrap_or("<none>")
        );
        Directive::RedirectToQuestion(0)
    }

    pub fn show_question(
        &self,
        state: &mut SessionState,
        requested: usize,
    ) -> SurveyResult<Directive<'c>> {
        let (survey, answered) = self.progress(state)?;

        if answered == survey.len() {
            return Ok(Directive::RedirectToCompletion);
        }

        if requested != answered {
            tracing::warn!("Invalid question id: {}", requested);
            state.flash(format!("Invalid question id: {requested}."));
            return Ok(Directive::RedirectToQuestion(answered));
        }

        Ok(Directive::ShowQuestion {
            index: answered,
            question: &survey.questions[answered],
        })
    }

    /// Record the answer to the next question.
    ///
    /// The choice is not checked against the question's options.
    pub fn submit_answer(
        &self,
        state: &mut SessionState,
        choice: &str,
        text: Option<&str>,
    ) -> SurveyResult<Directive<'c>> {
        if choice.is_empty() {
            return Err(SurveyError::MissingAnswer);
        }

        let (survey, answered) = self.progress(state)?;
        if answered == survey.len() {
            tracing::debug!("Ignoring answer to finished survey {}", survey.id);
            return Ok(Directive::RedirectToCompletion);
        }

        let responses = state.responses.get_or_insert_with(Vec::new);
        responses.push(Response {
            choice: choice.to_string(),
            text: text.unwrap_or_default().to_string(),
        });
        let answered = responses.len();
        tracing::debug!("Survey {} answered {}/{}", survey.id, answered, survey.len());

        if answered == survey.len() {
            Ok(Directive::RedirectToCompletion)
        } else {
            Ok(Directive::RedirectToQuestion(answered))
        }
    }

    /// Pair every question with its response and set the completion marker.
    ///
    /// Calling this again after completion re-renders the summary and refreshes
    /// the marker.
    pub fn complete(
        &self,
        state: &SessionState,
        markers: &mut CompletionMarkers,
        ttl: Duration,
    ) -> SurveyResult<SurveySummary> {
        let (survey, answered) = self.progress(state)?;
        if answered < survey.len() {
            return Err(SurveyError::Incomplete {
                answered,
                total: survey.len(),
            });
        }

        let responses = survey
            .questions
            .iter()
            .zip(state.responses.iter().flatten())
            .map(|(question, response)| AnsweredQuestion {
                question: question.clone(),
                choice: response.choice.clone(),
                text: response.text.clone(),
            })
            .collect();

        markers.mark_complete(&survey.id, ttl);
        tracing::info!("Survey {} completed", survey.id);

        Ok(SurveySummary {
            survey_id: survey.id.clone(),
            title: survey.title.clone(),
            responses,
        })
    }

    /// Current survey and number of answers, or `SessionExpired` when either is
    /// missing or the answers cannot belong to the current survey.
    fn progress(&self, state: &SessionState) -> SurveyResult<(&'c Survey, usize)> {
        let survey_id = state
            .current_survey_id
            .as_deref()
            .ok_or(SurveyError::SessionExpired)?;
        let survey = self.catalog.get(survey_id)?;
        let answered = state.answered().ok_or(SurveyError::SessionExpired)?;

        if answered > survey.len() {
            tracing::warn!(
                "Session holds {} answers for {}-question survey {}",
                answered,
                survey.len(),
                survey.id
            );
            return Err(SurveyError::SessionExpired);
        }

        Ok((survey, answered))
    }
}
