use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use super::{AppState, UserSession};
use crate::error::SurveyError;
use crate::models::*;
use crate::progress::{Directive, Progression, StartOutcome};

// ============================================================
// Directives and Errors
// ============================================================

/// Turn a controller directive into a rendered page or a redirect.
///
/// Rendering a question drains the session's queued messages into the page.
fn respond(directive: Directive<'_>, state: &mut SessionState) -> Response {
    match directive {
        Directive::ShowQuestion { index, question } => Json(QuestionPage {
            question_num: index,
            question: question.clone(),
            messages: state.take_messages(),
        })
        .into_response(),
        Directive::RedirectToQuestion(index) => {
            Redirect::to(&format!("/question/{}", index)).into_response()
        }
        Directive::RedirectToCompletion => Redirect::to("/complete").into_response(),
        Directive::RedirectToPicker => Redirect::to("/").into_response(),
    }
}

/// Recoverable errors become redirects; the rest are returned to the client.
fn survey_error(err: SurveyError, state: &mut SessionState) -> Response {
    if let Some(directive) = err.directive() {
        tracing::warn!("Redirecting after: {}", err);
        return respond(directive, state);
    }

    let status = match err {
        SurveyError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Request rejected: {}", err);
    (status, err.to_string()).into_response()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Survey Picker
// ============================================================

pub async fn pick_survey(State(app): State<AppState>) -> Json<Vec<SurveyListing>> {
    Json(app.catalog.listings())
}

// ============================================================
// Attempt Flow
// ============================================================

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    pub survey_code: String,
}

pub async fn show_survey_start(
    State(app): State<AppState>,
    mut session: UserSession,
    Query(query): Query<StartQuery>,
) -> Response {
    let progression = Progression::new(&app.catalog);

    let response = match progression.start_survey(
        &mut session.state,
        &session.markers,
        &query.survey_code,
    ) {
        Ok(StartOutcome::Started(survey)) => Json(StartPage::Start {
            survey: survey.clone(),
        })
        .into_response(),
        Ok(StartOutcome::AlreadyCompleted(survey)) => Json(StartPage::AlreadyDone {
            survey_id: survey.id.clone(),
        })
        .into_response(),
        Err(err) => survey_error(err, &mut session.state),
    };

    session.finish(&app, response)
}

pub async fn survey_begin(State(app): State<AppState>, mut session: UserSession) -> Response {
    let progression = Progression::new(&app.catalog);
    let directive = progression.begin_attempt(&mut session.state);
    let response = respond(directive, &mut session.state);
    session.finish(&app, response)
}

pub async fn show_question(
    State(app): State<AppState>,
    mut session: UserSession,
    Path(qid): Path<usize>,
) -> Response {
    let progression = Progression::new(&app.catalog);
    tracing::debug!(
        "Session {} requests question {} in {:?}",
        session.token(),
        qid,
        progression.phase(&session.state)
    );

    let response = match progression.show_question(&mut session.state, qid) {
        Ok(directive) => respond(directive, &mut session.state),
        Err(err) => survey_error(err, &mut session.state),
    };

    session.finish(&app, response)
}

#[derive(Debug, Deserialize)]
pub struct AnswerQuery {
    pub answer: String,
    pub text: Option<String>,
}

pub async fn handle_answer(
    State(app): State<AppState>,
    mut session: UserSession,
    Query(query): Query<AnswerQuery>,
) -> Response {
    let progression = Progression::new(&app.catalog);

    let response = match progression.submit_answer(
        &mut session.state,
        &query.answer,
        query.text.as_deref(),
    ) {
        Ok(directive) => respond(directive, &mut session.state),
        Err(err) => survey_error(err, &mut session.state),
    };

    session.finish(&app, response)
}

pub async fn say_thanks(State(app): State<AppState>, mut session: UserSession) -> Response {
    let progression = Progression::new(&app.catalog);

    let response = match progression.complete(
        &session.state,
        &mut session.markers,
        app.completion_ttl,
    ) {
        Ok(summary) => {
            session.set_completion_cookie(&summary.survey_id, app.completion_ttl);
            Json(summary).into_response()
        }
        Err(err) => survey_error(err, &mut session.state),
    };

    session.finish(&app, response)
}
