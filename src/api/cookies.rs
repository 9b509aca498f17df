//! Cookie plumbing between HTTP requests and the session store.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use uuid::Uuid;

use super::AppState;
use crate::completion::CompletionMarkers;
use crate::models::SessionState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "survey_session";

const COMPLETED_PREFIX: &str = "completed_";

pub fn completion_cookie_name(survey_id: &str) -> String {
    format!("{COMPLETED_PREFIX}{survey_id}")
}

/// The caller's session state and completion markers for one request.
///
/// Handlers mutate `state` and `markers`, then call [`finish`](Self::finish) to
/// persist the session and attach any new cookies to the response.
pub struct UserSession {
    token: Uuid,
    fresh: bool,
    pub state: SessionState,
    pub markers: CompletionMarkers,
    jar: CookieJar,
}

impl UserSession {
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// Queue the `completed_{id}` cookie that blocks retakes for `ttl`.
    pub fn set_completion_cookie(&mut self, survey_id: &str, ttl: Duration) {
        let cookie = Cookie::build((completion_cookie_name(survey_id), "yes"))
            .path("/")
            .max_age(time::Duration::seconds(ttl.num_seconds()));
        self.jar = self.jar.clone().add(cookie);
    }

    pub fn finish(self, app: &AppState, response: impl IntoResponse) -> Response {
        app.sessions.save(self.token, self.state);

        let mut jar = self.jar;
        if self.fresh {
            jar = jar.add(
                Cookie::build((SESSION_COOKIE, self.token.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            );
        }
        (jar, response).into_response()
    }
}

impl FromRequestParts<AppState> for UserSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let mut markers = CompletionMarkers::new();

        // The browser drops expired cookies, so any marker cookie sent is live.
        for cookie in jar.iter() {
            if let Some(survey_id) = cookie.name().strip_prefix(COMPLETED_PREFIX) {
                if !cookie.value().is_empty() {
                    markers.mark_complete(survey_id, app.completion_ttl);
                }
            }
        }

        let existing = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .and_then(|t| app.sessions.load(t).map(|state| (t, state)));
        let (token, state, fresh) = match existing {
            Some((token, state)) => (token, state, false),
            None => (Uuid::new_v4(), SessionState::default(), true),
        };

        Ok(Self {
            token,
            fresh,
            state,
            markers,
            jar,
        })
    }
}
