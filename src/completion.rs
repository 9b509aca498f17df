//! Completion markers that block retaking a finished survey.
//!
//! A marker is a survey id with an expiry instant. Expiry is stateless: a marker
//! past its expiry reads as absent and is never explicitly removed. The HTTP layer
//! rebuilds markers from `completed_{id}` cookies on each request and writes new
//! ones back as cookies with a matching `Max-Age`.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Default marker lifetime, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 60;

#[derive(Debug, Clone, Default)]
pub struct CompletionMarkers {
    expires: HashMap<String, DateTime<Utc>>,
}

impl CompletionMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or refresh the marker for `survey_id`.
    pub fn mark_complete(&mut self, survey_id: &str, ttl: Duration) {
        self.mark_complete_at(survey_id, ttl, Utc::now());
    }

    pub fn mark_complete_at(&mut self, survey_id: &str, ttl: Duration, now: DateTime<Utc>) {
        let expires = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.expires.insert(survey_id.to_string(), expires);
    }

    pub fn is_completed(&self, survey_id: &str) -> bool {
        self.is_completed_at(survey_id, Utc::now())
    }

    pub fn is_completed_at(&self, survey_id: &str, now: DateTime<Utc>) -> bool {
        self.expires
            .get(survey_id)
            .is_some_and(|expires| *expires > now)
    }

    /// Number of stored markers, live or expired.
    pub fn len(&self) -> usize {
        self.expires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expires.is_empty()
    }
}
