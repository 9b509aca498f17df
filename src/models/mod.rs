//! Domain models for survey taking.
//!
//! # Core Concepts
//!
//! - [`Survey`]: read-only catalog entry, an ordered list of [`Question`]s.
//! - [`Response`]: one answer, appended to the session in question order.
//! - [`SessionState`]: per-user progress, owned by the session store and passed
//!   by reference through each request.
//! - [`SurveySummary`]: questions paired with their responses once an attempt
//!   is complete.
//! - [`StartPage`], [`QuestionPage`]: bodies returned by the HTTP endpoints.

mod page;
mod response;
mod survey;

pub use page::*;
pub use response::*;
pub use survey::*;
