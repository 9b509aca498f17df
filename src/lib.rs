//! Session-driven survey taking.
//!
//! A user picks a survey from the [`catalog`], answers its questions strictly in
//! order, and receives a summary. [`progress`] holds the state machine,
//! [`completion`] the markers that block retakes, and [`api`] the HTTP surface.

pub mod api;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod session;
