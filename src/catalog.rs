//! Read-only survey catalog.
//!
//! The catalog is loaded once at startup, either from the built-in JSON bundled
//! with the binary or from a file given on the command line.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::error::{SurveyError, SurveyResult};
use crate::models::{Survey, SurveyListing};

const BUILTIN: &str = include_str!("../catalog/surveys.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    surveys: Vec<Survey>,
}

/// Surveys keyed by identifier, kept in declaration order for the picker.
#[derive(Debug, Clone)]
pub struct Catalog {
    surveys: Vec<Survey>,
}

impl Catalog {
    pub fn new(surveys: Vec<Survey>) -> Result<Self> {
        validate(&surveys)?;
        Ok(Self { surveys })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN).context("Built-in catalog is invalid")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.surveys)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    pub fn get(&self, id: &str) -> SurveyResult<&Survey> {
        self.surveys
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SurveyError::NotFound(id.to_string()))
    }

    pub fn listings(&self) -> Vec<SurveyListing> {
        self.surveys.iter().map(Into::into).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Survey> {
        self.surveys.iter()
    }

    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }
}

fn validate(surveys: &[Survey]) -> Result<()> {
    let mut seen = HashSet::new();

    for survey in surveys {
        if survey.id.is_empty() {
            bail!("Survey '{}' has an empty id", survey.title);
        }
        if !survey
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("Survey id '{}' may only contain letters, digits, '-' and '_'", survey.id);
        }
        if !seen.insert(survey.id.as_str()) {
            bail!("Duplicate survey id '{}'", survey.id);
        }
        for (index, question) in survey.questions.iter().enumerate() {
            if question.choices.is_empty() {
                bail!("Survey '{}' question {} has no choices", survey.id, index);
            }
        }
    }

    Ok(())
}
