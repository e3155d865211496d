//! The static game catalog: named locations with their questions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};
use crate::geometry::Position;

pub mod answer;

pub use answer::Answer;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub option: String,
    pub score: i32,
}

impl AnswerOption {
    pub fn new(option: impl Into<String>, score: i32) -> Self {
        Self {
            option: option.into(),
            score,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum QuestionType {
    #[serde(rename = "multiple choice")]
    #[strum(serialize = "multiple choice")]
    MultipleChoice,

    #[serde(rename = "open question")]
    #[strum(serialize = "open question")]
    OpenQuestion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub question_type: QuestionType,
    pub question: String,
    /// Image file, relative to the directory holding the game file
    #[serde(default)]
    pub image: String,
    pub answer: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dont_know_answer: Option<AnswerOption>,
}

impl Location {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub locations: Vec<Location>,
    /// Meters from the goal within which its question is revealed
    pub radius: u32,

    #[serde(skip)]
    file_path: PathBuf,
}

impl Game {
    pub fn new(locations: Vec<Location>, radius: u32) -> Self {
        Self {
            locations,
            radius,
            file_path: PathBuf::new(),
        }
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content =
            std::fs::read_to_string(path).map_err(|e| ScavengerError::io(path, e))?;
        let mut game: Game =
            serde_yaml::from_str(&content).map_err(|e| ScavengerError::yaml(path, e))?;

        game.file_path = path.to_path_buf();
        game.validate()?;

        tracing::info!(
            path = %path.display(),
            locations = game.locations.len(),
            radius = game.radius,
            "loaded game"
        );

        Ok(game)
    }

    pub fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(ScavengerError::InvalidGame(
                "the game has no locations".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.name.as_str()) {
                return Err(ScavengerError::InvalidGame(format!(
                    "duplicate location name '{}'",
                    location.name
                )));
            }

            if location.answer.is_empty() {
                return Err(ScavengerError::InvalidGame(format!(
                    "location '{}' has no answer options",
                    location.name
                )));
            }

            if !location.position().is_valid() {
                return Err(ScavengerError::InvalidGame(format!(
                    "location '{}' has coordinates out of range ({}, {})",
                    location.name, location.latitude, location.longitude
                )));
            }
        }

        Ok(())
    }

    pub fn location_by_name(&self, name: &str) -> Result<&Location> {
        self.locations
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| ScavengerError::UnknownLocation(name.to_string()))
    }

    /// Location at `index`, wrapping around in both directions
    pub fn location_at(&self, index: i64) -> Option<(usize, &Location)> {
        if self.locations.is_empty() {
            return None;
        }

        let wrapped = index.rem_euclid(self.locations.len() as i64) as usize;
        Some((wrapped, &self.locations[wrapped]))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Directory that question images are resolved against
    pub fn asset_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new(""))
    }
}
