//! Request and response bodies of the scavenger hunt HTTP API.
//!
//! Player-facing types never carry answer scores for unanswered questions.

use serde::{Deserialize, Serialize};

use scavenger_core::game::{Answer, Location, QuestionType};
use scavenger_core::selection::NextLocationMechanic;
use scavenger_core::state::GameSettings;
use scavenger_core::stats::{PuzzleRow, TeamRow};

// ============================================================================
// Player
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub team_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub team_name: String,
    pub solved: usize,
    pub total_locations: usize,
    pub finished: bool,
    pub goal: Option<String>,
    pub beam_available: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Ask to be placed at the goal; ignored unless beaming is enabled
    #[serde(default)]
    pub beam: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub location: String,
    pub question_type: QuestionType,
    pub question: String,
    pub image_url: Option<String>,
    pub options: Vec<String>,
    pub dont_know: Option<String>,
}

impl QuestionView {
    /// Open questions do not list their accepted answers
    pub fn from_location(location: &Location, image_url: Option<String>) -> Self {
        let options = match location.question_type {
            QuestionType::MultipleChoice => {
                location.answer.iter().map(|o| o.option.clone()).collect()
            }
            QuestionType::OpenQuestion => Vec::new(),
        };

        Self {
            location: location.name.clone(),
            question_type: location.question_type,
            question: location.question.clone(),
            image_url,
            options,
            dont_know: location.dont_know_answer.as_ref().map(|o| o.option.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PositionResponse {
    Finished,
    Tracking {
        latitude: f64,
        longitude: f64,
        beamed: bool,
        goal: String,
        distance_m: f64,
        bearing_deg: f64,
        radius: u32,
        /// Present only within `radius` of the goal
        question: Option<QuestionView>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub location: String,
    pub answer: Answer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub location: String,
    pub score: i32,
    pub next_goal: Option<String>,
    pub finished: bool,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub registered_teams: usize,
    pub teams: Vec<TeamRow>,
    pub puzzles: Vec<PuzzleRow>,
    pub settings: GameSettings,
    pub mechanics: Vec<NextLocationMechanic>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub button_beam_to_location_visible: Option<bool>,
    pub next_location_mechanic: Option<NextLocationMechanic>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub deleted_teams: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOption {
    pub option: String,
    pub score: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminQuestion {
    /// Wrapped index into the catalog; use it for previous/next
    pub index: usize,
    pub total: usize,
    pub location: String,
    pub question_type: QuestionType,
    pub question: String,
    pub image_url: Option<String>,
    pub options: Vec<AdminOption>,
    pub dont_know: Option<AdminOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
