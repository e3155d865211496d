use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::identifiers::TeamName;

/// Progress of a single team, stored as one YAML file per team
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    pub name: TeamName,
    pub goal_location_name: String,
    /// Score per answered location, correct or not
    #[serde(default)]
    pub solved: BTreeMap<String, i32>,
}

impl TeamState {
    pub fn new(name: TeamName, goal_location_name: impl Into<String>) -> Self {
        Self {
            name,
            goal_location_name: goal_location_name.into(),
            solved: BTreeMap::new(),
        }
    }

    pub fn total_score(&self) -> i32 {
        self.solved.values().sum()
    }

    pub fn is_finished(&self, game: &Game) -> bool {
        game.locations
            .iter()
            .all(|l| self.solved.contains_key(&l.name))
    }

    pub fn score_for(&self, location_name: &str) -> Option<i32> {
        self.solved.get(location_name).copied()
    }
}
