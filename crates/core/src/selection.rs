//! Picking a team's next goal among the locations it has not solved yet.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};
use crate::game::{Game, Location};
use crate::geometry::{Position, distance_m};
use crate::state::TeamState;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NextLocationMechanic {
    Random,
    Nearest,
    Furthest,
    /// Nearest after a correct answer, furthest after a wrong one, random otherwise
    #[default]
    NearestWhenCorrect,
    /// Furthest after a correct answer, nearest after a wrong one, random otherwise
    FurthestWhenCorrect,
}

enum Pick {
    Nearest,
    Furthest,
    Random,
}

impl NextLocationMechanic {
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    fn pick(self, previous_score: i32) -> Pick {
        use std::cmp::Ordering::*;

        match (self, previous_score.cmp(&0)) {
            (Self::Random, _) => Pick::Random,
            (Self::Nearest, _) => Pick::Nearest,
            (Self::Furthest, _) => Pick::Furthest,
            (Self::NearestWhenCorrect, Greater) | (Self::FurthestWhenCorrect, Less) => {
                Pick::Nearest
            }
            (Self::NearestWhenCorrect, Less) | (Self::FurthestWhenCorrect, Greater) => {
                Pick::Furthest
            }
            (_, Equal) => Pick::Random,
        }
    }
}

/// Name of the next goal for `team`, chosen from `current` by `mechanic`.
///
/// Ties go to the earliest catalog entry for nearest and the latest for furthest.
pub fn determine_next_location<R: Rng + ?Sized>(
    team: &TeamState,
    game: &Game,
    previous_score: i32,
    current: Position,
    mechanic: NextLocationMechanic,
    rng: &mut R,
) -> Result<String> {
    let mut unsolved: Vec<(f64, &Location)> = game
        .locations
        .iter()
        .filter(|l| !team.solved.contains_key(&l.name))
        .map(|l| (distance_m(l.position(), current), l))
        .collect();

    if unsolved.is_empty() {
        return Err(ScavengerError::NoUnsolvedLocations(team.name.to_string()));
    }

    // Stable, so equal distances keep catalog order
    unsolved.sort_by(|a, b| a.0.total_cmp(&b.0));

    let next = match mechanic.pick(previous_score) {
        Pick::Nearest => unsolved.first(),
        Pick::Furthest => unsolved.last(),
        Pick::Random => unsolved.choose(rng),
    }
    .map(|(_, l)| *l)
    .ok_or_else(|| ScavengerError::NoUnsolvedLocations(team.name.to_string()))?;

    tracing::debug!(
        team = %team.name,
        previous_score,
        %mechanic,
        next = %next.name,
        "selected next location"
    );

    Ok(next.name.clone())
}
