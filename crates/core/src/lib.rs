//! # scavenger-core
//!
//! Game logic for a location-based scavenger hunt: teams walk to a goal,
//! unlock its question within a radius, and get routed to their next goal
//! depending on how well they answered.
//!
//! ## Example
//!
//! ```
//! use scavenger_core::prelude::*;
//!
//! let here = Position::new(52.2215, 6.8937);
//! let there = Position::new(51.9851, 5.8987);
//!
//! assert!(distance_m(here, there) > 70_000.0);
//! assert!((bearing_deg(here, there) - 249.2).abs() < 1.0);
//! ```

pub mod error;
pub mod game;
pub mod geometry;
pub mod identifiers;
pub mod location_log;
pub mod play;
pub mod selection;
pub mod state;
pub mod stats;

pub mod prelude {
    pub use crate::error::{Result, ScavengerError};
    pub use crate::game::{Answer, AnswerOption, Game, Location, QuestionType};
    pub use crate::geometry::{Position, bearing_deg, distance_m};
    pub use crate::identifiers::TeamName;
    pub use crate::location_log::{LocationLog, LogEntry};
    pub use crate::play::{AnswerOutcome, PositionReport, Scavenger, TeamStatus, Tracking};
    pub use crate::selection::{NextLocationMechanic, determine_next_location};
    pub use crate::state::{GameSettings, StateStore, TeamState};
}

pub use prelude::*;
