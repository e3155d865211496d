//! A team's turn: report where you are, get routed, answer the question.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::error::{Result, ScavengerError};
use crate::game::{Answer, Game, Location};
use crate::geometry::{Position, bearing_deg, distance_m};
use crate::identifiers::TeamName;
use crate::location_log::{LocationLog, LogEntry, now_timestamp};
use crate::selection::determine_next_location;
use crate::state::{StateStore, TeamState};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStatus {
    pub team: TeamState,
    pub total_locations: usize,
    pub finished: bool,
    /// `None` once every location is solved
    pub goal: Option<Location>,
    pub beam_available: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tracking {
    pub position: Position,
    pub beamed: bool,
    pub goal: String,
    pub distance_m: f64,
    pub bearing_deg: f64,
    pub radius: u32,
    pub question_visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PositionReport {
    Finished,
    Tracking(Tracking),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub location: String,
    pub score: i32,
    pub next_goal: Option<String>,
    pub finished: bool,
}

pub struct Scavenger {
    game: Game,
    store: StateStore,
    log: LocationLog,
    rng: StdRng,
    /// Goal whose question each team currently has in range
    revealed: HashMap<TeamName, String>,
}

impl Scavenger {
    pub fn new(game: Game, store: StateStore, log: LocationLog) -> Self {
        Self::with_rng(game, store, log, StdRng::from_os_rng())
    }

    pub fn with_rng(game: Game, store: StateStore, log: LocationLog, rng: StdRng) -> Self {
        Self {
            game,
            store,
            log,
            rng,
            revealed: HashMap::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn log(&self) -> &LocationLog {
        &self.log
    }

    /// Delete every team and the location log; settings survive
    pub fn reset(&mut self) -> Result<usize> {
        let deleted = self.store.reset()?;
        self.log.clear()?;
        self.revealed.clear();
        Ok(deleted)
    }

    /// Validate the name and register the team on first sight
    pub fn login(&mut self, team_name: &str) -> Result<TeamStatus> {
        let name = TeamName::parse(team_name)?;
        let team = self.store.get_or_create_team(&name, &self.game, &mut self.rng)?;
        self.status_of(team)
    }

    pub fn status(&self, name: &TeamName) -> Result<TeamStatus> {
        let team = self.load(name)?;
        self.status_of(team)
    }

    fn load(&self, name: &TeamName) -> Result<TeamState> {
        self.store
            .load_team(name)?
            .ok_or_else(|| ScavengerError::UnknownTeam(name.to_string()))
    }

    fn status_of(&self, team: TeamState) -> Result<TeamStatus> {
        let finished = team.is_finished(&self.game);
        let goal = if finished {
            None
        } else {
            Some(self.game.location_by_name(&team.goal_location_name)?.clone())
        };

        Ok(TeamStatus {
            team,
            total_locations: self.game.locations.len(),
            finished,
            goal,
            beam_available: self.store.settings().button_beam_to_location_visible,
        })
    }

    /// Log the position and measure it against the goal.
    ///
    /// `beam` is honoured only while beaming is enabled in the settings.
    pub fn report_position(
        &mut self,
        name: &TeamName,
        position: Position,
        beam: bool,
    ) -> Result<PositionReport> {
        let team = self.load(name)?;

        if team.is_finished(&self.game) {
            self.revealed.remove(name);
            return Ok(PositionReport::Finished);
        }

        let goal = self.game.location_by_name(&team.goal_location_name)?;
        let beamed = beam && self.store.settings().button_beam_to_location_visible;
        let position = if beamed { goal.position() } else { position };

        if !position.is_valid() {
            return Err(ScavengerError::InvalidPosition {
                latitude: position.latitude,
                longitude: position.longitude,
            });
        }

        self.log.append(&LogEntry {
            team_name: name.to_string(),
            timestamp: now_timestamp(),
            latitude: position.latitude,
            longitude: position.longitude,
            solved: team.solved.len(),
            current_goal: goal.name.clone(),
            beam_to_location: beamed,
        })?;

        let distance = distance_m(position, goal.position());
        let question_visible = distance <= f64::from(self.game.radius);

        if question_visible {
            self.revealed.insert(name.clone(), goal.name.clone());
        } else {
            self.revealed.remove(name);
        }

        tracing::debug!(team = %name, goal = %goal.name, distance, beamed, "position reported");

        Ok(PositionReport::Tracking(Tracking {
            position,
            beamed,
            goal: goal.name.clone(),
            distance_m: distance,
            bearing_deg: bearing_deg(position, goal.position()),
            radius: self.game.radius,
            question_visible,
        }))
    }

    /// Record the answer for the current goal and route the team onwards
    pub fn submit_answer(
        &mut self,
        name: &TeamName,
        location_name: &str,
        answer: &Answer,
    ) -> Result<AnswerOutcome> {
        let mut team = self.load(name)?;

        if team.is_finished(&self.game) {
            return Err(ScavengerError::Finished(name.to_string()));
        }

        if team.goal_location_name != location_name {
            return Err(ScavengerError::NotCurrentGoal {
                team: name.to_string(),
                goal: team.goal_location_name.clone(),
                requested: location_name.to_string(),
            });
        }

        if self.revealed.get(name).map(String::as_str) != Some(location_name) {
            return Err(ScavengerError::QuestionLocked(location_name.to_string()));
        }

        let goal = self.game.location_by_name(location_name)?;
        let score = goal.score(answer)?;
        let from = goal.position();

        team.solved.insert(goal.name.clone(), score);

        let next_goal = if team.is_finished(&self.game) {
            None
        } else {
            let next = determine_next_location(
                &team,
                &self.game,
                score,
                from,
                self.store.settings().next_location_mechanic,
                &mut self.rng,
            )?;
            team.goal_location_name = next.clone();
            Some(next)
        };

        self.store.save_team(&team)?;
        self.revealed.remove(name);

        tracing::info!(
            team = %name,
            location = location_name,
            score,
            next = next_goal.as_deref().unwrap_or("-"),
            "answer recorded"
        );

        Ok(AnswerOutcome {
            location: location_name.to_string(),
            score,
            finished: next_goal.is_none(),
            next_goal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::sample_game;
    use crate::game::AnswerOption;
    use crate::selection::NextLocationMechanic;

    struct Fixture {
        _dir: tempfile::TempDir,
        scavenger: Scavenger,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state/application_state.yaml")).unwrap();
        let log = LocationLog::new(dir.path().join("state/location_log.ndjson"));

        let mut game = sample_game();
        for location in &mut game.locations {
            location.answer = vec![AnswerOption::new("right", 1), AnswerOption::new("wrong", -1)];
            location.dont_know_answer = Some(AnswerOption::new("No idea", 0));
        }

        Fixture {
            _dir: dir,
            scavenger: Scavenger::with_rng(game, store, log, StdRng::seed_from_u64(11)),
        }
    }

    fn name(s: &str) -> TeamName {
        TeamName::parse(s).unwrap()
    }

    fn goal_position(s: &Scavenger, team: &TeamName) -> Position {
        let status = s.status(team).unwrap();
        status.goal.unwrap().position()
    }

    fn force_goal(s: &Scavenger, team: &TeamName, goal: &str) {
        let mut state = s.store().load_team(team).unwrap().unwrap();
        state.goal_location_name = goal.to_string();
        s.store().save_team(&state).unwrap();
    }

    #[test]
    fn test_login_validates_and_registers() {
        let mut f = fixture();
        assert!(matches!(
            f.scavenger.login("Team 1"),
            Err(ScavengerError::InvalidTeamName(_))
        ));

        let status = f.scavenger.login("Owls").unwrap();
        assert_eq!(status.total_locations, 4);
        assert!(!status.finished);
        assert!(status.goal.is_some());
        assert!(!status.beam_available);
        assert!(f.scavenger.store().team_exists(&name("Owls")));

        // Logging in again resumes the same team
        assert_eq!(f.scavenger.login("Owls").unwrap(), status);
    }

    #[test]
    fn test_unknown_team() {
        let mut f = fixture();
        assert!(matches!(
            f.scavenger.status(&name("Ghosts")),
            Err(ScavengerError::UnknownTeam(_))
        ));
        assert!(matches!(
            f.scavenger.report_position(&name("Ghosts"), Position::new(0.0, 0.0), false),
            Err(ScavengerError::UnknownTeam(_))
        ));
    }

    #[test]
    fn test_question_hidden_until_in_radius() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        force_goal(&f.scavenger, &owls, "Location B");

        let far = f
            .scavenger
            .report_position(&owls, Position::new(0.0, 0.0), false)
            .unwrap();
        let PositionReport::Tracking(far) = far else {
            panic!("expected tracking");
        };
        assert!(!far.question_visible);
        assert!(far.distance_m > 100_000.0);
        assert!((44.0..46.0).contains(&far.bearing_deg));

        assert!(matches!(
            f.scavenger
                .submit_answer(&owls, "Location B", &Answer::Choice("right".into())),
            Err(ScavengerError::QuestionLocked(_))
        ));

        let near = f
            .scavenger
            .report_position(&owls, Position::new(1.0003, 1.0), false)
            .unwrap();
        let PositionReport::Tracking(near) = near else {
            panic!("expected tracking");
        };
        assert!(near.question_visible);
        assert!(near.distance_m < 100.0);

        let entries = f.scavenger.log().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].current_goal, "Location B");
        assert!(!entries[1].beam_to_location);
    }

    #[test]
    fn test_correct_answer_routes_to_nearest() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        force_goal(&f.scavenger, &owls, "Location A");

        let here = goal_position(&f.scavenger, &owls);
        f.scavenger.report_position(&owls, here, false).unwrap();
        let outcome = f
            .scavenger
            .submit_answer(&owls, "Location A", &Answer::Choice("right".into()))
            .unwrap();

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.next_goal.as_deref(), Some("Location D"));
        assert!(!outcome.finished);

        let team = f.scavenger.store().load_team(&owls).unwrap().unwrap();
        assert_eq!(team.solved.get("Location A"), Some(&1));
        assert_eq!(team.goal_location_name, "Location D");
    }

    #[test]
    fn test_wrong_answer_routes_to_furthest() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        force_goal(&f.scavenger, &owls, "Location A");

        let here = goal_position(&f.scavenger, &owls);
        f.scavenger.report_position(&owls, here, false).unwrap();
        let outcome = f
            .scavenger
            .submit_answer(&owls, "Location A", &Answer::Choice("wrong".into()))
            .unwrap();

        assert_eq!(outcome.score, -1);
        assert_eq!(outcome.next_goal.as_deref(), Some("Location C"));
    }

    #[test]
    fn test_stale_goal_is_rejected() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        force_goal(&f.scavenger, &owls, "Location A");

        assert!(matches!(
            f.scavenger
                .submit_answer(&owls, "Location B", &Answer::DontKnow),
            Err(ScavengerError::NotCurrentGoal { .. })
        ));
    }

    #[test]
    fn test_beam_requires_setting() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        force_goal(&f.scavenger, &owls, "Location C");

        let PositionReport::Tracking(ignored) = f
            .scavenger
            .report_position(&owls, Position::new(0.0, 0.0), true)
            .unwrap()
        else {
            panic!("expected tracking");
        };
        assert!(!ignored.beamed);
        assert!(!ignored.question_visible);

        f.scavenger.store_mut().set_beam_visible(true).unwrap();
        let PositionReport::Tracking(beamed) = f
            .scavenger
            .report_position(&owls, Position::new(0.0, 0.0), true)
            .unwrap()
        else {
            panic!("expected tracking");
        };
        assert!(beamed.beamed);
        assert!(beamed.question_visible);
        assert_eq!(beamed.position, Position::new(2.0, 2.0));

        let entries = f.scavenger.log().read_all().unwrap();
        assert!(entries.last().unwrap().beam_to_location);
    }

    #[test]
    fn test_full_run_finishes() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        f.scavenger
            .store_mut()
            .set_mechanic(NextLocationMechanic::Random)
            .unwrap();

        for _ in 0..4 {
            let here = goal_position(&f.scavenger, &owls);
            f.scavenger.report_position(&owls, here, false).unwrap();
            let goal = f.scavenger.status(&owls).unwrap().team.goal_location_name;
            f.scavenger
                .submit_answer(&owls, &goal, &Answer::DontKnow)
                .unwrap();
        }

        let status = f.scavenger.status(&owls).unwrap();
        assert!(status.finished);
        assert!(status.goal.is_none());
        assert_eq!(status.team.solved.len(), 4);
        assert_eq!(status.team.total_score(), 0);

        let logged = f.scavenger.log().read_all().unwrap().len();
        assert_eq!(
            f.scavenger
                .report_position(&owls, Position::new(0.0, 0.0), false)
                .unwrap(),
            PositionReport::Finished
        );
        assert_eq!(f.scavenger.log().read_all().unwrap().len(), logged);

        assert!(matches!(
            f.scavenger.submit_answer(&owls, "Location A", &Answer::DontKnow),
            Err(ScavengerError::Finished(_))
        ));
    }

    #[test]
    fn test_reset_clears_teams_and_log() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();
        f.scavenger
            .report_position(&owls, Position::new(0.0, 0.0), false)
            .unwrap();

        assert_eq!(f.scavenger.reset().unwrap(), 1);
        assert!(f.scavenger.log().read_all().unwrap().is_empty());
        assert!(matches!(
            f.scavenger.status(&owls),
            Err(ScavengerError::UnknownTeam(_))
        ));
    }

    #[test]
    fn test_invalid_position() {
        let mut f = fixture();
        let owls = name("Owls");
        f.scavenger.login("Owls").unwrap();

        assert!(matches!(
            f.scavenger
                .report_position(&owls, Position::new(123.0, 0.0), false),
            Err(ScavengerError::InvalidPosition { .. })
        ));
    }
}
