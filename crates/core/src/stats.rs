//! Aggregations behind the admin dashboard.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::geometry::{Position, distance_m};
use crate::identifiers::TeamName;
use crate::location_log::LogEntry;
use crate::state::TeamState;

pub const ALL_SOLVED: &str = "All locations solved";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team: String,
    pub solved: usize,
    pub current_goal: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRow {
    pub id: usize,
    pub location: String,
    pub teams_answered: usize,
    pub teams_unanswered: usize,
    pub teams_correct: usize,
    pub teams_incorrect: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub team_name: String,
    pub points_clicked: usize,
    pub distance_traveled_km: f64,
    pub distance_beamed_km: f64,
    pub total_score: i32,
}

pub fn team_overview(game: &Game, teams: &BTreeMap<TeamName, TeamState>) -> Vec<TeamRow> {
    teams
        .values()
        .map(|team| TeamRow {
            team: team.name.to_string(),
            solved: team.solved.len(),
            current_goal: if team.is_finished(game) {
                ALL_SOLVED.to_string()
            } else {
                team.goal_location_name.clone()
            },
        })
        .collect()
}

/// Per-location answer counts; `active_teams` is the number of stored team
/// files, which may exceed `teams` when some files could not be named
pub fn puzzle_overview(
    game: &Game,
    teams: &BTreeMap<TeamName, TeamState>,
    active_teams: usize,
) -> Vec<PuzzleRow> {
    game.locations
        .iter()
        .enumerate()
        .map(|(ix, location)| {
            let scores: Vec<i32> = teams
                .values()
                .filter_map(|t| t.score_for(&location.name))
                .collect();
            let correct = scores.iter().filter(|&&s| s > 0).count();

            PuzzleRow {
                id: ix + 1,
                location: location.name.clone(),
                teams_answered: scores.len(),
                teams_unanswered: active_teams.saturating_sub(scores.len()),
                teams_correct: correct,
                teams_incorrect: scores.len() - correct,
            }
        })
        .collect()
}

/// Log entries ordered by timestamp; unparseable timestamps sort first
fn chronological(log: &[LogEntry]) -> Vec<&LogEntry> {
    log.iter()
        .sorted_by_key(|e| e.time())
        .collect()
}

/// Per-team movement and score, best score first.
///
/// A leg between two consecutive reports of the same team counts as beamed
/// when the later report was beamed.
pub fn summary(teams: &BTreeMap<TeamName, TeamState>, log: &[LogEntry]) -> Vec<SummaryRow> {
    let mut rows: BTreeMap<&str, SummaryRow> = BTreeMap::new();
    let mut last_seen: BTreeMap<&str, Position> = BTreeMap::new();

    for entry in chronological(log) {
        let team = entry.team_name.as_str();
        let here = Position::new(entry.latitude, entry.longitude);

        let row = rows.entry(team).or_insert_with(|| SummaryRow {
            team_name: team.to_string(),
            points_clicked: 0,
            distance_traveled_km: 0.0,
            distance_beamed_km: 0.0,
            total_score: teams
                .iter()
                .find(|(name, _)| name.as_str() == team)
                .map(|(_, t)| t.total_score())
                .unwrap_or_default(),
        });

        let leg_km = last_seen
            .insert(team, here)
            .map(|previous| distance_m(previous, here) / 1000.0)
            .unwrap_or_default();

        if entry.beam_to_location {
            row.distance_beamed_km += leg_km;
        } else {
            row.points_clicked += 1;
            row.distance_traveled_km += leg_km;
        }
    }

    rows.into_values()
        .sorted_by(|a, b| b.total_score.cmp(&a.total_score))
        .collect()
}

/// One LineString per team, following its reports in time order
pub fn tracks_geojson(log: &[LogEntry]) -> FeatureCollection {
    let by_team = chronological(log)
        .into_iter()
        .into_group_map_by(|e| e.team_name.clone());

    let features = by_team
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(team, entries)| {
            let line: Vec<Vec<f64>> = entries
                .iter()
                .map(|e| vec![e.longitude, e.latitude])
                .collect();

            let mut properties = serde_json::Map::new();
            properties.insert("team_name".to_string(), serde_json::json!(team));
            properties.insert("points".to_string(), serde_json::json!(entries.len()));
            properties.insert(
                "current_goal".to_string(),
                serde_json::json!(entries.last().map(|e| e.current_goal.as_str())),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(fields: &[String]) -> String {
    let mut line = fields.iter().map(|f| csv_field(f)).join(",");
    line.push_str("\r\n");
    line
}

pub fn log_csv(log: &[LogEntry]) -> String {
    let mut out = csv_line(
        &[
            "team_name",
            "timestamp",
            "latitude",
            "longitude",
            "solved",
            "current_goal",
            "beam_to_location",
        ]
        .map(String::from),
    );

    for e in chronological(log) {
        out.push_str(&csv_line(&[
            e.team_name.clone(),
            e.timestamp.clone(),
            e.latitude.to_string(),
            e.longitude.to_string(),
            e.solved.to_string(),
            e.current_goal.clone(),
            e.beam_to_location.to_string(),
        ]));
    }

    out
}

pub fn summary_csv(rows: &[SummaryRow]) -> String {
    let mut out = csv_line(
        &[
            "team_name",
            "points_clicked",
            "distance_traveled",
            "distance_beamed",
            "total_score",
        ]
        .map(String::from),
    );

    for row in rows {
        out.push_str(&csv_line(&[
            row.team_name.clone(),
            row.points_clicked.to_string(),
            format!("{:.3}", row.distance_traveled_km),
            format!("{:.3}", row.distance_beamed_km),
            row.total_score.to_string(),
        ]));
    }

    out
}
