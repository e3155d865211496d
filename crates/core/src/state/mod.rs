//! File-backed game state.
//!
//! Layout next to the configured state file:
//!
//! ```text
//! state/
//! ├── application_state.yaml   settings shared by every team
//! └── team_states/
//!     ├── Owls.yaml
//!     └── RedFoxes.yaml
//! ```
//!
//! Every mutation rewrites the whole affected file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};
use crate::game::Game;
use crate::identifiers::TeamName;
use crate::selection::NextLocationMechanic;

pub mod team;

pub use team::TeamState;

const TEAM_DIR: &str = "team_states";
const TEAM_EXTENSION: &str = "yaml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Lets players teleport to their goal; meant for testing a course
    #[serde(default)]
    pub button_beam_to_location_visible: bool,
    #[serde(default)]
    pub next_location_mechanic: NextLocationMechanic,
}

pub struct StateStore {
    settings_path: PathBuf,
    team_dir: PathBuf,
    settings: GameSettings,
}

impl StateStore {
    /// Open the store at `state_file`, creating directories and default settings as needed
    pub fn open(state_file: impl AsRef<Path>) -> Result<Self> {
        let settings_path = state_file.as_ref().to_path_buf();
        let base = settings_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let team_dir = base.join(TEAM_DIR);

        std::fs::create_dir_all(&team_dir).map_err(|e| ScavengerError::io(&team_dir, e))?;

        let settings = if settings_path.exists() {
            read_yaml(&settings_path)?
        } else {
            GameSettings::default()
        };

        let store = Self {
            settings_path,
            team_dir,
            settings,
        };

        if !store.settings_path.exists() {
            tracing::info!(path = %store.settings_path.display(), "writing default settings");
            store.save_settings()?;
        }

        Ok(store)
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn save_settings(&self) -> Result<()> {
        write_yaml(&self.settings_path, &self.settings)
    }

    pub fn set_beam_visible(&mut self, visible: bool) -> Result<()> {
        if self.settings.button_beam_to_location_visible != visible {
            self.settings.button_beam_to_location_visible = visible;
            self.save_settings()?;
            tracing::info!(visible, "beam-to-location toggled");
        }
        Ok(())
    }

    pub fn set_mechanic(&mut self, mechanic: NextLocationMechanic) -> Result<()> {
        if self.settings.next_location_mechanic != mechanic {
            self.settings.next_location_mechanic = mechanic;
            self.save_settings()?;
            tracing::info!(%mechanic, "next location mechanic changed");
        }
        Ok(())
    }

    fn team_path(&self, name: &TeamName) -> PathBuf {
        self.team_dir
            .join(format!("{}.{}", name.as_str(), TEAM_EXTENSION))
    }

    pub fn team_exists(&self, name: &TeamName) -> bool {
        self.team_path(name).exists()
    }

    pub fn n_active_teams(&self) -> Result<usize> {
        Ok(self.team_files()?.len())
    }

    pub fn load_team(&self, name: &TeamName) -> Result<Option<TeamState>> {
        let path = self.team_path(name);
        if !path.exists() {
            return Ok(None);
        }

        read_yaml(&path).map(Some)
    }

    /// Load `name`, or register it with a random starting goal
    pub fn get_or_create_team<R: Rng + ?Sized>(
        &self,
        name: &TeamName,
        game: &Game,
        rng: &mut R,
    ) -> Result<TeamState> {
        if let Some(team) = self.load_team(name)? {
            return Ok(team);
        }

        let goal = game
            .locations
            .choose(rng)
            .ok_or_else(|| ScavengerError::InvalidGame("the game has no locations".to_string()))?;

        let team = TeamState::new(name.clone(), goal.name.clone());
        self.save_team(&team)?;

        tracing::info!(team = %name, goal = %goal.name, "registered team");
        Ok(team)
    }

    pub fn save_team(&self, team: &TeamState) -> Result<()> {
        write_yaml(&self.team_path(&team.name), team)
    }

    /// Every stored team, keyed by the file stem
    pub fn teams(&self) -> Result<BTreeMap<TeamName, TeamState>> {
        let mut teams = BTreeMap::new();

        for path in self.team_files()? {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

            let Ok(name) = TeamName::parse(stem) else {
                tracing::warn!(path = %path.display(), "ignoring team file with invalid name");
                continue;
            };

            teams.insert(name, read_yaml(&path)?);
        }

        Ok(teams)
    }

    /// Delete all team progress; returns how many teams were removed
    pub fn reset(&self) -> Result<usize> {
        let files = self.team_files()?;

        for path in &files {
            std::fs::remove_file(path).map_err(|e| ScavengerError::io(path, e))?;
        }

        tracing::warn!(teams = files.len(), "deleted all team data");
        Ok(files.len())
    }

    fn team_files(&self) -> Result<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(&self.team_dir).map_err(|e| ScavengerError::io(&self.team_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ScavengerError::io(&self.team_dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TEAM_EXTENSION) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ScavengerError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| ScavengerError::yaml(path, e))
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value).map_err(|e| ScavengerError::yaml(path, e))?;
    std::fs::write(path, content).map_err(|e| ScavengerError::io(path, e))
}
