use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScavengerError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid game data: {0}")]
    InvalidGame(String),

    #[error("Location '{0}' not found in the game")]
    UnknownLocation(String),

    #[error("Location '{location}' has no answer option '{option}'")]
    UnknownOption { location: String, option: String },

    #[error("Team '{0}' is not registered")]
    UnknownTeam(String),

    #[error("Invalid position ({latitude}, {longitude})")]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error("The question at '{0}' has not been revealed; report a position within range first")]
    QuestionLocked(String),

    #[error("Invalid team name '{0}': only uppercase and lowercase letters are allowed")]
    InvalidTeamName(String),

    #[error("Team '{0}' has no unsolved locations left")]
    NoUnsolvedLocations(String),

    #[error("Team '{team}' is heading to '{goal}', not '{requested}'")]
    NotCurrentGoal {
        team: String,
        goal: String,
        requested: String,
    },

    #[error("Team '{0}' has already solved every location")]
    Finished(String),

    #[error("Failed to log data after {attempts} attempts due to: {source}")]
    LogWrite {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

impl ScavengerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScavengerError>;
