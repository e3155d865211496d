use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_GAME_FILE: &str = "game_data/game.yaml";
pub const DEFAULT_STATE_FILE: &str = "state/application_state.yaml";
pub const DEFAULT_LOGGING_FILE: &str = "state/location_log.ndjson";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "scavenger-server",
    author,
    version,
    about = "Location-based scavenger hunt server",
    long_about = "Serves the player and admin API of a scavenger hunt. Teams report \
                  their position, unlock the question of their goal once within the \
                  game radius, and get routed to the nearest, furthest or a random \
                  next location depending on their answer."
)]
pub struct Config {
    /// Game catalog (YAML)
    #[arg(long, env = "GAME_FILE", default_value = DEFAULT_GAME_FILE)]
    pub game_file: PathBuf,

    /// Settings file; team progress is stored in `team_states/` next to it
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// NDJSON log of reported positions
    #[arg(long, env = "LOGGING_FILE", default_value = DEFAULT_LOGGING_FILE)]
    pub logging_file: PathBuf,

    /// Address to listen on
    #[arg(long, env = "SCAVENGER_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Bearer token required by the admin routes; open when unset
    #[arg(long, env = "SCAVENGER_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["scavenger-server"]).unwrap();
        assert_eq!(config.game_file, PathBuf::from(DEFAULT_GAME_FILE));
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert_eq!(config.logging_file, PathBuf::from(DEFAULT_LOGGING_FILE));
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "scavenger-server",
            "--game-file",
            "test_game.yaml",
            "--state-file",
            "test_state.yaml",
            "--logging-file",
            "test_log.ndjson",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();

        assert_eq!(config.game_file, PathBuf::from("test_game.yaml"));
        assert_eq!(config.state_file, PathBuf::from("test_state.yaml"));
        assert_eq!(config.logging_file, PathBuf::from("test_log.ndjson"));
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
