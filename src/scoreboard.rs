//! Persistent ranking of past runs.
//!
//! The scoreboard is a TOML file under `saves/` holding the top runs by
//! points, re-sortable by kills or survival time for display.  Load
//! failures degrade to an empty board so a corrupt file never blocks a
//! new session; the old file is simply overwritten at the next game
//! over.

use crate::constants::{MAX_NAME_LENGTH, MAX_SCORES};
use crate::error::{GameError, GameResult};
use crate::session::{Score, SessionClock};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SCOREBOARD_PATH: &str = "saves/ranking.toml";

/// One finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub kills: u32,
    /// Seconds survived.
    pub survival_time: f32,
}

impl Default for ScoreEntry {
    fn default() -> Self {
        Self {
            name: "---".to_string(),
            score: 0,
            kills: 0,
            survival_time: 0.0,
        }
    }
}

/// Column the board is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Score,
    Kills,
    Time,
}

/// The ranked list of past runs.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Insert a finished run, keeping the board sorted and capped.
    ///
    /// Names longer than the display limit are truncated on entry.
    pub fn add(&mut self, mut entry: ScoreEntry, key: SortKey) {
        entry.name.truncate(MAX_NAME_LENGTH);
        self.entries.push(entry);
        self.sort(key);
        self.entries.truncate(MAX_SCORES);
    }

    /// Re-order by `key`: score and kills descending, time ascending.
    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Score => self.entries.sort_by(|a, b| b.score.cmp(&a.score)),
            SortKey::Kills => self.entries.sort_by(|a, b| b.kills.cmp(&a.kills)),
            SortKey::Time => self
                .entries
                .sort_by(|a, b| a.survival_time.total_cmp(&b.survival_time)),
        }
    }

    /// Entry at `rank`, or a placeholder for empty rows.  Display code
    /// can iterate all ten rows without bounds checks.
    pub fn entry_at(&self, rank: usize) -> ScoreEntry {
        self.entries.get(rank).cloned().unwrap_or_default()
    }

    /// Load the board from `path`; any failure yields an empty board.
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Scoreboard>(&contents) {
                Ok(board) => board,
                Err(e) => {
                    let err = GameError::ScoreboardRead {
                        path: path.to_string(),
                        detail: e.to_string(),
                    };
                    eprintln!("⚠ {err}; starting fresh");
                    Scoreboard::default()
                }
            },
            // Missing file is the first-run case, not an error.
            Err(_) => Scoreboard::default(),
        }
    }

    /// Serialize the board to `path`, creating parent directories.
    pub fn save(&self, path: &str) -> GameResult<()> {
        let write_err = |detail: String| GameError::ScoreboardWrite {
            path: path.to_string(),
            detail,
        };
        let toml_string = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        fs::write(path, toml_string).map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }
}

/// Startup system: load the persisted board into the world.
pub fn load_scoreboard(mut commands: Commands) {
    commands.insert_resource(Scoreboard::load(SCOREBOARD_PATH));
}

/// Record the finished run when the session ends.
pub fn record_run_system(
    score: Res<Score>,
    clock: Res<SessionClock>,
    mut board: ResMut<Scoreboard>,
) {
    board.add(
        ScoreEntry {
            name: "Pilot".to_string(),
            score: score.points,
            kills: score.kills,
            survival_time: clock.elapsed,
        },
        SortKey::Score,
    );
    if let Err(e) = board.save(SCOREBOARD_PATH) {
        eprintln!("⚠ Failed to save scoreboard: {e}");
    }
}

pub struct ScoreboardPlugin;

impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Scoreboard::default())
            .add_systems(Startup, load_scoreboard)
            .add_systems(
                OnEnter(crate::session::GameState::GameOver),
                record_run_system,
            );
    }
}
