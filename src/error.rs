//! Game-specific error types.
//!
//! Systems degrade gracefully rather than panicking: failed spawns are
//! local no-ops, bad files fall back to defaults, and these types carry
//! the diagnostics for the paths that do surface errors.

use std::fmt;

/// Top-level error enum for the ringfall simulation.
#[derive(Debug)]
pub enum GameError {
    /// The scoreboard file could not be read or decoded.
    ScoreboardRead {
        /// Path that failed.
        path: String,
        /// Underlying failure description.
        detail: String,
    },

    /// The scoreboard file could not be written.
    ScoreboardWrite {
        path: String,
        detail: String,
    },

    /// Gameplay constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ScoreboardRead { path, detail } => {
                write!(f, "failed to read scoreboard '{}': {}", path, detail)
            }
            GameError::ScoreboardWrite { path, detail } => {
                write!(f, "failed to write scoreboard '{}': {}", path, detail)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if the spawn-interval floor is not strictly positive.
///
/// A zero or negative floor lets the difficulty decay drive the interval
/// to zero and flood the arena in a single frame.
pub fn validate_spawn_interval_min(value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name: "SPAWN_INTERVAL_MIN",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the play-area radius cannot contain the player.
pub fn validate_play_area_radius(radius: f32, player_radius: f32) -> GameResult<()> {
    if radius <= player_radius {
        Err(GameError::UnsafeConstant {
            name: "play_area_radius",
            value: radius,
            safe_range: "(player radius, ∞)",
        })
    } else {
        Ok(())
    }
}
