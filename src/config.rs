//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the constants in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! Add `config: Res<GameConfig>` to a system parameter list and read values
//! with `config.projectile_speed`, `config.boss_base_speed`, etc.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset via `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Screen & Arena ───────────────────────────────────────────────────────
    pub screen_width: f32,
    pub screen_height: f32,
    pub play_area_margin: f32,
    pub area_pulse_score: u64,
    pub area_pulse_period: f32,
    pub area_min_scale: f32,
    pub area_transition_speed: f32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_lives: i32,
    pub player_lives_max: i32,
    pub invincibility_duration: f32,
    pub blink_interval: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub dash_speed: f32,
    pub fire_cooldown: f32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_damage: i32,
    pub ricochet_bounces: u8,
    pub ricochet_inset: f32,

    // ── Enemies ───────────────────────────────────────────────────────────────
    pub enemy_radius_min: f32,
    pub enemy_radius_max: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub death_animation_duration: f32,
    pub speeder_speed_multiplier: f32,
    pub shooter_retreat_range: f32,
    pub shooter_approach_range: f32,
    pub shooter_fire_range: f32,
    pub shooter_fire_interval: f32,
    pub shooter_aim_jitter: f32,
    pub exploder_burst_count: usize,
    pub enemy_kill_score: u64,

    // ── Boss ──────────────────────────────────────────────────────────────────
    pub boss_radius: f32,
    pub boss_base_speed: f32,
    pub boss_transition_duration: f32,
    pub boss_dash_duration: f32,
    pub boss_dash_cooldown: f32,
    pub boss_dash_speed: f32,
    pub boss_clamp_margin: f32,
    pub boss_trigger_score: u64,

    // ── Power-ups ─────────────────────────────────────────────────────────────
    pub powerup_radius: f32,
    pub powerup_lifetime: f32,
    pub powerup_drop_chance: u32,
    pub damage_boost_duration: f32,
    pub shield_duration: f32,

    // ── Session ───────────────────────────────────────────────────────────────
    pub spawn_interval_initial: f32,
    pub spawn_interval_decay: f32,
    pub spawn_interval_min: f32,
    pub difficulty_step_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Screen & Arena
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            play_area_margin: PLAY_AREA_MARGIN,
            area_pulse_score: AREA_PULSE_SCORE,
            area_pulse_period: AREA_PULSE_PERIOD,
            area_min_scale: AREA_MIN_SCALE,
            area_transition_speed: AREA_TRANSITION_SPEED,
            // Player
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            player_lives: PLAYER_LIVES,
            player_lives_max: PLAYER_LIVES_MAX,
            invincibility_duration: INVINCIBILITY_DURATION,
            blink_interval: BLINK_INTERVAL,
            dash_duration: DASH_DURATION,
            dash_cooldown: DASH_COOLDOWN,
            dash_speed: DASH_SPEED,
            fire_cooldown: FIRE_COOLDOWN,
            // Projectiles
            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_damage: PROJECTILE_DAMAGE,
            ricochet_bounces: RICOCHET_BOUNCES,
            ricochet_inset: RICOCHET_INSET,
            // Enemies
            enemy_radius_min: ENEMY_RADIUS_MIN,
            enemy_radius_max: ENEMY_RADIUS_MAX,
            enemy_speed_min: ENEMY_SPEED_MIN,
            enemy_speed_max: ENEMY_SPEED_MAX,
            death_animation_duration: DEATH_ANIMATION_DURATION,
            speeder_speed_multiplier: SPEEDER_SPEED_MULTIPLIER,
            shooter_retreat_range: SHOOTER_RETREAT_RANGE,
            shooter_approach_range: SHOOTER_APPROACH_RANGE,
            shooter_fire_range: SHOOTER_FIRE_RANGE,
            shooter_fire_interval: SHOOTER_FIRE_INTERVAL,
            shooter_aim_jitter: SHOOTER_AIM_JITTER,
            exploder_burst_count: EXPLODER_BURST_COUNT,
            enemy_kill_score: ENEMY_KILL_SCORE,
            // Boss
            boss_radius: BOSS_RADIUS,
            boss_base_speed: BOSS_BASE_SPEED,
            boss_transition_duration: BOSS_TRANSITION_DURATION,
            boss_dash_duration: BOSS_DASH_DURATION,
            boss_dash_cooldown: BOSS_DASH_COOLDOWN,
            boss_dash_speed: BOSS_DASH_SPEED,
            boss_clamp_margin: BOSS_CLAMP_MARGIN,
            boss_trigger_score: BOSS_TRIGGER_SCORE,
            // Power-ups
            powerup_radius: POWERUP_RADIUS,
            powerup_lifetime: POWERUP_LIFETIME,
            powerup_drop_chance: POWERUP_DROP_CHANCE,
            damage_boost_duration: DAMAGE_BOOST_DURATION,
            shield_duration: SHIELD_DURATION,
            // Session
            spawn_interval_initial: SPAWN_INTERVAL_INITIAL,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            difficulty_step_secs: DIFFICULTY_STEP_SECS,
        }
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are
/// printed to stderr but do not abort the game.  A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                println!("✓ Loaded game config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present: defaults are already in place, not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }

    // Reject overrides that would destabilize the session.
    if let Err(e) = crate::error::validate_spawn_interval_min(config.spawn_interval_min) {
        eprintln!("⚠ {e}; reverting to default");
        config.spawn_interval_min = SPAWN_INTERVAL_MIN;
    }
    let base_radius = config.screen_width.min(config.screen_height) / 2.0 - config.play_area_margin;
    if let Err(e) = crate::error::validate_play_area_radius(base_radius, config.player_radius) {
        eprintln!("⚠ {e}; reverting margin to default");
        config.play_area_margin = PLAY_AREA_MARGIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants() {
        let config = GameConfig::default();
        assert_eq!(config.projectile_speed, PROJECTILE_SPEED);
        assert_eq!(config.death_animation_duration, DEATH_ANIMATION_DURATION);
        assert_eq!(config.boss_trigger_score, BOSS_TRIGGER_SCORE);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: GameConfig = toml::from_str("projectile_speed = 900.0").unwrap();
        assert_eq!(config.projectile_speed, 900.0);
        assert_eq!(config.player_speed, PLAYER_SPEED);
    }
}
