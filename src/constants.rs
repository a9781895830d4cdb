//! Compile-time gameplay defaults.
//!
//! These constants are the **authoritative defaults** mirrored by
//! [`crate::config::GameConfig`].  Runtime overrides come from
//! `assets/game.toml`; keep both in sync when adding a value.

// ── Screen & Arena ────────────────────────────────────────────────────────────

/// Window / despawn-rect width in world units (world origin is the centre).
pub const SCREEN_WIDTH: f32 = 1700.0;
/// Window / despawn-rect height in world units.
pub const SCREEN_HEIGHT: f32 = 1000.0;
/// Gap between the screen edge and the circular play-area boundary.
pub const PLAY_AREA_MARGIN: f32 = 50.0;
/// Score at which the arena starts pulsing between its min and max radius.
pub const AREA_PULSE_SCORE: u64 = 1000;
/// Seconds between pulse direction flips once pulsing is active.
pub const AREA_PULSE_PERIOD: f32 = 10.0;
/// Contracted arena radius as a fraction of the base radius.
pub const AREA_MIN_SCALE: f32 = 0.7;
/// Radius interpolation rate while the arena resizes, units/second.
pub const AREA_TRANSITION_SPEED: f32 = 120.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 15.0;
pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_LIVES: i32 = 3;
/// Hard cap on lives; heal power-ups cannot push past this.
pub const PLAYER_LIVES_MAX: i32 = 5;
/// Post-hit grace window, seconds.
pub const INVINCIBILITY_DURATION: f32 = 3.0;
/// Visibility toggle cadence while invincible, seconds.
pub const BLINK_INTERVAL: f32 = 0.1;
pub const DASH_DURATION: f32 = 0.25;
pub const DASH_COOLDOWN: f32 = 5.0;
pub const DASH_SPEED: f32 = 800.0;
/// Minimum interval between consecutive player shots, seconds.
pub const FIRE_COOLDOWN: f32 = 0.15;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_SPEED: f32 = 700.0;
pub const PROJECTILE_RADIUS: f32 = 5.0;
pub const PROJECTILE_DAMAGE: i32 = 1;
/// Boundary reflections granted to ricochet-capable projectiles.
pub const RICOCHET_BOUNCES: u8 = 3;
/// Post-reflection pull-back inside the boundary, units.
pub const RICOCHET_INSET: f32 = 2.0;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_RADIUS_MIN: f32 = 10.0;
pub const ENEMY_RADIUS_MAX: f32 = 30.0;
pub const ENEMY_SPEED_MIN: f32 = 100.0;
pub const ENEMY_SPEED_MAX: f32 = 250.0;
/// Seconds a dead enemy lingers (for its death animation) before despawn.
pub const DEATH_ANIMATION_DURATION: f32 = 0.8;
pub const SPEEDER_SPEED_MULTIPLIER: f32 = 1.5;
/// Shooter kiting bands: retreat inside, approach outside, strafe between.
pub const SHOOTER_RETREAT_RANGE: f32 = 200.0;
pub const SHOOTER_APPROACH_RANGE: f32 = 450.0;
pub const SHOOTER_FIRE_RANGE: f32 = 500.0;
pub const SHOOTER_FIRE_INTERVAL: f32 = 1.0;
/// Aim jitter applied to shooter shots, radians (±).
pub const SHOOTER_AIM_JITTER: f32 = 0.05;
/// Enemy projectiles fired by an exploder's death burst.
pub const EXPLODER_BURST_COUNT: usize = 8;
/// Score awarded per enemy destroyed by a player projectile.
pub const ENEMY_KILL_SCORE: u64 = 100;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_RADIUS: f32 = 60.0;
pub const BOSS_BASE_SPEED: f32 = 80.0;
/// Invulnerable pause between layers, seconds.
pub const BOSS_TRANSITION_DURATION: f32 = 1.0;
pub const BOSS_DASH_DURATION: f32 = 0.3;
pub const BOSS_DASH_COOLDOWN: f32 = 3.0;
pub const BOSS_DASH_SPEED: f32 = 800.0;
/// Pushback margin when the boss is clamped back inside the arena.
pub const BOSS_CLAMP_MARGIN: f32 = 5.0;
/// Score at which the session spawns the boss encounter.
pub const BOSS_TRIGGER_SCORE: u64 = 3000;

// ── Power-ups ─────────────────────────────────────────────────────────────────

pub const POWERUP_RADIUS: f32 = 15.0;
pub const POWERUP_LIFETIME: f32 = 10.0;
/// Chance (percent) that an enemy kill drops a power-up.
pub const POWERUP_DROP_CHANCE: u32 = 10;
pub const DAMAGE_BOOST_DURATION: f32 = 8.0;
pub const SHIELD_DURATION: f32 = 5.0;

// ── Session ───────────────────────────────────────────────────────────────────

/// Initial delay between enemy spawns, seconds.
pub const SPAWN_INTERVAL_INITIAL: f32 = 1.5;
/// Multiplier applied to the spawn interval at each difficulty step.
pub const SPAWN_INTERVAL_DECAY: f32 = 0.90;
/// Spawn interval floor, seconds.
pub const SPAWN_INTERVAL_MIN: f32 = 0.2;
/// Seconds of play between difficulty steps.
pub const DIFFICULTY_STEP_SECS: f32 = 10.0;

// ── Scoreboard ────────────────────────────────────────────────────────────────

/// Entries retained in the persistent ranking.
pub const MAX_SCORES: usize = 10;
pub const MAX_NAME_LENGTH: usize = 24;
