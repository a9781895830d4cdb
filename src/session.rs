//! Session flow: game states, score, difficulty ramp, enemy spawning,
//! and the boss trigger.
//!
//! The app-level state machine is a Bevy [`States`] enum; gameplay
//! systems gate on `Playing`, so pausing freezes the whole simulation
//! without touching any entity.  Starting a fresh run (from the menu or
//! after a game over) rebuilds the battlefield via [`reset_session`];
//! resuming from pause does not, guarded by [`SessionActive`].

use crate::arena::PlayArea;
use crate::boss::{spawn_boss, Boss};
use crate::config::GameConfig;
use crate::enemy::{spawn_enemy, Enemy, EnemyKind};
use crate::player::{spawn_player, DamageBoost, FireCooldown, Player, PlayerLives};
use crate::powerup::PowerUp;
use crate::projectile::Projectile;
use bevy::prelude::*;
use rand::Rng;

/// Top-level application state.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    MainMenu,
    Playing,
    Paused,
    GameOver,
}

/// Running score for the current session.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Score {
    pub points: u64,
    pub kills: u32,
}

/// Wall-clock play time for the current session, seconds.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SessionClock {
    pub elapsed: f32,
}

/// Enemy spawn pacing.
#[derive(Resource, Debug, Clone, Copy)]
pub struct EnemySpawnState {
    /// Seconds since the last spawn.
    pub timer: f32,
    /// Current delay between spawns.
    pub interval: f32,
    /// Seconds since the last difficulty step.
    pub difficulty_timer: f32,
}

impl Default for EnemySpawnState {
    fn default() -> Self {
        Self {
            timer: 0.0,
            interval: crate::constants::SPAWN_INTERVAL_INITIAL,
            difficulty_timer: 0.0,
        }
    }
}

/// Tracks whether the boss has been summoned this session.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct BossEncounter {
    pub spawned: bool,
}

/// Whether a session is live.  Cleared on menu/game-over entry so the
/// next `Playing` entry rebuilds the field; pause leaves it set.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SessionActive(pub bool);

// ── Difficulty & spawning ─────────────────────────────────────────────────────

/// Tighten the spawn interval at fixed play-time steps, down to a floor.
pub fn difficulty_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut clock: ResMut<SessionClock>,
    mut spawn: ResMut<EnemySpawnState>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    clock.elapsed += dt;
    spawn.difficulty_timer += dt;
    if spawn.difficulty_timer >= config.difficulty_step_secs {
        spawn.difficulty_timer = 0.0;
        spawn.interval =
            (spawn.interval * config.spawn_interval_decay).max(config.spawn_interval_min);
    }
}

/// Enemy mix per score band.  `roll` is uniform in `0..100`.
///
/// Higher bands shift weight from the basic chaser toward the special
/// kinds; shooters only appear from the second band on.
pub fn pick_enemy_kind(score: u64, roll: u32) -> EnemyKind {
    // (normal, speeder, tank, exploder, shooter), each row sums to 100.
    let weights: [u32; 5] = if score < 1000 {
        [70, 15, 10, 5, 0]
    } else if score < 2000 {
        [50, 20, 15, 10, 5]
    } else if score < 3000 {
        [35, 25, 15, 15, 10]
    } else {
        [25, 25, 20, 15, 15]
    };

    let kinds = [
        EnemyKind::Normal,
        EnemyKind::Speeder,
        EnemyKind::Tank,
        EnemyKind::Exploder,
        EnemyKind::Shooter,
    ];
    let mut threshold = 0;
    for (kind, weight) in kinds.iter().zip(weights) {
        threshold += weight;
        if roll < threshold {
            return *kind;
        }
    }
    EnemyKind::Normal
}

/// Spawn enemies on the arena rim at the current pace.
pub fn enemy_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    area: Res<PlayArea>,
    score: Res<Score>,
    mut spawn: ResMut<EnemySpawnState>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    spawn.timer += dt;
    if spawn.timer < spawn.interval {
        return;
    }
    spawn.timer = 0.0;

    let mut rng = rand::thread_rng();
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let position = area.boundary_point(angle);
    let kind = pick_enemy_kind(score.points, rng.gen_range(0..100));
    let radius = rng.gen_range(config.enemy_radius_min..=config.enemy_radius_max);
    let speed = rng.gen_range(config.enemy_speed_min..=config.enemy_speed_max);
    spawn_enemy(&mut commands, kind, position, radius, speed);
}

/// Summon the boss once the score crosses the trigger threshold.
pub fn boss_trigger_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    area: Res<PlayArea>,
    score: Res<Score>,
    mut encounter: ResMut<BossEncounter>,
) {
    if encounter.spawned || score.points < config.boss_trigger_score {
        return;
    }
    encounter.spawned = true;
    spawn_boss(&mut commands, &area, &config);
    println!("[session] boss summoned at {} points", score.points);
}

// ── State transitions ─────────────────────────────────────────────────────────

/// Main menu: Enter starts a run.
pub fn main_menu_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Playing);
    }
}

/// Playing: Escape pauses.
pub fn pause_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::Paused);
    }
}

/// Paused: Escape resumes.
pub fn resume_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::Playing);
    }
}

/// Game over: R restarts immediately, Enter returns to the menu.
pub fn game_over_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        next_state.set(GameState::Playing);
    } else if keys.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::MainMenu);
    }
}

/// Mark the session dead so the next `Playing` entry resets.
pub fn end_session(mut active: ResMut<SessionActive>) {
    active.0 = false;
}

/// Rebuild the battlefield for a fresh run.
///
/// Runs on every `Playing` entry but is a no-op when resuming from
/// pause (the session is still live).
#[allow(clippy::too_many_arguments)]
pub fn reset_session(
    mut commands: Commands,
    mut active: ResMut<SessionActive>,
    mut score: ResMut<Score>,
    mut clock: ResMut<SessionClock>,
    mut spawn: ResMut<EnemySpawnState>,
    mut encounter: ResMut<BossEncounter>,
    mut lives: ResMut<PlayerLives>,
    mut boost: ResMut<DamageBoost>,
    mut cooldown: ResMut<FireCooldown>,
    mut area: ResMut<PlayArea>,
    leftovers: Query<
        Entity,
        Or<(
            With<Enemy>,
            With<Projectile>,
            With<PowerUp>,
            With<Boss>,
            With<Player>,
        )>,
    >,
) {
    if active.0 {
        return;
    }
    active.0 = true;

    for entity in leftovers.iter() {
        commands.entity(entity).despawn();
    }
    *score = Score::default();
    *clock = SessionClock::default();
    *spawn = EnemySpawnState::default();
    *encounter = BossEncounter::default();
    *lives = PlayerLives::default();
    *boost = DamageBoost::default();
    *cooldown = FireCooldown::default();
    area.reset();
    spawn_player(&mut commands);
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .insert_resource(Score::default())
            .insert_resource(SessionClock::default())
            .insert_resource(EnemySpawnState::default())
            .insert_resource(BossEncounter::default())
            .insert_resource(SessionActive::default())
            .add_systems(
                Update,
                (difficulty_system, enemy_spawn_system, boss_trigger_system)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    main_menu_input_system.run_if(in_state(GameState::MainMenu)),
                    pause_input_system.run_if(in_state(GameState::Playing)),
                    resume_input_system.run_if(in_state(GameState::Paused)),
                    game_over_input_system.run_if(in_state(GameState::GameOver)),
                ),
            )
            .add_systems(OnEnter(GameState::Playing), reset_session)
            .add_systems(OnEnter(GameState::MainMenu), end_session)
            .add_systems(OnEnter(GameState::GameOver), end_session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_weights_sum_to_one_hundred_in_every_band() {
        for score in [0, 1500, 2500, 9999] {
            // roll 99 must land on some kind; roll 100 would be out of range.
            let _ = pick_enemy_kind(score, 99);
            let mut counts = [0u32; 5];
            for roll in 0..100 {
                let idx = match pick_enemy_kind(score, roll) {
                    EnemyKind::Normal => 0,
                    EnemyKind::Speeder => 1,
                    EnemyKind::Tank => 2,
                    EnemyKind::Exploder => 3,
                    EnemyKind::Shooter => 4,
                };
                counts[idx] += 1;
            }
            assert_eq!(counts.iter().sum::<u32>(), 100);
        }
    }

    #[test]
    fn shooters_are_absent_from_the_opening_band() {
        for roll in 0..100 {
            assert_ne!(pick_enemy_kind(0, roll), EnemyKind::Shooter);
        }
    }

    #[test]
    fn later_bands_thin_out_basic_chasers() {
        let early = (0..100)
            .filter(|&r| pick_enemy_kind(0, r) == EnemyKind::Normal)
            .count();
        let late = (0..100)
            .filter(|&r| pick_enemy_kind(5000, r) == EnemyKind::Normal)
            .count();
        assert!(late < early);
    }

    #[test]
    fn difficulty_step_shrinks_the_interval_to_a_floor() {
        let config = GameConfig::default();
        let mut interval = config.spawn_interval_initial;
        for _ in 0..200 {
            interval = (interval * config.spawn_interval_decay).max(config.spawn_interval_min);
        }
        assert_eq!(interval, config.spawn_interval_min);
    }
}
