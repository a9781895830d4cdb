//! Enemies: kinds, movement behaviours, shooter fire, death animation.
//!
//! Five kinds share one [`Enemy`] component; the [`EnemyKind`] sum type
//! carries the per-kind stats and selects the movement behaviour.  Most
//! kinds chase the player directly; the shooter kites at range and fires
//! aimed shots.  The exploder's death burst lives in the collision
//! resolvers, since it only happens when a projectile kills one.
//!
//! A killed enemy is not despawned immediately: the [`Dying`] component
//! holds it (inert, no collisions) for the duration of its death
//! animation before removal.

use crate::arena::PlayArea;
use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::player::Player;
use crate::projectile::{spawn_projectile, Faction, ProjectileProps};
use crate::session::GameState;
use bevy::prelude::*;
use rand::Rng;

/// Enemy archetype; selects stats and movement behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Direct chaser.
    Normal,
    /// Fragile but fast chaser.
    Speeder,
    /// Slow, triple-health chaser.
    Tank,
    /// Chaser that bursts into a projectile ring when shot down.
    Exploder,
    /// Ranged attacker that keeps its distance.
    Shooter,
}

impl EnemyKind {
    pub fn base_health(&self) -> i32 {
        match self {
            EnemyKind::Normal => 2,
            EnemyKind::Speeder => 1,
            EnemyKind::Tank => 3,
            EnemyKind::Exploder => 2,
            EnemyKind::Shooter => 1,
        }
    }

    pub fn speed_multiplier(&self, config: &GameConfig) -> f32 {
        match self {
            EnemyKind::Speeder => config.speeder_speed_multiplier,
            _ => 1.0,
        }
    }

    /// Body colour used by the renderer.
    pub fn color(&self) -> Color {
        match self {
            EnemyKind::Normal => Color::srgb(0.9, 0.2, 0.2),
            EnemyKind::Speeder => Color::srgb(1.0, 0.6, 0.1),
            EnemyKind::Tank => Color::srgb(0.5, 0.2, 0.6),
            EnemyKind::Exploder => Color::srgb(1.0, 0.9, 0.2),
            EnemyKind::Shooter => Color::srgb(0.2, 0.7, 0.9),
        }
    }
}

/// Live enemy state.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Base movement speed before the kind multiplier.
    pub speed: f32,
    pub health: i32,
    pub radius: f32,
}

/// Shooter attack timer.  Charges continuously and holds at full charge
/// until the target is in range, so a shooter fires the moment it can.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ShootTimer {
    pub elapsed: f32,
    /// Drives the sinusoidal strafe phase.
    pub strafe_phase: f32,
}

/// Death animation in progress; the entity ignores collisions and
/// despawns when the timer expires.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dying {
    pub remaining: f32,
}

/// Spawn one enemy of `kind` at `position` with the given base stats.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec2,
    radius: f32,
    speed: f32,
) -> Entity {
    let mut entity = commands.spawn((
        Enemy {
            kind,
            speed,
            health: kind.base_health(),
            radius,
        },
        Transform::from_translation(position.extend(0.5)),
        Visibility::default(),
    ));
    if kind == EnemyKind::Shooter {
        entity.insert(ShootTimer::default());
    }
    entity.id()
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Per-frame displacement for a chasing enemy.  Pure; shared by the
/// system and tests.
pub fn chase_step(position: Vec2, target: Vec2, speed: f32, dt: f32) -> Vec2 {
    let direction = (target - position).normalize_or_zero();
    position + direction * speed * dt
}

/// Per-frame displacement for a kiting shooter.
///
/// Inside the retreat band it backs away at 1.2x speed; outside the
/// approach band it closes at 0.8x; in between it strafes on a sinusoid
/// perpendicular to the player with a slight outward drift.
pub fn shooter_step(
    position: Vec2,
    target: Vec2,
    speed: f32,
    strafe_phase: f32,
    config: &GameConfig,
    dt: f32,
) -> Vec2 {
    let offset = position - target;
    let dist = offset.length();
    let away = offset.normalize_or_zero();

    let velocity = if dist < config.shooter_retreat_range {
        away * speed * 1.2
    } else if dist > config.shooter_approach_range {
        -away * speed * 0.8
    } else {
        let perpendicular = Vec2::new(-away.y, away.x);
        perpendicular * speed * strafe_phase.sin() + away * speed * 0.2
    };
    position + velocity * dt
}

/// Move every live enemy toward (or around) the player.
///
/// Dying enemies keep their final position.  All enemies are clamped to
/// the screen rectangle so kiting shooters cannot leave the view.
pub fn enemy_movement_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    area: Res<PlayArea>,
    player_q: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q: Query<(&Enemy, &mut Transform, Option<&mut ShootTimer>), Without<Dying>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let Ok(player_transform) = player_q.single() else {
        return;
    };
    let target = player_transform.translation.truncate();

    for (enemy, mut transform, shoot_timer) in q.iter_mut() {
        let position = transform.translation.truncate();
        let speed = enemy.speed * enemy.kind.speed_multiplier(&config);

        let next = match enemy.kind {
            EnemyKind::Shooter => {
                let phase = if let Some(mut timer) = shoot_timer {
                    timer.strafe_phase += dt * 2.0;
                    timer.strafe_phase
                } else {
                    0.0
                };
                shooter_step(position, target, speed, phase, &config, dt)
            }
            _ => chase_step(position, target, speed, dt),
        };

        let clamped = area.clamp_to_screen(next, enemy.radius);
        transform.translation = clamped.extend(transform.translation.z);
    }
}

// ── Shooter fire ──────────────────────────────────────────────────────────────

/// Fire an aimed shot from each shooter whose timer is charged and whose
/// target is inside the fire range.
///
/// The timer keeps charging while out of range and is only reset on an
/// actual shot, so re-entering range triggers an immediate attack.  A
/// small random jitter keeps long-range shots dodgeable.
pub fn shooter_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    player_q: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q: Query<(&Enemy, &Transform, &mut ShootTimer), Without<Dying>>,
    mut cues: MessageWriter<AudioCue>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let Ok(player_transform) = player_q.single() else {
        return;
    };
    let target = player_transform.translation.truncate();
    let mut rng = rand::thread_rng();

    for (_, transform, mut timer) in q.iter_mut() {
        timer.elapsed += dt;
        if timer.elapsed < config.shooter_fire_interval {
            continue;
        }

        let position = transform.translation.truncate();
        if position.distance(target) > config.shooter_fire_range {
            continue;
        }

        let aim = target - position;
        let jitter = rng.gen_range(-config.shooter_aim_jitter..=config.shooter_aim_jitter);
        let direction = Vec2::from_angle(jitter).rotate(aim);
        spawn_projectile(
            &mut commands,
            Faction::Enemy,
            position,
            direction,
            config.projectile_speed,
            ProjectileProps::from_config(&config),
        );
        cues.write(AudioCue::EnemyShot);
        timer.elapsed = 0.0;
    }
}

// ── Death animation ───────────────────────────────────────────────────────────

/// Shrink-and-fade timer for killed enemies; despawns on expiry.
pub fn enemy_death_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q: Query<(Entity, &mut Dying, &mut Transform)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (entity, mut dying, mut transform) in q.iter_mut() {
        let duration = config.death_animation_duration;
        dying.remaining -= dt;
        if dying.remaining <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            // Scale down linearly over the animation.
            let scale = (dying.remaining / duration).clamp(0.0, 1.0);
            transform.scale = Vec3::splat(scale);
        }
    }
}

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                enemy_movement_system,
                shooter_fire_system,
                enemy_death_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
