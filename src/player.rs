//! The player ship: spawning, movement, dash, invincibility, firing.
//!
//! Post-hit grace and the dash are modelled as explicit state machines
//! ([`Invincibility`], [`DashState`]) rather than boolean flags plus
//! timers, so each system matches on the one state it cares about and
//! illegal combinations (dashing while cooling down, blinking while
//! vulnerable) cannot be represented.

use crate::arena::PlayArea;
use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::input::PlayerIntent;
use crate::projectile::{spawn_projectile, Faction, ProjectileProps};
use crate::session::GameState;
use bevy::prelude::*;

/// Marker component for the player ship.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Post-hit grace state.  While `Active`, collision resolvers skip the
/// player and the ship blinks at a fixed cadence.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Invincibility {
    Inactive,
    Active {
        remaining: f32,
        blink_timer: f32,
        visible: bool,
    },
}

impl Invincibility {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Invincibility::Active { .. })
    }

    /// Enter the grace window at full duration.
    pub fn trigger(&mut self, duration: f32) {
        *self = Invincibility::Active {
            remaining: duration,
            blink_timer: 0.0,
            visible: true,
        };
    }
}

/// Dash state machine: a short burst of speed, then a cooldown before
/// the next one.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum DashState {
    Ready,
    Dashing { direction: Vec2, remaining: f32 },
    Cooldown { remaining: f32 },
}

/// Temporary damage-absorbing barrier granted by a power-up.  Removed
/// when the timer expires or after it absorbs one hit.
#[derive(Component, Debug, Clone, Copy)]
pub struct Shield {
    pub remaining: f32,
}

/// Doubles player projectile damage while `remaining > 0`.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DamageBoost {
    pub remaining: f32,
}

impl DamageBoost {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Time until the player may fire again.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FireCooldown {
    pub remaining: f32,
}

/// Remaining lives; the session ends when this reaches zero.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerLives {
    pub lives: i32,
}

impl Default for PlayerLives {
    fn default() -> Self {
        Self {
            lives: crate::constants::PLAYER_LIVES,
        }
    }
}

/// Spawn the player ship at the arena centre in its default state.
pub fn spawn_player(commands: &mut Commands) -> Entity {
    commands
        .spawn((
            Player,
            Invincibility::Inactive,
            DashState::Ready,
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
            Visibility::default(),
        ))
        .id()
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Move the ship from [`PlayerIntent`], honouring the dash state.
///
/// Normal movement is `move_axes` (normalized) at the configured speed.
/// A dash request flips `Ready → Dashing` along the current movement
/// direction (or the last aim, falling back to +Y) and overrides the
/// velocity until the burst expires.  The final position is clamped to
/// the circular play area.
pub fn player_movement_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    area: Res<PlayArea>,
    mut q: Query<(&mut Transform, &mut DashState), With<Player>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let Ok((mut transform, mut dash)) = q.single_mut() else {
        return;
    };

    let axes = intent.move_axes.normalize_or_zero();

    if intent.dash {
        if let DashState::Ready = *dash {
            let direction = if axes != Vec2::ZERO { axes } else { Vec2::Y };
            *dash = DashState::Dashing {
                direction,
                remaining: config.dash_duration,
            };
        }
    }

    let velocity = match *dash {
        DashState::Dashing { direction, .. } => direction * config.dash_speed,
        _ => axes * config.player_speed,
    };

    let position = transform.translation.truncate() + velocity * dt;
    let clamped = area.clamp_inside(position, config.player_radius);
    transform.translation = clamped.extend(transform.translation.z);
}

/// Advance the dash state machine: `Dashing → Cooldown → Ready`.
pub fn dash_tick_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q: Query<&mut DashState, With<Player>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for mut dash in q.iter_mut() {
        *dash = match *dash {
            DashState::Ready => DashState::Ready,
            DashState::Dashing {
                direction,
                remaining,
            } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    DashState::Cooldown {
                        remaining: config.dash_cooldown,
                    }
                } else {
                    DashState::Dashing {
                        direction,
                        remaining,
                    }
                }
            }
            DashState::Cooldown { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    DashState::Ready
                } else {
                    DashState::Cooldown { remaining }
                }
            }
        };
    }
}

// ── Invincibility ─────────────────────────────────────────────────────────────

/// Count down the grace window and blink the ship while it lasts.
///
/// On expiry the state returns to `Inactive` and visibility is restored,
/// whatever phase the blink was in.
pub fn invincibility_tick_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q: Query<(&mut Invincibility, &mut Visibility), With<Player>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (mut inv, mut visibility) in q.iter_mut() {
        if let Invincibility::Active {
            remaining,
            blink_timer,
            visible,
        } = *inv
        {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                *inv = Invincibility::Inactive;
                *visibility = Visibility::Inherited;
                continue;
            }

            let mut blink_timer = blink_timer + dt;
            let mut visible = visible;
            if blink_timer >= config.blink_interval {
                blink_timer = 0.0;
                visible = !visible;
                *visibility = if visible {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
            }
            *inv = Invincibility::Active {
                remaining,
                blink_timer,
                visible,
            };
        }
    }
}

/// Count down an active shield and remove it on expiry.
pub fn shield_tick_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Shield)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (entity, mut shield) in q.iter_mut() {
        shield.remaining -= dt;
        if shield.remaining <= 0.0 {
            commands.entity(entity).remove::<Shield>();
        }
    }
}

/// Count down the damage-boost timer.
pub fn damage_boost_tick_system(time: Res<Time>, mut boost: ResMut<DamageBoost>) {
    if boost.remaining > 0.0 {
        boost.remaining = (boost.remaining - time.delta_secs()).max(0.0);
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire a projectile toward the aim direction while the cooldown allows.
///
/// Damage is doubled while a boost is active; the boost affects shots
/// fired during its window, not shots already in flight.
pub fn player_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    boost: Res<DamageBoost>,
    mut cooldown: ResMut<FireCooldown>,
    mut cues: MessageWriter<AudioCue>,
    q: Query<&Transform, With<Player>>,
) {
    cooldown.remaining = (cooldown.remaining - time.delta_secs()).max(0.0);

    let Some(direction) = intent.fire else {
        return;
    };
    if cooldown.remaining > 0.0 {
        return;
    }
    let Ok(transform) = q.single() else {
        return;
    };

    let damage = if boost.is_active() {
        config.projectile_damage * 2
    } else {
        config.projectile_damage
    };
    spawn_projectile(
        &mut commands,
        Faction::Player,
        transform.translation.truncate(),
        direction,
        config.projectile_speed,
        ProjectileProps {
            damage,
            ..ProjectileProps::from_config(&config)
        },
    );
    cues.write(AudioCue::PlayerShot);
    cooldown.remaining = config.fire_cooldown;
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DamageBoost::default())
            .insert_resource(FireCooldown::default())
            .insert_resource(PlayerLives::default())
            .add_systems(
                Update,
                (
                    player_movement_system,
                    dash_tick_system,
                    invincibility_tick_system,
                    shield_tick_system,
                    damage_boost_tick_system,
                    player_fire_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
