//! The layered boss: a four-layer shell, each with its own movement and
//! attack pattern, peeled off one at a time.
//!
//! Phase logic is an explicit state machine ([`BossPhase`]): the boss is
//! either fighting on a layer, pausing invulnerably between layers, or
//! defeated.  Damage is routed through [`Boss::on_hit`], which returns a
//! [`BossHit`] describing what the shot did so the collision resolvers
//! can award score and emit cues without re-deriving phase rules.
//!
//! Layer behaviours (outermost first):
//! - **Layer 4**: slow direct pursuit, single aimed shot.
//! - **Layer 3**: wobbling pursuit, 8-way radial burst.
//! - **Layer 2**: fast pursuit, 3-shot fan; below half health it may
//!   blink most of the way to the player and fire a 12-way burst
//!   instead.
//! - **Layer 1**: feints toward shifting points near the player, tight
//!   5-shot cone, and a dash attack that ends in a 16-way burst.
//!
//! Radial bursts are ricochet-capable; aimed shots and fans are not.

use crate::arena::PlayArea;
use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::player::Player;
use crate::projectile::{spawn_projectile, spawn_radial_burst, Faction, ProjectileProps, Ricochet};
use crate::session::GameState;
use bevy::prelude::*;
use rand::Rng;

/// Outcome of a player projectile hitting the boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossHit {
    /// Damage applied; the current layer survives.
    Absorbed,
    /// The boss is invulnerable (between layers or already defeated);
    /// the projectile passes through unspent.
    Blocked,
    /// The current layer broke; `award` is the score for peeling it.
    LayerDown { award: u64 },
    /// The final layer broke; `award` is the score for the kill.
    Defeated { award: u64 },
}

/// Which stage of the fight the boss is in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPhase {
    /// Fighting on layer `n` (4 = outermost, 1 = core).
    Layer(u8),
    /// Invulnerable pause before `next_layer` activates.
    Transitioning { next_layer: u8, remaining: f32 },
    Defeated,
}

/// Dash attack state used by the core layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossDash {
    Ready,
    Dashing { direction: Vec2, remaining: f32 },
    Cooldown { remaining: f32 },
}

/// The boss entity's full combat state.
#[derive(Component, Debug, Clone)]
pub struct Boss {
    pub phase: BossPhase,
    pub dash: BossDash,
    pub radius: f32,
    pub layer_health: i32,
    pub max_layer_health: i32,
    /// Seconds accumulated toward the next attack.
    pub attack_timer: f32,
    /// Feint destination used by the core layer's movement.
    pub target_position: Vec2,
}

/// Hit points for each layer (outer layers are thinner).
pub fn layer_health_for(layer: u8) -> i32 {
    match layer {
        4 => 50,
        3 => 100,
        2 => 150,
        _ => 250,
    }
}

/// Score awarded for breaking each layer.
pub fn layer_award(layer: u8) -> u64 {
    match layer {
        4 => 1000,
        3 => 2000,
        2 => 3000,
        _ => 4000,
    }
}

/// Attack cadence per layer, seconds.
pub fn attack_interval(layer: u8) -> f32 {
    match layer {
        4 => 3.0,
        3 => 2.0,
        2 => 1.0,
        _ => 0.5,
    }
}

impl Boss {
    /// A fresh boss on the outermost layer at `position`.
    pub fn new(config: &GameConfig) -> Self {
        let health = layer_health_for(4);
        Self {
            phase: BossPhase::Layer(4),
            dash: BossDash::Ready,
            radius: config.boss_radius,
            layer_health: health,
            max_layer_health: health,
            attack_timer: 0.0,
            target_position: Vec2::ZERO,
        }
    }

    /// Apply `damage` from a player projectile and report the result.
    ///
    /// Transitions and the defeated state block all damage.  When a
    /// layer's health is exhausted the phase advances; entering a new
    /// layer goes through the invulnerable transition pause.
    pub fn on_hit(&mut self, damage: i32, config: &GameConfig) -> BossHit {
        let layer = match self.phase {
            BossPhase::Layer(n) => n,
            BossPhase::Transitioning { .. } | BossPhase::Defeated => return BossHit::Blocked,
        };

        self.layer_health -= damage;
        if self.layer_health > 0 {
            return BossHit::Absorbed;
        }

        let award = layer_award(layer);
        if layer == 1 {
            self.phase = BossPhase::Defeated;
            BossHit::Defeated { award }
        } else {
            self.phase = BossPhase::Transitioning {
                next_layer: layer - 1,
                remaining: config.boss_transition_duration,
            };
            BossHit::LayerDown { award }
        }
    }

    /// Advance a transition pause; returns the newly active layer when
    /// the pause expires.
    pub fn tick_transition(&mut self, dt: f32) -> Option<u8> {
        if let BossPhase::Transitioning {
            next_layer,
            remaining,
        } = self.phase
        {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.phase = BossPhase::Layer(next_layer);
                self.layer_health = layer_health_for(next_layer);
                self.max_layer_health = self.layer_health;
                self.attack_timer = 0.0;
                if next_layer == 1 {
                    self.dash = BossDash::Ready;
                }
                return Some(next_layer);
            }
            self.phase = BossPhase::Transitioning {
                next_layer,
                remaining,
            };
        }
        None
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Per-layer movement step.  Pure apart from the injected RNG, so layer
/// behaviours are testable with a seeded generator.
pub fn boss_move_step<R: Rng>(
    boss: &mut Boss,
    position: Vec2,
    player_pos: Vec2,
    config: &GameConfig,
    rng: &mut R,
    dt: f32,
) -> Vec2 {
    if let BossDash::Dashing { direction, .. } = boss.dash {
        return position + direction * config.boss_dash_speed * dt;
    }

    let layer = match boss.phase {
        BossPhase::Layer(n) => n,
        // Holds position between layers.
        _ => return position,
    };

    let toward_player = (player_pos - position).normalize_or_zero();
    let velocity = match layer {
        4 => toward_player * config.boss_base_speed * 0.5,
        3 => {
            // Wobble: random perpendicular jitter layered on pursuit.
            let perpendicular = Vec2::new(-toward_player.y, toward_player.x);
            let wobble = rng.gen_range(-1.0..=1.0_f32);
            (toward_player + perpendicular * wobble * 0.5).normalize_or_zero()
                * config.boss_base_speed
                * 0.7
        }
        2 => toward_player * config.boss_base_speed * 0.9,
        _ => {
            // Core layer feints: occasionally pick a new point near the
            // player, then home in on it at high speed.
            if rng.gen_range(0..100) < 2 {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let dist = rng.gen_range(100.0..300.0_f32);
                boss.target_position = player_pos + Vec2::from_angle(angle) * dist;
            }
            (boss.target_position - position).normalize_or_zero() * config.boss_base_speed * 1.2
        }
    };
    position + velocity * dt
}

/// Clamp the boss back inside the arena circle with a small pushback
/// margin, so a dash cannot carry it through the boundary.
pub fn clamp_boss_position(position: Vec2, boss_radius: f32, area: &PlayArea, margin: f32) -> Vec2 {
    area.clamp_inside(position, boss_radius + margin)
}

// ── Attacks ───────────────────────────────────────────────────────────────────

fn ricochet_props(config: &GameConfig) -> ProjectileProps {
    ProjectileProps {
        ricochet: Ricochet::Bounces(config.ricochet_bounces),
        ..ProjectileProps::from_config(config)
    }
}

/// Fire a symmetric fan of `count` shots around `aim`, spread over
/// `half_angle` radians to each side.
fn spawn_fan(
    commands: &mut Commands,
    position: Vec2,
    aim: Vec2,
    count: usize,
    half_angle: f32,
    speed: f32,
    props: ProjectileProps,
) {
    for i in 0..count {
        let t = if count == 1 {
            0.0
        } else {
            i as f32 / (count - 1) as f32 * 2.0 - 1.0
        };
        let direction = Vec2::from_angle(t * half_angle).rotate(aim);
        spawn_projectile(commands, Faction::Enemy, position, direction, speed, props);
    }
}

/// Execute one attack for the given layer.  Returns the boss's new
/// position (layer 2's desperation teleport moves it).
fn boss_attack<R: Rng>(
    commands: &mut Commands,
    boss: &Boss,
    layer: u8,
    position: Vec2,
    player_pos: Vec2,
    config: &GameConfig,
    rng: &mut R,
) -> Vec2 {
    let aim = player_pos - position;
    match layer {
        4 => {
            spawn_projectile(
                commands,
                Faction::Enemy,
                position,
                aim,
                config.projectile_speed,
                ProjectileProps::from_config(config),
            );
            position
        }
        3 => {
            spawn_radial_burst(
                commands,
                Faction::Enemy,
                position,
                8,
                config.projectile_speed,
                ricochet_props(config),
            );
            position
        }
        2 => {
            // Desperation move below half health: blink most of the way
            // to the player and punish with a wide burst.
            if boss.layer_health < boss.max_layer_health / 2 && rng.gen_range(0..100) < 20 {
                let teleport = position + (player_pos - position) * 0.7;
                spawn_radial_burst(
                    commands,
                    Faction::Enemy,
                    teleport,
                    12,
                    config.projectile_speed,
                    ricochet_props(config),
                );
                teleport
            } else {
                spawn_fan(
                    commands,
                    position,
                    aim,
                    3,
                    std::f32::consts::FRAC_PI_4,
                    config.projectile_speed,
                    ProjectileProps::from_config(config),
                );
                position
            }
        }
        _ => {
            // 5 shots, 15 degrees apart, centred on the player.
            spawn_fan(
                commands,
                position,
                aim,
                5,
                30.0_f32.to_radians(),
                config.projectile_speed,
                ProjectileProps::from_config(config),
            );
            position
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn the boss at the top of the arena.
pub fn spawn_boss(commands: &mut Commands, area: &PlayArea, config: &GameConfig) -> Entity {
    let position = area.boundary_point(std::f32::consts::FRAC_PI_2) * 0.8;
    commands
        .spawn((
            Boss::new(config),
            Transform::from_translation(position.extend(0.6)),
            Visibility::default(),
        ))
        .id()
}

// ── Per-frame update ──────────────────────────────────────────────────────────

/// Drive the boss for one frame: transition pauses, movement, the dash
/// state machine, and attack timers.
pub fn boss_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    area: Res<PlayArea>,
    player_q: Query<&Transform, (With<Player>, Without<Boss>)>,
    mut q: Query<(&mut Boss, &mut Transform), Without<Player>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let Ok((mut boss, mut transform)) = q.single_mut() else {
        return;
    };
    let Ok(player_transform) = player_q.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();
    let mut position = transform.translation.truncate();
    let mut rng = rand::thread_rng();

    // Transition pause: no movement or attacks, then a rim-clearing
    // burst announces the freshly exposed layer.
    if let Some(new_layer) = boss.tick_transition(dt) {
        let count = if new_layer == 1 { 12 } else { 8 };
        spawn_radial_burst(
            &mut commands,
            Faction::Enemy,
            position,
            count,
            config.projectile_speed,
            ricochet_props(&config),
        );
    }
    if matches!(boss.phase, BossPhase::Transitioning { .. } | BossPhase::Defeated) {
        return;
    }

    // Dash state machine (core layer only initiates; ticking is common).
    boss.dash = match boss.dash {
        BossDash::Ready => {
            let dist = position.distance(player_pos);
            if matches!(boss.phase, BossPhase::Layer(1)) && dist > 200.0 && dist < 500.0 {
                BossDash::Dashing {
                    direction: (player_pos - position).normalize_or_zero(),
                    remaining: config.boss_dash_duration,
                }
            } else {
                BossDash::Ready
            }
        }
        BossDash::Dashing {
            direction,
            remaining,
        } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                spawn_radial_burst(
                    &mut commands,
                    Faction::Enemy,
                    position,
                    16,
                    config.projectile_speed,
                    ricochet_props(&config),
                );
                BossDash::Cooldown {
                    remaining: config.boss_dash_cooldown,
                }
            } else {
                BossDash::Dashing {
                    direction,
                    remaining,
                }
            }
        }
        BossDash::Cooldown { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                BossDash::Ready
            } else {
                BossDash::Cooldown { remaining }
            }
        }
    };

    position = boss_move_step(&mut boss, position, player_pos, &config, &mut rng, dt);
    position = clamp_boss_position(position, boss.radius, &area, config.boss_clamp_margin);

    // Attack cadence follows the active layer.
    if let BossPhase::Layer(layer) = boss.phase {
        boss.attack_timer += dt;
        if boss.attack_timer >= attack_interval(layer) {
            boss.attack_timer = 0.0;
            position = boss_attack(
                &mut commands,
                &boss,
                layer,
                position,
                player_pos,
                &config,
                &mut rng,
            );
            position = clamp_boss_position(position, boss.radius, &area, config.boss_clamp_margin);
        }
    }

    transform.translation = position.extend(transform.translation.z);
}

/// Despawn the boss and emit the defeat cue once its phase reaches
/// `Defeated`.  Kept separate from the collision resolvers so the award
/// and the despawn happen exactly once.
pub fn boss_defeat_system(
    mut commands: Commands,
    q: Query<(Entity, &Boss)>,
    mut cues: MessageWriter<AudioCue>,
) {
    for (entity, boss) in q.iter() {
        if boss.phase == BossPhase::Defeated {
            cues.write(AudioCue::BossDefeated);
            commands.entity(entity).despawn();
        }
    }
}

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (boss_update_system, boss_defeat_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
