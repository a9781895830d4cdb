//! Projectiles: spawning, integration, boundary ricochet, despawn.
//!
//! Player-fired and enemy-fired projectiles are distinct collections,
//! separated by the [`PlayerProjectile`] / [`EnemyProjectile`] marker
//! components, because their collision rules differ (player shots damage
//! enemies and the boss; enemy shots damage the player).
//!
//! Ricochet-capable projectiles reflect off the circular play-area
//! boundary a bounded number of times (`v' = v − 2(v·n)n` about the
//! boundary normal) before flying out like any other shot.  Every
//! projectile despawns once its bounding circle leaves the screen rect.

use crate::arena::PlayArea;
use crate::config::GameConfig;
use crate::constants::{PROJECTILE_DAMAGE, PROJECTILE_RADIUS};
use crate::session::GameState;
use bevy::prelude::*;

/// Remaining boundary-reflection budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ricochet {
    /// Ordinary shot; despawns at the screen edge.
    None,
    /// May reflect off the circular boundary this many more times.
    Bounces(u8),
}

/// Which side fired a projectile; selects the marker component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

/// Per-projectile state attached to each fired round.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    /// World-space velocity, already scaled by the projectile speed.
    pub velocity: Vec2,
    pub radius: f32,
    pub damage: i32,
    pub ricochet: Ricochet,
}

/// Marker: projectile fired by the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerProjectile;

/// Marker: projectile fired by an enemy or the boss.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyProjectile;

/// Optional spawn overrides; `..Default::default()` covers the common case.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileProps {
    pub radius: f32,
    pub damage: i32,
    pub ricochet: Ricochet,
}

impl Default for ProjectileProps {
    fn default() -> Self {
        Self {
            radius: PROJECTILE_RADIUS,
            damage: PROJECTILE_DAMAGE,
            ricochet: Ricochet::None,
        }
    }
}

impl ProjectileProps {
    /// Baseline props from the runtime config, so TOML overrides of the
    /// projectile tuning reach every spawn path.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            radius: config.projectile_radius,
            damage: config.projectile_damage,
            ricochet: Ricochet::None,
        }
    }
}

/// Normalize a requested fire direction, substituting straight up for
/// degenerate zero-length input rather than producing a NaN velocity.
#[inline]
pub fn sanitize_direction(direction: Vec2) -> Vec2 {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::Y
    } else {
        dir
    }
}

/// Spawn one projectile travelling from `position` along `direction`.
///
/// The direction is normalized before being scaled by `speed`; a zero
/// vector falls back to straight up.  O(1).
pub fn spawn_projectile(
    commands: &mut Commands,
    faction: Faction,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    props: ProjectileProps,
) -> Entity {
    let velocity = sanitize_direction(direction) * speed;
    let projectile = Projectile {
        velocity,
        radius: props.radius,
        damage: props.damage,
        ricochet: props.ricochet,
    };
    let mut entity = commands.spawn((
        projectile,
        Transform::from_translation(position.extend(0.2)),
        Visibility::default(),
    ));
    match faction {
        Faction::Player => entity.insert(PlayerProjectile),
        Faction::Enemy => entity.insert(EnemyProjectile),
    };
    entity.id()
}

/// Spawn `count` projectiles in an evenly spaced ring around `center`.
///
/// Used by the exploder death burst and every boss radial attack.
pub fn spawn_radial_burst(
    commands: &mut Commands,
    faction: Faction,
    center: Vec2,
    count: usize,
    speed: f32,
    props: ProjectileProps,
) {
    for i in 0..count {
        let angle = i as f32 * (std::f32::consts::TAU / count as f32);
        let dir = Vec2::new(angle.cos(), angle.sin());
        spawn_projectile(commands, faction, center, dir, speed, props);
    }
}

/// Integrate one projectile by `dt`, applying boundary ricochet.
///
/// Returns `true` when the projectile should be despawned (its bounding
/// circle left the screen rect).  Factored out of the system so the
/// kinematics are testable without an ECS world.
pub fn step_projectile(
    position: &mut Vec2,
    projectile: &mut Projectile,
    area: &PlayArea,
    inset: f32,
    dt: f32,
) -> bool {
    *position += projectile.velocity * dt;

    if let Ricochet::Bounces(left) = projectile.ricochet {
        let offset = *position - area.center;
        let limit = area.radius - projectile.radius;
        if offset.length() >= limit {
            // Reflect about the boundary normal; magnitude is preserved.
            let normal = offset.normalize_or_zero();
            let v = projectile.velocity;
            projectile.velocity = v - 2.0 * v.dot(normal) * normal;
            // Pull back inside so the shot cannot stick to the boundary.
            *position = area.center + normal * (limit - inset);
            projectile.ricochet = match left {
                0 | 1 => Ricochet::None,
                n => Ricochet::Bounces(n - 1),
            };
        }
    }

    area.fully_off_screen(*position, projectile.radius)
}

/// Advance every projectile; despawn the ones that left the screen.
///
/// Runs for both factions in one pass; removal is O(1) per entity.
pub fn projectile_advance_system(
    mut commands: Commands,
    time: Res<Time>,
    area: Res<PlayArea>,
    config: Res<GameConfig>,
    mut q: Query<(Entity, &mut Transform, &mut Projectile)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut transform, mut projectile) in q.iter_mut() {
        let mut position = transform.translation.truncate();
        let expired = step_projectile(
            &mut position,
            &mut projectile,
            &area,
            config.ricochet_inset,
            dt,
        );
        transform.translation = position.extend(transform.translation.z);
        if expired {
            commands.entity(entity).despawn();
        }
    }
}

/// Despawn every live projectile; used on session reset.
pub fn clear_projectiles(commands: &mut Commands, q: &Query<Entity, With<Projectile>>) {
    for entity in q.iter() {
        commands.entity(entity).despawn();
    }
}

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            projectile_advance_system.run_if(in_state(GameState::Playing)),
        );
    }
}
