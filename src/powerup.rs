//! Power-ups: drops, lifetimes, and exclusive pickup.
//!
//! Destroyed enemies occasionally drop one of three power-ups.  Each
//! drop despawns on a timer if ignored.  Pickup is exclusive: touching
//! any power-up applies that one's effect and clears every other drop
//! from the field, so stacking cannot happen by walking through a pile.

use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::player::{DamageBoost, Player, PlayerLives, Shield};
use crate::session::GameState;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Double projectile damage for a few seconds.
    DamageBoost,
    /// Restore one life, up to the cap.
    Heal,
    /// Absorb the next hit within the shield window.
    Shield,
}

impl PowerUpKind {
    /// Uniform random kind for drops.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => PowerUpKind::DamageBoost,
            1 => PowerUpKind::Heal,
            _ => PowerUpKind::Shield,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::DamageBoost => Color::srgb(1.0, 0.4, 0.1),
            PowerUpKind::Heal => Color::srgb(0.2, 0.9, 0.3),
            PowerUpKind::Shield => Color::srgb(0.3, 0.5, 1.0),
        }
    }
}

/// A collectible drop sitting on the field.
#[derive(Component, Debug, Clone, Copy)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub remaining: f32,
    pub radius: f32,
}

/// Spawn a drop of `kind` where an enemy died.
pub fn spawn_powerup(
    commands: &mut Commands,
    kind: PowerUpKind,
    position: Vec2,
    config: &GameConfig,
) -> Entity {
    commands
        .spawn((
            PowerUp {
                kind,
                remaining: config.powerup_lifetime,
                radius: config.powerup_radius,
            },
            Transform::from_translation(position.extend(0.3)),
            Visibility::default(),
        ))
        .id()
}

/// Expire drops that sat uncollected past their lifetime.
pub fn powerup_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut PowerUp)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (entity, mut powerup) in q.iter_mut() {
        powerup.remaining -= dt;
        if powerup.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// Apply the chosen power-up's effect to the player.
pub fn apply_powerup(
    kind: PowerUpKind,
    commands: &mut Commands,
    player: Entity,
    lives: &mut PlayerLives,
    boost: &mut DamageBoost,
    config: &GameConfig,
) {
    match kind {
        PowerUpKind::DamageBoost => {
            boost.remaining = config.damage_boost_duration;
        }
        PowerUpKind::Heal => {
            lives.lives = (lives.lives + 1).min(config.player_lives_max);
        }
        PowerUpKind::Shield => {
            commands.entity(player).insert(Shield {
                remaining: config.shield_duration,
            });
        }
    }
}

/// Collect the first drop the player overlaps; clear the rest.
///
/// Only one effect applies per pickup even when several drops overlap
/// the ship on the same frame.
pub fn powerup_pickup_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut lives: ResMut<PlayerLives>,
    mut boost: ResMut<DamageBoost>,
    player_q: Query<(Entity, &Transform), With<Player>>,
    powerup_q: Query<(Entity, &PowerUp, &Transform)>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok((player, player_transform)) = player_q.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let mut collected: Option<PowerUpKind> = None;
    for (_, powerup, transform) in powerup_q.iter() {
        let dist = transform.translation.truncate().distance(player_pos);
        if dist <= powerup.radius + config.player_radius {
            collected = Some(powerup.kind);
            break;
        }
    }

    let Some(kind) = collected else {
        return;
    };

    apply_powerup(kind, &mut commands, player, &mut lives, &mut boost, &config);
    cues.write(AudioCue::PowerUpCollected);

    for (entity, _, _) in powerup_q.iter() {
        commands.entity(entity).despawn();
    }
}

pub struct PowerUpPlugin;

impl Plugin for PowerUpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (powerup_lifetime_system, powerup_pickup_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pickup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<AudioCue>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(PlayerLives::default());
        app.insert_resource(DamageBoost::default());
        app.add_systems(Update, powerup_pickup_system);
        app
    }

    #[test]
    fn random_kind_covers_all_three() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..100 {
            match PowerUpKind::random(&mut rng) {
                PowerUpKind::DamageBoost => seen[0] = true,
                PowerUpKind::Heal => seen[1] = true,
                PowerUpKind::Shield => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn overlapping_drops_yield_exactly_one_effect_and_clear_the_field() {
        let mut app = pickup_app();
        let config = GameConfig::default();
        app.world_mut().spawn((
            Player,
            Transform::from_translation(Vec3::ZERO),
        ));
        // Two heals stacked on the player plus one far away.
        for _ in 0..2 {
            app.world_mut().spawn((
                PowerUp {
                    kind: PowerUpKind::Heal,
                    remaining: config.powerup_lifetime,
                    radius: config.powerup_radius,
                },
                Transform::from_translation(Vec3::ZERO),
            ));
        }
        app.world_mut().spawn((
            PowerUp {
                kind: PowerUpKind::Shield,
                remaining: config.powerup_lifetime,
                radius: config.powerup_radius,
            },
            Transform::from_translation(Vec3::new(600.0, 0.0, 0.0)),
        ));

        app.update();

        // One heal applied, not two.
        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES + 1
        );
        // Every drop is gone, including the distant one.
        let mut q = app.world_mut().query::<&PowerUp>();
        assert_eq!(q.iter(app.world()).count(), 0);
    }

    #[test]
    fn heal_respects_the_lives_cap() {
        let mut app = pickup_app();
        let config = GameConfig::default();
        app.insert_resource(PlayerLives {
            lives: config.player_lives_max,
        });
        app.world_mut().spawn((
            Player,
            Transform::from_translation(Vec3::ZERO),
        ));
        app.world_mut().spawn((
            PowerUp {
                kind: PowerUpKind::Heal,
                remaining: config.powerup_lifetime,
                radius: config.powerup_radius,
            },
            Transform::from_translation(Vec3::ZERO),
        ));

        app.update();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            config.player_lives_max
        );
    }

    #[test]
    fn boost_pickup_arms_the_damage_timer() {
        let mut app = pickup_app();
        let config = GameConfig::default();
        app.world_mut().spawn((
            Player,
            Transform::from_translation(Vec3::ZERO),
        ));
        app.world_mut().spawn((
            PowerUp {
                kind: PowerUpKind::DamageBoost,
                remaining: config.powerup_lifetime,
                radius: config.powerup_radius,
            },
            Transform::from_translation(Vec3::ZERO),
        ));

        app.update();

        let boost = app.world().resource::<DamageBoost>();
        assert!(boost.is_active());
        assert_eq!(boost.remaining, config.damage_boost_duration);
    }

    #[test]
    fn distant_drop_is_not_collected() {
        let mut app = pickup_app();
        let config = GameConfig::default();
        app.world_mut().spawn((
            Player,
            Transform::from_translation(Vec3::ZERO),
        ));
        app.world_mut().spawn((
            PowerUp {
                kind: PowerUpKind::Heal,
                remaining: config.powerup_lifetime,
                radius: config.powerup_radius,
            },
            Transform::from_translation(Vec3::new(500.0, 0.0, 0.0)),
        ));

        app.update();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES
        );
        let mut q = app.world_mut().query::<&PowerUp>();
        assert_eq!(q.iter(app.world()).count(), 1);
    }
}
