//! Collision resolution.
//!
//! Three resolvers run as a fixed chain in `PostUpdate`, after all
//! movement has settled for the frame:
//!
//! 1. player projectiles against enemies and the boss,
//! 2. enemy projectiles against the player,
//! 3. enemy bodies against the player.
//!
//! The chain order is a gameplay rule: a shot that kills an enemy this
//! frame removes it before the contact resolver runs, so the player is
//! never hit by something they just destroyed.
//!
//! All collisions are circle-vs-circle distance checks.  Dying enemies
//! are excluded everywhere; they are scenery until their animation ends.

use crate::audio::AudioCue;
use crate::boss::{Boss, BossHit};
use crate::config::GameConfig;
use crate::enemy::{Dying, Enemy, EnemyKind};
use crate::player::{Invincibility, Player, PlayerLives, Shield};
use crate::powerup::{spawn_powerup, PowerUpKind};
use crate::projectile::{
    spawn_radial_burst, EnemyProjectile, Faction, PlayerProjectile, Projectile, ProjectileProps,
};
use crate::session::{GameState, Score};
use bevy::prelude::*;
use rand::Rng;

#[inline]
fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

// ── Resolver 1: player projectiles → enemies & boss ──────────────────────────

/// Resolve player shots against enemies and the boss.
///
/// A killing blow starts the target's death animation, awards score, and
/// may drop a power-up.  Exploders retaliate with a projectile ring the
/// moment they die.  Shots that reach the boss during a layer transition
/// are blocked and keep flying.
pub fn player_projectile_hit_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut score: ResMut<Score>,
    projectile_q: Query<(Entity, &Projectile, &Transform), With<PlayerProjectile>>,
    mut enemy_q: Query<(Entity, &mut Enemy, &Transform), Without<Dying>>,
    mut boss_q: Query<(&mut Boss, &Transform), Without<Enemy>>,
    mut cues: MessageWriter<AudioCue>,
) {
    let mut rng = rand::thread_rng();

    'projectiles: for (proj_entity, projectile, proj_transform) in projectile_q.iter() {
        let proj_pos = proj_transform.translation.truncate();

        for (enemy_entity, mut enemy, enemy_transform) in enemy_q.iter_mut() {
            // Killed earlier this frame; the Dying insert is still queued
            // in Commands, so the filter alone cannot exclude it yet.
            if enemy.health <= 0 {
                continue;
            }
            let enemy_pos = enemy_transform.translation.truncate();
            if !circles_overlap(proj_pos, projectile.radius, enemy_pos, enemy.radius) {
                continue;
            }

            commands.entity(proj_entity).despawn();
            enemy.health -= projectile.damage;
            if enemy.health > 0 {
                cues.write(AudioCue::EnemyHit);
                continue 'projectiles;
            }

            if enemy.kind == EnemyKind::Exploder {
                spawn_radial_burst(
                    &mut commands,
                    Faction::Enemy,
                    enemy_pos,
                    config.exploder_burst_count,
                    config.projectile_speed,
                    ProjectileProps::from_config(&config),
                );
            }
            commands.entity(enemy_entity).insert(Dying {
                remaining: config.death_animation_duration,
            });
            score.points += config.enemy_kill_score;
            score.kills += 1;
            cues.write(AudioCue::EnemyDown);

            if rng.gen_range(0..100) < config.powerup_drop_chance {
                let kind = PowerUpKind::random(&mut rng);
                spawn_powerup(&mut commands, kind, enemy_pos, &config);
            }
            continue 'projectiles;
        }

        if let Ok((mut boss, boss_transform)) = boss_q.single_mut() {
            let boss_pos = boss_transform.translation.truncate();
            if !circles_overlap(proj_pos, projectile.radius, boss_pos, boss.radius) {
                continue;
            }

            match boss.on_hit(projectile.damage, &config) {
                // Invulnerable: the shot keeps flying.
                BossHit::Blocked => {}
                BossHit::Absorbed => {
                    commands.entity(proj_entity).despawn();
                    cues.write(AudioCue::EnemyHit);
                }
                BossHit::LayerDown { award } => {
                    commands.entity(proj_entity).despawn();
                    score.points += award;
                    cues.write(AudioCue::BossLayerDown);
                }
                BossHit::Defeated { award } => {
                    commands.entity(proj_entity).despawn();
                    score.points += award;
                    score.kills += 1;
                }
            }
        }
    }
}

// ── Shared player damage path ─────────────────────────────────────────────────

/// Apply one hit to the player.  A shield absorbs the hit and breaks;
/// otherwise a life is lost, the grace window starts, and an empty life
/// pool ends the session.
#[allow(clippy::too_many_arguments)]
fn damage_player(
    commands: &mut Commands,
    player: Entity,
    shielded: bool,
    inv: &mut Invincibility,
    lives: &mut PlayerLives,
    config: &GameConfig,
    cues: &mut MessageWriter<AudioCue>,
    next_state: &mut NextState<GameState>,
) {
    if shielded {
        commands.entity(player).remove::<Shield>();
        cues.write(AudioCue::PlayerHit);
        return;
    }

    lives.lives -= 1;
    inv.trigger(config.invincibility_duration);
    cues.write(AudioCue::PlayerHit);

    if lives.lives <= 0 {
        next_state.set(GameState::GameOver);
    }
}

// ── Resolver 2: enemy projectiles → player ────────────────────────────────────

/// Resolve enemy shots against the player.
pub fn enemy_projectile_hit_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut lives: ResMut<PlayerLives>,
    mut next_state: ResMut<NextState<GameState>>,
    projectile_q: Query<(Entity, &Projectile, &Transform), With<EnemyProjectile>>,
    mut player_q: Query<(Entity, &Transform, &mut Invincibility, Option<&Shield>), With<Player>>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok((player, player_transform, mut inv, shield)) = player_q.single_mut() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (proj_entity, projectile, proj_transform) in projectile_q.iter() {
        let proj_pos = proj_transform.translation.truncate();
        if !circles_overlap(proj_pos, projectile.radius, player_pos, config.player_radius) {
            continue;
        }

        commands.entity(proj_entity).despawn();
        if inv.is_active() {
            continue;
        }
        damage_player(
            &mut commands,
            player,
            shield.is_some(),
            &mut inv,
            &mut lives,
            &config,
            &mut cues,
            &mut next_state,
        );
        // One hit per frame is enough; the grace window covers the rest.
        return;
    }
}

// ── Resolver 3: enemy contact → player ────────────────────────────────────────

/// Resolve body contact between enemies and the player.
///
/// The ramming enemy is destroyed outright, with no death animation and
/// no score award.
pub fn enemy_contact_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut lives: ResMut<PlayerLives>,
    mut next_state: ResMut<NextState<GameState>>,
    enemy_q: Query<(Entity, &Enemy, &Transform), Without<Dying>>,
    mut player_q: Query<(Entity, &Transform, &mut Invincibility, Option<&Shield>), With<Player>>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok((player, player_transform, mut inv, shield)) = player_q.single_mut() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (enemy_entity, enemy, enemy_transform) in enemy_q.iter() {
        let enemy_pos = enemy_transform.translation.truncate();
        if !circles_overlap(enemy_pos, enemy.radius, player_pos, config.player_radius) {
            continue;
        }

        commands.entity(enemy_entity).despawn();
        if inv.is_active() {
            continue;
        }
        damage_player(
            &mut commands,
            player,
            shield.is_some(),
            &mut inv,
            &mut lives,
            &config,
            &mut cues,
            &mut next_state,
        );
        return;
    }
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (
                player_projectile_hit_system,
                enemy_projectile_hit_system,
                enemy_contact_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::spawn_enemy;
    use crate::projectile::{spawn_projectile, ProjectileProps};
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;

    fn combat_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_message::<AudioCue>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(Score::default());
        app.insert_resource(PlayerLives::default());
        app
    }

    fn spawn_test_player(app: &mut App, position: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Invincibility::Inactive,
                Transform::from_translation(position.extend(1.0)),
            ))
            .id()
    }

    #[test]
    fn killing_shot_starts_death_animation_and_awards_score() {
        let mut app = combat_app();
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                // One-health target directly under the shot.
                spawn_enemy(&mut commands, EnemyKind::Speeder, Vec2::ZERO, 20.0, 150.0);
                spawn_projectile(
                    &mut commands,
                    Faction::Player,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();

        let score = app.world().resource::<Score>();
        assert_eq!(score.points, crate::constants::ENEMY_KILL_SCORE);
        assert_eq!(score.kills, 1);

        // Enemy lingers with a death timer; the projectile is gone.
        let mut dying_q = app.world_mut().query::<&Dying>();
        assert_eq!(dying_q.iter(app.world()).count(), 1);
        let mut proj_q = app.world_mut().query::<&Projectile>();
        assert_eq!(proj_q.iter(app.world()).count(), 0);
    }

    #[test]
    fn overlapping_shots_cannot_kill_the_same_enemy_twice() {
        let mut app = combat_app();
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                // One-health target with two shots inside its radius at
                // once, as when firing while retreating.
                spawn_enemy(&mut commands, EnemyKind::Speeder, Vec2::ZERO, 30.0, 150.0);
                for offset in [Vec2::ZERO, Vec2::new(20.0, 0.0)] {
                    spawn_projectile(
                        &mut commands,
                        Faction::Player,
                        offset,
                        Vec2::Y,
                        700.0,
                        ProjectileProps::default(),
                    );
                }
            })
            .unwrap();

        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();

        let score = app.world().resource::<Score>();
        assert_eq!(score.kills, 1);
        assert_eq!(score.points, crate::constants::ENEMY_KILL_SCORE);
        // The second shot flies on past the corpse.
        let mut q = app
            .world_mut()
            .query_filtered::<&Projectile, With<PlayerProjectile>>();
        assert_eq!(q.iter(app.world()).count(), 1);
    }

    #[test]
    fn death_timer_follows_the_configured_duration() {
        let mut app = combat_app();
        app.world_mut()
            .resource_mut::<GameConfig>()
            .death_animation_duration = 0.3;
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_enemy(&mut commands, EnemyKind::Speeder, Vec2::ZERO, 20.0, 150.0);
                spawn_projectile(
                    &mut commands,
                    Faction::Player,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();

        let mut dying_q = app.world_mut().query::<&Dying>();
        let dying = dying_q.single(app.world()).unwrap();
        assert_eq!(dying.remaining, 0.3);
    }

    #[test]
    fn exploder_death_spawns_a_retaliation_ring() {
        let mut app = combat_app();
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                let exploder =
                    spawn_enemy(&mut commands, EnemyKind::Exploder, Vec2::ZERO, 20.0, 150.0);
                let _ = exploder;
                spawn_projectile(
                    &mut commands,
                    Faction::Player,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps {
                        damage: EnemyKind::Exploder.base_health(),
                        ..Default::default()
                    },
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();

        let mut q = app
            .world_mut()
            .query_filtered::<&Projectile, With<EnemyProjectile>>();
        assert_eq!(
            q.iter(app.world()).count(),
            crate::constants::EXPLODER_BURST_COUNT
        );
    }

    #[test]
    fn blocked_boss_hit_leaves_the_projectile_in_flight() {
        let mut app = combat_app();
        let config = GameConfig::default();
        let mut boss = Boss::new(&config);
        boss.phase = crate::boss::BossPhase::Transitioning {
            next_layer: 3,
            remaining: 1.0,
        };
        app.world_mut()
            .spawn((boss, Transform::from_translation(Vec3::ZERO)));
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_projectile(
                    &mut commands,
                    Faction::Player,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();

        let mut q = app.world_mut().query::<&Projectile>();
        assert_eq!(q.iter(app.world()).count(), 1);
        assert_eq!(app.world().resource::<Score>().points, 0);
    }

    #[test]
    fn enemy_shot_costs_a_life_and_starts_the_grace_window() {
        let mut app = combat_app();
        spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_projectile(
                    &mut commands,
                    Faction::Enemy,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(enemy_projectile_hit_system)
            .unwrap();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES - 1
        );
        let mut q = app.world_mut().query_filtered::<&Invincibility, With<Player>>();
        assert!(q.single(app.world()).unwrap().is_active());
    }

    #[test]
    fn invincible_player_ignores_hits_but_consumes_the_shot() {
        let mut app = combat_app();
        let player = spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .entity_mut(player)
            .insert(Invincibility::Active {
                remaining: 2.0,
                blink_timer: 0.0,
                visible: true,
            });
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_projectile(
                    &mut commands,
                    Faction::Enemy,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(enemy_projectile_hit_system)
            .unwrap();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES
        );
        let mut q = app.world_mut().query::<&Projectile>();
        assert_eq!(q.iter(app.world()).count(), 0);
    }

    #[test]
    fn shield_absorbs_one_hit_without_losing_a_life() {
        let mut app = combat_app();
        let player = spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .entity_mut(player)
            .insert(Shield { remaining: 3.0 });
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_projectile(
                    &mut commands,
                    Faction::Enemy,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(enemy_projectile_hit_system)
            .unwrap();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES
        );
        assert!(app.world().entity(player).get::<Shield>().is_none());
    }

    #[test]
    fn ramming_enemy_is_destroyed_without_score() {
        let mut app = combat_app();
        spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_enemy(&mut commands, EnemyKind::Normal, Vec2::ZERO, 20.0, 150.0);
            })
            .unwrap();

        app.world_mut()
            .run_system_once(enemy_contact_system)
            .unwrap();

        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES - 1
        );
        assert_eq!(app.world().resource::<Score>().points, 0);
        let mut q = app.world_mut().query::<&Enemy>();
        assert_eq!(q.iter(app.world()).count(), 0);
    }

    #[test]
    fn last_life_ends_the_session() {
        let mut app = combat_app();
        app.insert_resource(PlayerLives { lives: 1 });
        spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                spawn_projectile(
                    &mut commands,
                    Faction::Enemy,
                    Vec2::ZERO,
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        app.world_mut()
            .run_system_once(enemy_projectile_hit_system)
            .unwrap();

        assert_eq!(app.world().resource::<PlayerLives>().lives, 0);
        let next = app.world().resource::<NextState<GameState>>();
        assert!(matches!(next, NextState::Pending(GameState::GameOver)));
    }

    #[test]
    fn kill_resolves_before_contact_in_the_same_frame() {
        let mut app = combat_app();
        spawn_test_player(&mut app, Vec2::ZERO);
        app.world_mut()
            .run_system_once(|mut commands: Commands| {
                // Enemy touching the player, and a shot that kills it.
                spawn_enemy(&mut commands, EnemyKind::Speeder, Vec2::new(10.0, 0.0), 20.0, 150.0);
                spawn_projectile(
                    &mut commands,
                    Faction::Player,
                    Vec2::new(10.0, 0.0),
                    Vec2::Y,
                    700.0,
                    ProjectileProps::default(),
                );
            })
            .unwrap();

        // Full resolver chain in order, as scheduled in PostUpdate.
        app.world_mut()
            .run_system_once(player_projectile_hit_system)
            .unwrap();
        app.world_mut()
            .run_system_once(enemy_contact_system)
            .unwrap();

        // The kill landed first: no life lost, score awarded.
        assert_eq!(
            app.world().resource::<PlayerLives>().lives,
            crate::constants::PLAYER_LIVES
        );
        assert_eq!(
            app.world().resource::<Score>().points,
            crate::constants::ENEMY_KILL_SCORE
        );
    }
}
