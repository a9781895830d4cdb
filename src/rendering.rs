//! Mesh2d-based rendering and the in-game HUD.
//!
//! Every combat entity automatically receives a GPU-efficient filled
//! polygon mesh shortly after spawning, via `Added<T>` attach systems.
//! Mesh geometry is uploaded once at spawn and lives on the GPU until
//! the entity despawns; Bevy batches compatible `Mesh2d` +
//! `ColorMaterial` draw calls, which keeps bullet-hell projectile counts
//! cheap.
//!
//! The circular play-area boundary is the one immediate-mode element: a
//! per-frame gizmo circle, since its radius changes while pulsing.

use crate::arena::PlayArea;
use crate::boss::{Boss, BossPhase};
use crate::enemy::Enemy;
use crate::graphics::GameFont;
use crate::player::{Player, PlayerLives};
use crate::powerup::PowerUp;
use crate::projectile::{EnemyProjectile, PlayerProjectile, Projectile};
use crate::session::{GameState, Score};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Fan-triangulate a convex polygon into a renderable [`Mesh`].
///
/// Triangle fan from vertex 0: triangles `(0, i, i+1)` for `i ∈ 1..n-2`.
pub fn filled_polygon_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    debug_assert!(n >= 3, "polygon must have ≥ 3 vertices");

    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| [v.x, v.y, 0.0]).collect();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    let uvs: Vec<[f32; 2]> = vertices
        .iter()
        .map(|v| [(v.x / 100.0) + 0.5, (v.y / 100.0) + 0.5])
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity((n - 2) * 3);
    for i in 1..(n as u32 - 1) {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Vertices of a regular `sides`-gon of the given radius.
pub fn regular_polygon(radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / sides as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Attach the ship mesh to a freshly spawned player: a triangle pointing
/// along local +Y.
pub fn attach_player_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for entity in query.iter() {
        let r = crate::constants::PLAYER_RADIUS;
        let hull = vec![
            Vec2::new(0.0, r * 1.3),
            Vec2::new(-r, -r),
            Vec2::new(r, -r),
        ];
        commands.entity(entity).insert((
            Mesh2d(meshes.add(filled_polygon_mesh(&hull))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.85, 0.9, 1.0)))),
        ));
    }
}

/// Attach a filled polygon to every newly spawned enemy, coloured and
/// sized by its kind and body radius.
pub fn attach_enemy_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Enemy), Added<Enemy>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, enemy) in query.iter() {
        let hull = regular_polygon(enemy.radius, 6);
        commands.entity(entity).insert((
            Mesh2d(meshes.add(filled_polygon_mesh(&hull))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(enemy.kind.color()))),
        ));
    }
}

/// Attach a small disc to every newly spawned projectile, tinted by
/// faction.
pub fn attach_projectile_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Projectile, Option<&PlayerProjectile>), Added<Projectile>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, projectile, player_owned) in query.iter() {
        let color = if player_owned.is_some() {
            Color::srgb(0.7, 1.0, 0.7)
        } else {
            Color::srgb(1.0, 0.5, 0.5)
        };
        let hull = regular_polygon(projectile.radius, 8);
        commands.entity(entity).insert((
            Mesh2d(meshes.add(filled_polygon_mesh(&hull))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
        ));
    }
}

/// Attach a diamond to every newly spawned power-up.
pub fn attach_powerup_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &PowerUp), Added<PowerUp>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, powerup) in query.iter() {
        let hull = regular_polygon(powerup.radius, 4);
        commands.entity(entity).insert((
            Mesh2d(meshes.add(filled_polygon_mesh(&hull))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(powerup.kind.color()))),
        ));
    }
}

/// Colour per boss layer, outermost first.
fn boss_layer_color(layer: u8) -> Color {
    match layer {
        4 => Color::srgb(0.6, 0.1, 0.7),
        3 => Color::srgb(0.8, 0.2, 0.5),
        2 => Color::srgb(0.9, 0.4, 0.2),
        _ => Color::srgb(1.0, 0.8, 0.1),
    }
}

/// Attach the boss hull mesh at spawn.
pub fn attach_boss_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Boss), Added<Boss>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, boss) in query.iter() {
        let hull = regular_polygon(boss.radius, 10);
        commands.entity(entity).insert((
            Mesh2d(meshes.add(filled_polygon_mesh(&hull))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(boss_layer_color(4)))),
        ));
    }
}

/// Retint the boss hull whenever a new layer becomes active.
pub fn boss_layer_tint_system(
    query: Query<(&Boss, &MeshMaterial2d<ColorMaterial>), Changed<Boss>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (boss, material) in query.iter() {
        if let BossPhase::Layer(layer) = boss.phase {
            if let Some(material) = materials.get_mut(&material.0) {
                material.color = boss_layer_color(layer);
            }
        }
    }
}

/// Draw the circular play-area boundary.
pub fn arena_boundary_gizmo_system(mut gizmos: Gizmos, area: Res<PlayArea>) {
    gizmos.circle_2d(area.center, area.radius, Color::srgb(0.3, 0.35, 0.5));
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct HudScoreText;

#[derive(Component)]
pub struct HudLivesText;

/// Spawn the score and lives readouts in the top corners.
pub fn setup_hud(mut commands: Commands, font: Res<GameFont>) {
    commands.spawn((
        HudScoreText,
        Text::new("SCORE 0"),
        TextFont {
            font: font.0.clone(),
            font_size: 28.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..Default::default()
        },
    ));
    commands.spawn((
        HudLivesText,
        Text::new("LIVES 3"),
        TextFont {
            font: font.0.clone(),
            font_size: 28.0,
            ..Default::default()
        },
        TextColor(Color::srgb(1.0, 0.5, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(16.0),
            ..Default::default()
        },
    ));
    eprintln!("[SETUP] HUD spawned");
}

/// Refresh the score readout when the score changes.
pub fn hud_score_system(score: Res<Score>, mut q: Query<&mut Text, With<HudScoreText>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in q.iter_mut() {
        text.0 = format!("SCORE {}", score.points);
    }
}

/// Refresh the lives readout when the pool changes.
pub fn hud_lives_system(lives: Res<PlayerLives>, mut q: Query<&mut Text, With<HudLivesText>>) {
    if !lives.is_changed() {
        return;
    }
    for mut text in q.iter_mut() {
        text.0 = format!("LIVES {}", lives.lives);
    }
}

// ── State overlays ────────────────────────────────────────────────────────────

/// Marker for full-screen overlay text, despawned on state exit.
#[derive(Component)]
pub struct StateOverlay;

fn overlay_text(font: &GameFont, text: &str, size: f32, top: f32) -> impl Bundle {
    (
        StateOverlay,
        Text::new(text),
        TextFont {
            font: font.0.clone(),
            font_size: size,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(top),
            left: Val::Percent(10.0),
            right: Val::Percent(10.0),
            justify_content: JustifyContent::Center,
            ..Default::default()
        },
    )
}

/// Title screen.
pub fn spawn_main_menu(mut commands: Commands, font: Res<GameFont>) {
    commands.spawn(overlay_text(&font, "RINGFALL", 72.0, 30.0));
    commands.spawn(overlay_text(&font, "press ENTER to launch", 28.0, 55.0));
}

/// Pause curtain over the frozen battlefield.
pub fn spawn_pause_overlay(mut commands: Commands, font: Res<GameFont>) {
    commands.spawn(overlay_text(&font, "PAUSED", 56.0, 40.0));
    commands.spawn(overlay_text(&font, "ESC to resume", 24.0, 52.0));
}

/// Game-over screen with the final tally and the top of the ranking.
pub fn spawn_game_over_overlay(
    mut commands: Commands,
    font: Res<GameFont>,
    score: Res<Score>,
    board: Res<crate::scoreboard::Scoreboard>,
) {
    commands.spawn(overlay_text(&font, "GAME OVER", 64.0, 18.0));
    commands.spawn(overlay_text(
        &font,
        &format!("score {}   kills {}", score.points, score.kills),
        30.0,
        32.0,
    ));
    for rank in 0..5 {
        let entry = board.entry_at(rank);
        commands.spawn(overlay_text(
            &font,
            &format!("{}. {:<12} {:>8}", rank + 1, entry.name, entry.score),
            22.0,
            42.0 + rank as f32 * 5.0,
        ));
    }
    commands.spawn(overlay_text(&font, "R to restart   ENTER for menu", 24.0, 72.0));
}

/// Remove whatever overlay the outgoing state left behind.
pub fn despawn_state_overlay(mut commands: Commands, q: Query<Entity, With<StateOverlay>>) {
    for entity in q.iter() {
        commands.entity(entity).despawn();
    }
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                attach_player_mesh_system,
                attach_enemy_mesh_system,
                attach_projectile_mesh_system,
                attach_powerup_mesh_system,
                attach_boss_mesh_system,
                boss_layer_tint_system,
                hud_score_system,
                hud_lives_system,
            ),
        )
        .add_systems(
            Update,
            arena_boundary_gizmo_system.run_if(in_state(GameState::Playing)),
        )
        .add_systems(OnEnter(GameState::MainMenu), spawn_main_menu)
        .add_systems(OnExit(GameState::MainMenu), despawn_state_overlay)
        .add_systems(OnEnter(GameState::Paused), spawn_pause_overlay)
        .add_systems(OnExit(GameState::Paused), despawn_state_overlay)
        .add_systems(
            OnEnter(GameState::GameOver),
            // Show the ranking with the finished run already recorded.
            spawn_game_over_overlay.after(crate::scoreboard::record_run_system),
        )
        .add_systems(OnExit(GameState::GameOver), despawn_state_overlay);
    }
}
