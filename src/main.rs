use bevy::prelude::*;
use bevy::window::WindowResolution;

use ringfall::arena::ArenaPlugin;
use ringfall::audio::GameAudioPlugin;
use ringfall::boss::BossPlugin;
use ringfall::combat::CombatPlugin;
use ringfall::config::{load_game_config, GameConfig};
use ringfall::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use ringfall::enemy::EnemyPlugin;
use ringfall::graphics::{load_game_font, setup_camera, GameFont};
use ringfall::input::InputPlugin;
use ringfall::player::PlayerPlugin;
use ringfall::powerup::PowerUpPlugin;
use ringfall::projectile::ProjectilePlugin;
use ringfall::rendering::{setup_hud, RenderingPlugin};
use ringfall::scoreboard::ScoreboardPlugin;
use ringfall::session::SessionPlugin;
use ringfall::arena;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ringfall".into(),
                resolution: WindowResolution::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Insert GameConfig with compiled defaults; load_game_config will
        // overwrite it from assets/game.toml (if present) in the Startup schedule.
        .insert_resource(GameConfig::default())
        .insert_resource(GameFont::default())
        .add_plugins((
            SessionPlugin,
            ArenaPlugin,
            InputPlugin,
            PlayerPlugin,
            ProjectilePlugin,
            EnemyPlugin,
            BossPlugin,
            PowerUpPlugin,
            CombatPlugin,
            ScoreboardPlugin,
            GameAudioPlugin,
            RenderingPlugin,
        ))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                load_game_config,
                arena::init_play_area.after(load_game_config),
                setup_camera.after(load_game_config),
                load_game_font.after(load_game_config),
                setup_hud.after(setup_camera).after(load_game_font),
            ),
        )
        .run();
}
