use bevy::prelude::*;

/// Game font resource for HUD and menu text.
///
/// UI systems reference `font.0.clone()` instead of the default Bevy
/// font.  Created by [`load_game_font`] at startup.
#[derive(Resource, Default)]
pub struct GameFont(pub Handle<Font>);

/// Load the HUD font from assets at startup.
///
/// Must run before any UI setup systems that spawn text.
pub fn load_game_font(mut font: ResMut<GameFont>, asset_server: Res<AssetServer>) {
    font.0 = asset_server.load("fonts/Orbitron/Orbitron-VariableFont_wght.ttf");
    eprintln!("[SETUP] Game font loaded");
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d with default scale shows roughly the full window area
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}
