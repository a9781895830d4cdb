//! Gameplay sound cues.
//!
//! Combat systems emit [`AudioCue`] messages instead of playing sounds
//! directly, keeping the resolvers free of asset handles and letting the
//! headless test harness run without an audio device.  The sink system
//! at the end of the frame turns each cue into playback.

use bevy::prelude::*;

/// One-shot sound effect request.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    PlayerShot,
    EnemyShot,
    EnemyHit,
    EnemyDown,
    PlayerHit,
    PowerUpCollected,
    BossLayerDown,
    BossDefeated,
}

impl AudioCue {
    /// Asset path for this cue, relative to `assets/`.
    pub fn asset_path(&self) -> &'static str {
        match self {
            AudioCue::PlayerShot => "sounds/player_shot.ogg",
            AudioCue::EnemyShot => "sounds/enemy_shot.ogg",
            AudioCue::EnemyHit => "sounds/enemy_hit.ogg",
            AudioCue::EnemyDown => "sounds/enemy_down.ogg",
            AudioCue::PlayerHit => "sounds/player_hit.ogg",
            AudioCue::PowerUpCollected => "sounds/powerup.ogg",
            AudioCue::BossLayerDown => "sounds/boss_layer_down.ogg",
            AudioCue::BossDefeated => "sounds/boss_defeated.ogg",
        }
    }
}

/// Drain pending cues and spawn a despawn-on-finish audio player for each.
pub fn audio_sink_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut cues: MessageReader<AudioCue>,
) {
    for cue in cues.read() {
        commands.spawn((
            AudioPlayer::new(asset_server.load(cue.asset_path())),
            PlaybackSettings::DESPAWN,
        ));
    }
}

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AudioCue>()
            .add_systems(PostUpdate, audio_sink_system);
    }
}
