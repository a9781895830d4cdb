//! Headless tests for the session state machine and reset semantics.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no
//! audio — so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `MainMenu`.
//! 2. Entering `Playing` builds a fresh battlefield with one player.
//! 3. Pause and resume freeze the field without rebuilding it.
//! 4. Restarting after a game over clears leftovers and zeroes score.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use ringfall::arena::PlayArea;
use ringfall::config::GameConfig;
use ringfall::enemy::{spawn_enemy, Enemy, EnemyKind};
use ringfall::player::{DamageBoost, FireCooldown, Player, PlayerLives};
use ringfall::session::{
    end_session, reset_session, BossEncounter, EnemySpawnState, GameState, Score, SessionActive,
    SessionClock,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app with the session state machine and the reset
/// hooks wired the way the game wires them, minus device input.
fn session_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    let config = GameConfig::default();
    app.insert_resource(PlayArea::from_config(&config));
    app.insert_resource(config);
    app.insert_resource(Score::default());
    app.insert_resource(SessionClock::default());
    app.insert_resource(EnemySpawnState::default());
    app.insert_resource(BossEncounter::default());
    app.insert_resource(SessionActive::default());
    app.insert_resource(PlayerLives::default());
    app.insert_resource(DamageBoost::default());
    app.insert_resource(FireCooldown::default());
    app.add_systems(OnEnter(GameState::Playing), reset_session);
    app.add_systems(OnEnter(GameState::MainMenu), end_session);
    app.add_systems(OnEnter(GameState::GameOver), end_session);
    app
}

fn set_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
}

fn count_players(app: &mut App) -> usize {
    let mut q = app.world_mut().query_filtered::<Entity, With<Player>>();
    q.iter(app.world()).count()
}

fn count_enemies(app: &mut App) -> usize {
    let mut q = app.world_mut().query_filtered::<Entity, With<Enemy>>();
    q.iter(app.world()).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_main_menu() {
    let mut app = session_app();
    app.update();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::MainMenu);
}

#[test]
fn entering_playing_builds_a_fresh_battlefield() {
    let mut app = session_app();
    app.update();

    set_state(&mut app, GameState::Playing);

    assert_eq!(count_players(&mut app), 1, "exactly one player after reset");
    assert!(app.world().resource::<SessionActive>().0);
    assert_eq!(app.world().resource::<Score>().points, 0);
    assert_eq!(
        app.world().resource::<PlayerLives>().lives,
        ringfall::constants::PLAYER_LIVES
    );
}

#[test]
fn pause_and_resume_do_not_rebuild_the_field() {
    let mut app = session_app();
    app.update();
    set_state(&mut app, GameState::Playing);

    // Mid-run state: an enemy on the field and some score.
    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_enemy(&mut commands, EnemyKind::Tank, Vec2::new(300.0, 0.0), 20.0, 120.0);
        world.flush();
        world.resource_mut::<Score>().points = 700;
    }
    assert_eq!(count_enemies(&mut app), 1);

    set_state(&mut app, GameState::Paused);
    set_state(&mut app, GameState::Playing);

    // The pause round-trip preserved everything.
    assert_eq!(count_enemies(&mut app), 1, "enemy survived the pause");
    assert_eq!(app.world().resource::<Score>().points, 700);
    assert_eq!(count_players(&mut app), 1);
}

#[test]
fn restart_after_game_over_clears_leftovers() {
    let mut app = session_app();
    app.update();
    set_state(&mut app, GameState::Playing);

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_enemy(&mut commands, EnemyKind::Normal, Vec2::new(200.0, 0.0), 15.0, 120.0);
        world.flush();
        world.resource_mut::<Score>().points = 2500;
        world.resource_mut::<PlayerLives>().lives = 0;
    }

    set_state(&mut app, GameState::GameOver);
    assert!(!app.world().resource::<SessionActive>().0);

    set_state(&mut app, GameState::Playing);

    assert_eq!(count_enemies(&mut app), 0, "old enemies cleared on restart");
    assert_eq!(count_players(&mut app), 1);
    assert_eq!(app.world().resource::<Score>().points, 0);
    assert_eq!(
        app.world().resource::<PlayerLives>().lives,
        ringfall::constants::PLAYER_LIVES
    );
    assert!(!app.world().resource::<BossEncounter>().spawned);
}

#[test]
fn playing_state_persists_across_frames() {
    let mut app = session_app();
    app.update();
    set_state(&mut app, GameState::Playing);

    for _ in 0..5 {
        app.update();
    }

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Playing);
    assert_eq!(count_players(&mut app), 1, "reset must not re-run");
}
