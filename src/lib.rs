//! Ringfall: a top-down arena shooter built on Bevy.
//!
//! The player holds the centre of a shrinking circular arena against
//! escalating enemy waves, culminating in a four-layer boss fight.
//! Gameplay is split into plugins: [`session`] owns the state machine
//! and spawn pacing, [`combat`] resolves collisions, and the entity
//! modules ([`player`], [`enemy`], [`boss`], [`projectile`],
//! [`powerup`]) own their own movement and timers.

pub mod arena;
pub mod audio;
pub mod boss;
pub mod combat;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod graphics;
pub mod input;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod rendering;
pub mod scoreboard;
pub mod session;
