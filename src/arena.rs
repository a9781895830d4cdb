//! The play area: a screen-centred circle inside a rectangular screen.
//!
//! Entities are constrained to the circle; the rectangle is only used to
//! despawn projectiles that have left the visible region.  The circle's
//! radius pulses once the player's score crosses a threshold, alternating
//! between contracted and full size every few seconds.
//!
//! The area is threaded through systems as an explicit [`Resource`] rather
//! than ambient global state, so every consumer (boss clamping, projectile
//! ricochet, player movement) reads the same per-frame value.

use crate::config::GameConfig;
use crate::session::{GameState, Score};
use bevy::prelude::*;

/// Circular play area plus the enclosing screen rectangle.
#[derive(Resource, Debug, Clone)]
pub struct PlayArea {
    /// Centre of the circle in world space (the world origin).
    pub center: Vec2,
    /// Current boundary radius.
    pub radius: f32,
    /// Radius the boundary is interpolating toward.
    pub target_radius: f32,
    /// Full-size radius derived from the screen dimensions.
    pub base_radius: f32,
    /// Screen rectangle half-extents (width/2, height/2).
    pub half_extents: Vec2,
    /// Accumulates play time toward the next pulse flip.
    pulse_timer: f32,
    /// Whether the current pulse target is the contracted radius.
    shrinking: bool,
}

impl PlayArea {
    pub fn from_config(config: &GameConfig) -> Self {
        let base_radius =
            config.screen_width.min(config.screen_height) / 2.0 - config.play_area_margin;
        Self {
            center: Vec2::ZERO,
            radius: base_radius,
            target_radius: base_radius,
            base_radius,
            half_extents: Vec2::new(config.screen_width / 2.0, config.screen_height / 2.0),
            pulse_timer: 0.0,
            shrinking: false,
        }
    }

    /// Returns `true` when `point` (with `margin` of clearance) lies inside
    /// the circular boundary.
    #[inline]
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        point.distance(self.center) <= self.radius - margin
    }

    /// Clamp `point` onto or inside the circle, keeping `margin` of clearance.
    pub fn clamp_inside(&self, point: Vec2, margin: f32) -> Vec2 {
        let offset = point - self.center;
        let limit = (self.radius - margin).max(0.0);
        if offset.length() <= limit {
            point
        } else {
            self.center + offset.normalize_or_zero() * limit
        }
    }

    /// Clamp `point` into the rectangular screen bounds with `margin` clearance.
    pub fn clamp_to_screen(&self, point: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            point
                .x
                .clamp(-self.half_extents.x + margin, self.half_extents.x - margin),
            point
                .y
                .clamp(-self.half_extents.y + margin, self.half_extents.y - margin),
        )
    }

    /// Returns `true` when a circle of `radius` at `point` lies entirely
    /// outside the screen rectangle (projectile despawn test).
    pub fn fully_off_screen(&self, point: Vec2, radius: f32) -> bool {
        point.x + radius < -self.half_extents.x
            || point.x - radius > self.half_extents.x
            || point.y + radius < -self.half_extents.y
            || point.y - radius > self.half_extents.y
    }

    /// A point on the current boundary at `angle` radians.
    #[inline]
    pub fn boundary_point(&self, angle: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// Reset radius and pulse state to the full-size baseline.
    pub fn reset(&mut self) {
        self.radius = self.base_radius;
        self.target_radius = self.base_radius;
        self.pulse_timer = 0.0;
        self.shrinking = false;
    }

    /// Advance the pulse state by `dt` seconds at the given score.
    ///
    /// Below the score threshold the radius holds at full size.  Above it,
    /// the target flips between `min_scale × base` and `base` every
    /// `pulse_period` seconds, with the actual radius chasing the target at
    /// `transition_speed` units/second.
    pub fn tick(&mut self, dt: f32, score: u64, config: &GameConfig) {
        if dt <= 0.0 {
            return;
        }

        if score >= config.area_pulse_score {
            self.pulse_timer += dt;
            if self.pulse_timer >= config.area_pulse_period {
                self.pulse_timer = 0.0;
                self.shrinking = !self.shrinking;
                self.target_radius = if self.shrinking {
                    self.base_radius * config.area_min_scale
                } else {
                    self.base_radius
                };
            }
        }

        if self.radius != self.target_radius {
            let direction = if self.target_radius > self.radius {
                1.0
            } else {
                -1.0
            };
            self.radius += direction * config.area_transition_speed * dt;
            if (direction > 0.0 && self.radius >= self.target_radius)
                || (direction < 0.0 && self.radius <= self.target_radius)
            {
                self.radius = self.target_radius;
            }
        }
    }
}

/// Per-frame pulse update, active only while playing.
pub fn play_area_pulse_system(
    time: Res<Time>,
    score: Res<Score>,
    config: Res<GameConfig>,
    mut area: ResMut<PlayArea>,
) {
    area.tick(time.delta_secs(), score.points, &config);
}

/// Startup system: rebuild the play area from the final (possibly
/// TOML-overridden) config.  Must run after `load_game_config`.
pub fn init_play_area(config: Res<GameConfig>, mut area: ResMut<PlayArea>) {
    *area = PlayArea::from_config(&config);
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlayArea::from_config(&GameConfig::default()))
            .add_systems(
                Update,
                play_area_pulse_system.run_if(in_state(GameState::Playing)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlayArea {
        PlayArea::from_config(&GameConfig::default())
    }

    #[test]
    fn base_radius_respects_margin() {
        let a = area();
        // min(1700, 1000)/2 - 50
        assert_eq!(a.base_radius, 450.0);
        assert_eq!(a.radius, a.base_radius);
    }

    #[test]
    fn clamp_inside_pulls_outside_points_onto_the_boundary() {
        let a = area();
        let clamped = a.clamp_inside(Vec2::new(10_000.0, 0.0), 15.0);
        assert!((clamped.length() - (a.radius - 15.0)).abs() < 1e-3);

        let inside = Vec2::new(100.0, -50.0);
        assert_eq!(a.clamp_inside(inside, 15.0), inside);
    }

    #[test]
    fn off_screen_test_requires_the_full_circle_outside() {
        let a = area();
        assert!(!a.fully_off_screen(Vec2::new(a.half_extents.x - 1.0, 0.0), 5.0));
        assert!(a.fully_off_screen(Vec2::new(a.half_extents.x + 6.0, 0.0), 5.0));
    }

    #[test]
    fn no_pulse_below_score_threshold() {
        let mut a = area();
        let config = GameConfig::default();
        a.tick(30.0, 0, &config);
        assert_eq!(a.radius, a.base_radius);
        assert_eq!(a.target_radius, a.base_radius);
    }

    #[test]
    fn pulse_contracts_then_expands_above_threshold() {
        let mut a = area();
        let config = GameConfig::default();

        a.tick(config.area_pulse_period, config.area_pulse_score, &config);
        assert_eq!(a.target_radius, a.base_radius * config.area_min_scale);

        // Let the radius chase the contracted target.
        for _ in 0..600 {
            a.tick(1.0 / 60.0, config.area_pulse_score, &config);
        }
        assert!((a.radius - a.base_radius * config.area_min_scale).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_tick_is_a_no_op() {
        let mut a = area();
        let config = GameConfig::default();
        a.target_radius = 300.0;
        let before = a.radius;
        a.tick(0.0, 5000, &config);
        assert_eq!(a.radius, before);
    }
}
