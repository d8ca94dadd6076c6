//! Per-frame animation state and the model transform derived from it.
//!
//! Two scalars drive the demo: a horizontal offset bouncing between
//! `±max_offset` and an unbounded rotation accumulator.

use glam::{Mat4, Vec3};

/// How far each `advance` moves the animation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Pacing {
    /// One fixed step per presented frame. Speed follows the frame rate.
    PerFrame,
    /// Steps scaled by elapsed time so that `hz` frames per second match `PerFrame`.
    FixedRate { hz: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Offset magnitude at which the direction flips.
    pub max_offset: f32,
    pub offset_step: f32,
    pub rotation_step: f32,
    /// Rotation about Z, in degrees, per unit of the rotation accumulator.
    pub degrees_per_rotation_unit: f32,
    pub scale: Vec3,
    pub pacing: Pacing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            max_offset: 0.7,
            offset_step: 0.05,
            rotation_step: 0.01,
            degrees_per_rotation_unit: 45.0,
            scale: Vec3::new(0.4, 0.4, 1.0),
            pacing: Pacing::PerFrame,
        }
    }
}

impl AnimationConfig {
    /// Step multiplier for a frame that took `dt` seconds.
    pub fn steps_for(&self, dt: f32) -> f32 {
        match self.pacing {
            Pacing::PerFrame => 1.0,
            Pacing::FixedRate { hz } => dt * hz,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    fn flipped(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// Animation scalars, mutated once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    config: AnimationConfig,
    offset: f32,
    direction: Direction,
    rotation: f32,
}

impl Animation {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            offset: 0.0,
            direction: Direction::Right,
            rotation: 0.0,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Advances both scalars by `steps` frame-steps.
    ///
    /// The offset moves in whole unit steps followed by the fractional
    /// remainder. After each move, once `|offset| >= max_offset` the direction
    /// points back toward the center, so the bound is overshot by at most one
    /// `offset_step` whatever `steps` is. With one step per call this is a plain
    /// flip at the bound.
    pub fn advance(&mut self, steps: f32) {
        if !steps.is_finite() || steps <= 0.0 {
            return;
        }

        self.rotation += self.config.rotation_step * steps;

        let mut remaining = steps;
        while remaining > 0.0 {
            let step = remaining.min(1.0);
            self.offset += self.direction.sign() * self.config.offset_step * step;
            self.turn_at_bound();
            remaining -= step;
        }
    }

    fn turn_at_bound(&mut self) {
        if self.offset.abs() < self.config.max_offset {
            return;
        }
        let inward = if self.offset > 0.0 { Direction::Left } else { Direction::Right };
        if self.direction != inward {
            self.direction = self.direction.flipped();
        }
    }

    /// Rotation angle about Z in radians.
    pub fn angle(&self) -> f32 {
        (self.config.degrees_per_rotation_unit * self.rotation).to_radians()
    }

    /// `rotate(angle, Z) * translate(offset, 0, 0) * scale(config.scale)`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.angle())
            * Mat4::from_translation(Vec3::new(self.offset, 0.0, 0.0))
            * Mat4::from_scale(self.config.scale)
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}
