//! Field rotation driven by two rotate buttons
//!
//! A bounded angular acceleration ramps up while a button is held and decays
//! back to zero when released. The field angle integrates it each tick and
//! also sets the direction of gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_angle;

/// Bounded accumulator stepping by a fixed amount per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accelerator {
    step: f32,
    max: f32,
    current: f32,
}

impl Accelerator {
    /// # Panics
    ///
    /// Panics unless `0 < step <= max` and both are finite.
    pub fn new(step: f32, max: f32) -> Self {
        assert!(step.is_finite() && max.is_finite(), "acceleration must be finite");
        assert!(step > 0.0, "acceleration step must be positive, got {step}");
        assert!(step <= max, "acceleration step {step} exceeds bound {max}");
        Self {
            step,
            max,
            current: 0.0,
        }
    }

    pub fn accelerate_plus(&mut self) {
        self.current = (self.current + self.step).clamp(-self.max, self.max);
    }

    pub fn accelerate_minus(&mut self) {
        self.current = (self.current - self.step).clamp(-self.max, self.max);
    }

    /// Step toward zero, landing exactly on zero once within one step
    pub fn decelerate(&mut self) {
        // Values within a hair above `step` snap to zero instead of leaving a
        // float-drift remainder for one more tick; a strict `> step` test would
        // step them down once more
        let snap = self.step * (1.0 + 1e-4);
        if self.current > snap {
            self.accelerate_minus();
        } else if self.current < -snap {
            self.accelerate_plus();
        } else {
            self.current = 0.0;
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Field angle plus the accelerator that turns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRotation {
    pub accel: Accelerator,
    /// Current angle (radians, [0, 2π))
    pub angle: f32,
}

impl FieldRotation {
    pub fn new(step: f32, max: f32) -> Self {
        Self {
            accel: Accelerator::new(step, max),
            angle: 0.0,
        }
    }

    /// Advance one tick of `dt` milliseconds
    ///
    /// Left takes precedence when both buttons are held.
    pub fn update(&mut self, rotate_left: bool, rotate_right: bool, dt: f32) {
        if rotate_left {
            self.accel.accelerate_minus();
        } else if rotate_right {
            self.accel.accelerate_plus();
        } else {
            self.accel.decelerate();
        }

        let velocity = self.accel.current() * dt;
        self.angle = wrap_angle(self.angle + velocity * dt);
    }

    /// Gravity direction for the current angle
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.angle.sin(), self.angle.cos())
    }

    /// Rotate a field-space point into screen space
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle).rotate(point)
    }
}
