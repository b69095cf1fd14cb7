//! Time-of-day style motion that depends only on session time, not on frame deltas.

use crate::foundation::color::Color;
use crate::foundation::core::Vec3;
use crate::scene::tuning::{FloatTuning, GlowTuning};

/// Gentle hover applied on top of an orb's layout position.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FloatPose {
    pub offset: Vec3,
    pub rotation: Vec3,
}

impl FloatPose {
    /// Pose at `elapsed_secs` into the session.
    pub fn at(elapsed_secs: f64, tuning: &FloatTuning) -> Self {
        let s = elapsed_secs / 4.0 * tuning.speed;
        let ri = tuning.rotation_intensity;
        let raw_y = s.sin() / 10.0;
        let [lo, hi] = tuning.range;
        // Remap the raw [-0.1, 0.1] bob into the configured range.
        let y = lo + (raw_y + 0.1) / 0.2 * (hi - lo);
        Self {
            offset: Vec3::new(0.0, y * tuning.float_intensity, 0.0),
            rotation: Vec3::new(s.cos() / 8.0 * ri, s.sin() / 8.0 * ri, s.sin() / 20.0 * ri),
        }
    }
}

/// Pulsing point light shown over the empty scene.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GlowFrame {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f64,
    pub distance: f64,
}

impl GlowFrame {
    pub fn at(elapsed_secs: f64, tuning: &GlowTuning) -> Self {
        Self {
            position: tuning.position,
            color: tuning.color,
            intensity: tuning.mean + (elapsed_secs * tuning.angular_rate).sin() * tuning.amplitude,
            distance: tuning.distance,
        }
    }
}
