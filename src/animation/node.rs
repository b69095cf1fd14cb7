use crate::animation::ambient::FloatPose;
use crate::foundation::color::Color;
use crate::foundation::core::{Vec3, sanitize_delta};
use crate::scene::palette::{PaletteCursor, PaletteId};
use crate::scene::selector::NodeConfig;
use crate::scene::tuning::NodeTuning;

/// Animation state of one orb.
///
/// Plain data advanced by value: every step returns the next state and leaves the old one intact.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NodeAnimator {
    cursor: PaletteCursor,
    flash: f64,
    last_trigger: u64,
    /// Accumulated idle spin as (x, y) radians.
    spin: [f64; 2],
    base_color: Color,
}

/// Render directives for one orb.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NodeFrame {
    pub index: usize,
    pub position: Vec3,
    /// Idle spin plus float sway, in radians.
    pub rotation: Vec3,
    pub scale: f64,
    pub palette: PaletteId,
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f64,
    pub roughness: f64,
    pub metalness: f64,
    pub muted: bool,
    pub flash: f64,
}

impl NodeAnimator {
    /// Fresh orb showing `palette`. `trigger` is the current hit counter, so hits that happened
    /// before the orb appeared do not flash it.
    pub fn new(palette: PaletteId, trigger: u64) -> Self {
        Self {
            cursor: PaletteCursor::starting_at(palette),
            flash: 0.0,
            last_trigger: trigger,
            spin: [0.0, 0.0],
            base_color: palette.color(),
        }
    }

    pub fn palette(&self) -> PaletteId {
        self.cursor.current()
    }

    pub fn flash(&self) -> f64 {
        self.flash
    }

    pub fn last_trigger(&self) -> u64 {
        self.last_trigger
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// Rising-edge detection on the hit counter: a higher value than last seen cycles the palette
    /// once and flashes to full. The counter is remembered either way.
    #[must_use]
    pub fn on_trigger(self, trigger: u64) -> Self {
        let mut next = self;
        if trigger > self.last_trigger {
            next.cursor = self.cursor.advanced();
            next.flash = 1.0;
        }
        next.last_trigger = trigger;
        next
    }

    /// Time-based part of a frame: flash decay, idle spin and diffuse color easing.
    #[must_use]
    pub fn tick(self, delta_secs: f64, tuning: &NodeTuning) -> Self {
        let delta = sanitize_delta(delta_secs);
        let target = self.cursor.current().color();
        Self {
            flash: (self.flash - delta * tuning.flash_decay_per_sec).max(0.0),
            spin: [
                self.spin[0] + delta * tuning.spin_rate_x,
                self.spin[1] + delta * tuning.spin_rate_y,
            ],
            base_color: self.base_color.mix(target, delta * tuning.base_color_rate),
            ..self
        }
    }

    /// One full frame: trigger edge first, then time.
    #[must_use]
    pub fn advance(self, delta_secs: f64, trigger: u64, tuning: &NodeTuning) -> Self {
        self.on_trigger(trigger).tick(delta_secs, tuning)
    }

    /// Render directives for this orb placed per `config`.
    pub fn frame(
        &self,
        index: usize,
        config: &NodeConfig,
        pose: FloatPose,
        tuning: &NodeTuning,
    ) -> NodeFrame {
        let target = self.cursor.current().color();
        let emissive = target.mix(Color::WHITE, self.flash);

        let (color, emissive, glow_base, scale, roughness, metalness) = if config.muted {
            (
                self.base_color.mix(tuning.muted_gray, tuning.muted_blend),
                emissive.mix(tuning.muted_emissive_gray, tuning.muted_emissive_blend),
                tuning.muted_glow_base,
                tuning.muted_scale,
                tuning.muted_roughness,
                tuning.muted_metalness,
            )
        } else {
            (
                self.base_color,
                emissive,
                tuning.glow_base,
                1.0,
                tuning.roughness,
                tuning.metalness,
            )
        };

        NodeFrame {
            index,
            position: config.position + pose.offset,
            rotation: Vec3::new(self.spin[0], self.spin[1], 0.0) + pose.rotation,
            scale,
            palette: self.cursor.current(),
            color,
            emissive,
            emissive_intensity: glow_base + self.flash * tuning.glow_flash_boost,
            roughness,
            metalness,
            muted: config.muted,
            flash: self.flash,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/node.rs"]
mod tests;
