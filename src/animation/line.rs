use crate::animation::lerp::Lerp;
use crate::foundation::color::Color;
use crate::foundation::core::{Vec3, sanitize_delta};
use crate::foundation::math::approach;
use crate::scene::selector::LineConfig;

/// Line that draws itself in from `start` toward `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineDraw {
    line: LineConfig,
    rate: f64,
    progress: f64,
}

/// Render directives for a partially drawn line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LineFrame {
    pub start: Vec3,
    /// Current tip; reaches `line.end` as progress approaches 1.
    pub end: Vec3,
    pub progress: f64,
    pub color: Color,
    /// `(dash, gap)` lengths in scene units for dashed lines.
    pub dash: Option<(f64, f64)>,
}

/// Attribute line plus its end dot and label.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AttributeFrame {
    pub line: LineFrame,
    pub dot_radius: f64,
    pub label: String,
    pub label_anchor: Vec3,
    pub label_scale: f64,
}

impl LineDraw {
    pub fn new(line: LineConfig, rate: f64) -> Self {
        Self {
            line,
            rate,
            progress: 0.0,
        }
    }

    pub fn line(&self) -> LineConfig {
        self.line
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn advance(self, delta_secs: f64) -> Self {
        let delta = sanitize_delta(delta_secs);
        Self {
            progress: approach(self.progress, 1.0, self.rate, delta),
            ..self
        }
    }

    pub fn frame(&self, color: Color, dash: Option<(f64, f64)>) -> LineFrame {
        LineFrame {
            start: self.line.start,
            end: Vec3::lerp(&self.line.start, &self.line.end, self.progress),
            progress: self.progress,
            color,
            dash,
        }
    }
}

/// Carry draw-in progress across a layout change: lines present in both layouts keep animating
/// from where they were, the rest start over.
pub fn carry_over(previous: &[LineDraw], next: &[LineConfig], rate: f64) -> Vec<LineDraw> {
    next.iter()
        .map(|cfg| {
            previous
                .iter()
                .find(|d| d.line == *cfg)
                .copied()
                .unwrap_or_else(|| LineDraw::new(*cfg, rate))
        })
        .collect()
}
