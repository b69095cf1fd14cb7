use crate::foundation::color::Color;
use crate::foundation::core::Vec3;
use crate::foundation::error::{SceneError, SceneResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Every constant that drives the scene animation.
///
/// `Default` reproduces the reference look. JSON overrides may name any subset of fields; unknown
/// fields are rejected so typos do not silently fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneTuning {
    /// Traveling marker (path effect) parameters.
    pub path: PathTuning,
    /// Orb material and hit response parameters.
    pub node: NodeTuning,
    /// Idle bob applied to every orb.
    pub float: FloatTuning,
    /// Pulsing light shown while the scene is empty.
    pub glow: GlowTuning,
    /// Attribute and connection line parameters.
    pub lines: LineTuning,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathTuning {
    /// Marker speed in scene units per second.
    pub speed: f64,
    /// One-shot delay before the first run.
    pub initial_delay_secs: f64,
    /// Period of the repeating restart timer.
    pub interval_secs: f64,
    pub marker_color: Color,
    pub marker_radius: f64,
    pub trail_width: f64,
    pub trail_length: f64,
}

impl Default for PathTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            initial_delay_secs: 0.5,
            interval_secs: 2.0,
            marker_color: Color::from_rgb_u32(0xF472B6),
            marker_radius: 0.08,
            trail_width: 0.5,
            trail_length: 6.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeTuning {
    /// Flash intensity lost per second.
    pub flash_decay_per_sec: f64,
    /// Emissive intensity with no flash.
    pub glow_base: f64,
    /// Extra emissive intensity at full flash.
    pub glow_flash_boost: f64,
    /// Emissive intensity of a muted orb with no flash.
    pub muted_glow_base: f64,
    /// Rate at which the diffuse color eases toward the palette color.
    pub base_color_rate: f64,
    /// Idle spin in radians per second around y.
    pub spin_rate_y: f64,
    /// Idle spin in radians per second around x.
    pub spin_rate_x: f64,
    pub muted_gray: Color,
    pub muted_blend: f64,
    pub muted_emissive_gray: Color,
    pub muted_emissive_blend: f64,
    pub muted_scale: f64,
    pub roughness: f64,
    pub muted_roughness: f64,
    pub metalness: f64,
    pub muted_metalness: f64,
}

impl Default for NodeTuning {
    fn default() -> Self {
        Self {
            flash_decay_per_sec: 2.0,
            glow_base: 0.3,
            glow_flash_boost: 0.7,
            muted_glow_base: 0.1,
            base_color_rate: 4.0,
            spin_rate_y: 0.3,
            spin_rate_x: 0.1,
            muted_gray: Color::from_rgb_u32(0xE8E8E8),
            muted_blend: 0.65,
            muted_emissive_gray: Color::from_rgb_u32(0xCCCCCC),
            muted_emissive_blend: 0.7,
            muted_scale: 0.85,
            roughness: 0.8,
            muted_roughness: 0.9,
            metalness: 0.2,
            muted_metalness: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloatTuning {
    pub speed: f64,
    pub rotation_intensity: f64,
    pub float_intensity: f64,
    /// Output range the raw `[-0.1, 0.1]` bob is remapped into.
    pub range: [f64; 2],
}

impl Default for FloatTuning {
    fn default() -> Self {
        Self {
            speed: 1.5,
            rotation_intensity: 0.3,
            float_intensity: 0.4,
            range: [-0.1, 0.1],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlowTuning {
    pub mean: f64,
    pub amplitude: f64,
    /// Angular frequency of the pulse in radians per second.
    pub angular_rate: f64,
    pub position: Vec3,
    pub color: Color,
    pub distance: f64,
}

impl Default for GlowTuning {
    fn default() -> Self {
        Self {
            mean: 0.5,
            amplitude: 0.3,
            angular_rate: 2.0,
            position: Vec3::new(0.0, 0.0, 2.0),
            color: Color::from_rgb_u32(0x8B5CF6),
            distance: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineTuning {
    pub attribute_rate: f64,
    pub connection_rate: f64,
    pub attribute_color: Color,
    pub connection_color: Color,
    pub dash_size: f64,
    pub gap_size: f64,
    pub attribute_label: String,
    /// End dot radius at full draw-in.
    pub dot_scale: f64,
}

impl Default for LineTuning {
    fn default() -> Self {
        Self {
            attribute_rate: 5.0,
            connection_rate: 4.0,
            attribute_color: Color::from_rgb_u32(0x8B5CF6).with_alpha(0.8),
            connection_color: Color::from_rgb_u32(0x8B5CF6).with_alpha(128.0 / 255.0),
            dash_size: 0.1,
            gap_size: 0.05,
            attribute_label: "szín".to_owned(),
            dot_scale: 0.1,
        }
    }
}

impl SceneTuning {
    /// Parse tuning overrides from a JSON reader. Call [`SceneTuning::validate`] before use.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SceneError::config(format!("parse tuning JSON: {e}")))
    }

    /// Parse tuning overrides from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::config(format!("open tuning JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> SceneResult<()> {
        let p = &self.path;
        positive("path.speed", p.speed)?;
        non_negative("path.initial_delay_secs", p.initial_delay_secs)?;
        positive("path.interval_secs", p.interval_secs)?;
        non_negative("path.marker_radius", p.marker_radius)?;
        non_negative("path.trail_width", p.trail_width)?;
        non_negative("path.trail_length", p.trail_length)?;

        let n = &self.node;
        non_negative("node.flash_decay_per_sec", n.flash_decay_per_sec)?;
        non_negative("node.glow_base", n.glow_base)?;
        non_negative("node.glow_flash_boost", n.glow_flash_boost)?;
        non_negative("node.muted_glow_base", n.muted_glow_base)?;
        non_negative("node.base_color_rate", n.base_color_rate)?;
        finite("node.spin_rate_y", n.spin_rate_y)?;
        finite("node.spin_rate_x", n.spin_rate_x)?;
        unit("node.muted_blend", n.muted_blend)?;
        unit("node.muted_emissive_blend", n.muted_emissive_blend)?;
        positive("node.muted_scale", n.muted_scale)?;
        unit("node.roughness", n.roughness)?;
        unit("node.muted_roughness", n.muted_roughness)?;
        unit("node.metalness", n.metalness)?;
        unit("node.muted_metalness", n.muted_metalness)?;

        let f = &self.float;
        finite("float.speed", f.speed)?;
        finite("float.rotation_intensity", f.rotation_intensity)?;
        finite("float.float_intensity", f.float_intensity)?;
        finite("float.range[0]", f.range[0])?;
        finite("float.range[1]", f.range[1])?;
        if f.range[0] > f.range[1] {
            return Err(SceneError::validation("float.range must be [low, high]"));
        }

        let g = &self.glow;
        finite("glow.mean", g.mean)?;
        finite("glow.amplitude", g.amplitude)?;
        finite("glow.angular_rate", g.angular_rate)?;
        non_negative("glow.distance", g.distance)?;
        if !g.position.is_finite() {
            return Err(SceneError::validation("glow.position must be finite"));
        }

        let l = &self.lines;
        non_negative("lines.attribute_rate", l.attribute_rate)?;
        non_negative("lines.connection_rate", l.connection_rate)?;
        non_negative("lines.dash_size", l.dash_size)?;
        non_negative("lines.gap_size", l.gap_size)?;
        non_negative("lines.dot_scale", l.dot_scale)?;

        Ok(())
    }
}

fn finite(name: &str, v: f64) -> SceneResult<()> {
    if !v.is_finite() {
        return Err(SceneError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> SceneResult<()> {
    finite(name, v)?;
    if v < 0.0 {
        return Err(SceneError::validation(format!("{name} must be >= 0")));
    }
    Ok(())
}

fn positive(name: &str, v: f64) -> SceneResult<()> {
    finite(name, v)?;
    if v <= 0.0 {
        return Err(SceneError::validation(format!("{name} must be > 0")));
    }
    Ok(())
}

fn unit(name: &str, v: f64) -> SceneResult<()> {
    finite(name, v)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(SceneError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tuning.rs"]
mod tests;
