use crate::animation::ambient::GlowFrame;
use crate::animation::line::{AttributeFrame, LineFrame};
use crate::animation::node::NodeFrame;
use crate::animation::path::MarkerFrame;
use crate::scene::stage::Stage;
use smallvec::SmallVec;

/// Everything a host needs to draw one frame of the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    /// Number of `advance` calls so far.
    pub frame: u64,
    /// Session time in seconds.
    pub elapsed: f64,
    pub stage: Stage,
    /// Orbs are being fed hits by a path effect.
    pub activated: bool,
    pub nodes: Vec<NodeFrame>,
    pub connections: Vec<LineFrame>,
    pub attribute: Option<AttributeFrame>,
    pub marker: Option<MarkerFrame>,
    pub glow: Option<GlowFrame>,
    /// Waypoints reached during this tick, in order.
    pub waypoints: SmallVec<[usize; 4]>,
    pub hit_counts: SmallVec<[u64; 4]>,
}

impl FrameSnapshot {
    /// Serialize as one compact JSON line.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
