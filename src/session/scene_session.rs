use crate::animation::ambient::{FloatPose, GlowFrame};
use crate::animation::line::{AttributeFrame, LineDraw, carry_over};
use crate::animation::node::NodeAnimator;
use crate::animation::path::PathEffect;
use crate::foundation::core::{Vec3, sanitize_delta};
use crate::foundation::error::SceneResult;
use crate::scene::selector::{SceneConfig, select};
use crate::scene::stage::Stage;
use crate::scene::tuning::SceneTuning;
use crate::session::relay::EventRelay;
use crate::session::snapshot::FrameSnapshot;
use smallvec::SmallVec;

/// Hit counter slots; no stage shows more orbs than this.
pub const HIT_SLOTS: usize = 4;

/// One mounted instance of the scene.
///
/// The session owns the stage, the hit counters and every animator. Each [`SceneSession::advance`]
/// runs one tick in a fixed order: path effect, relay, orbs, lines, ambient light. A hit therefore
/// shows up on its orb in the same tick the marker arrives.
#[derive(Debug)]
pub struct SceneSession {
    tuning: SceneTuning,
    config: SceneConfig,
    nodes: Vec<NodeAnimator>,
    attribute: Option<LineDraw>,
    connections: Vec<LineDraw>,
    path: Option<PathEffect>,
    relay: EventRelay,
    elapsed: f64,
    frame: u64,
    torn_down: bool,
}

impl SceneSession {
    /// Validate `tuning` and start on the empty stage.
    pub fn new(tuning: SceneTuning) -> SceneResult<Self> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            config: select(Stage::Empty),
            nodes: Vec::new(),
            attribute: None,
            connections: Vec::new(),
            path: None,
            relay: EventRelay::new(HIT_SLOTS),
            elapsed: 0.0,
            frame: 0,
            torn_down: false,
        })
    }

    pub fn with_stage(tuning: SceneTuning, stage: Stage) -> SceneResult<Self> {
        let mut session = Self::new(tuning)?;
        session.set_stage(stage)?;
        Ok(session)
    }

    pub fn stage(&self) -> Stage {
        self.config.stage
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    pub fn hit_counts(&self) -> &[u64] {
        self.relay.counters()
    }

    pub fn nodes(&self) -> &[NodeAnimator] {
        &self.nodes
    }

    pub fn path(&self) -> Option<&PathEffect> {
        self.path.as_ref()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Switch to `stage`. Re-selecting the current stage changes nothing.
    ///
    /// Orbs are matched by index: an orb kept by the new layout keeps its palette and flash, extra
    /// orbs disappear, and new orbs start from their configured palette.
    #[tracing::instrument(level = "debug", skip(self), fields(from = %self.config.stage))]
    pub fn set_stage(&mut self, stage: Stage) -> SceneResult<()> {
        if stage == self.config.stage {
            return Ok(());
        }
        let config = select(stage);

        self.nodes.truncate(config.nodes.len());
        for (i, node) in config.nodes.iter().enumerate().skip(self.nodes.len()) {
            self.nodes
                .push(NodeAnimator::new(node.palette, self.relay.count(i)));
        }

        let lines = &self.tuning.lines;
        self.attribute = match (config.attribute_line, self.attribute) {
            (Some(cfg), Some(prev)) if prev.line() == cfg => Some(prev),
            (Some(cfg), _) => Some(LineDraw::new(cfg, lines.attribute_rate)),
            (None, _) => None,
        };
        self.connections = carry_over(&self.connections, &config.connections, lines.connection_rate);

        if let Some(mut old) = self.path.take() {
            old.teardown();
        }
        if let (Some(path), false) = (&config.path, self.torn_down) {
            self.path = Some(PathEffect::new(path, &self.tuning.path)?);
        }

        tracing::debug!(
            nodes = config.nodes.len(),
            path = config.path.is_some(),
            "stage selected"
        );
        self.config = config;
        Ok(())
    }

    /// Run one tick of `delta_secs` and describe the resulting frame.
    pub fn advance(&mut self, delta_secs: f64) -> FrameSnapshot {
        let delta = sanitize_delta(delta_secs);
        self.elapsed += delta;
        self.frame += 1;

        let mut waypoints: SmallVec<[usize; 4]> = SmallVec::new();
        if let Some(path) = self.path.as_mut() {
            path.advance(delta, &mut waypoints);
        }
        for &w in &waypoints {
            self.relay.on_reach(w);
        }

        let node_tuning = &self.tuning.node;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            *node = node.advance(delta, self.relay.count(i), node_tuning);
        }
        if let Some(line) = self.attribute.as_mut() {
            *line = line.advance(delta);
        }
        for line in &mut self.connections {
            *line = line.advance(delta);
        }

        if !waypoints.is_empty() {
            tracing::trace!(?waypoints, elapsed = self.elapsed, "hits relayed");
        }
        self.describe(waypoints)
    }

    /// Describe the current frame without advancing time.
    pub fn snapshot(&self) -> FrameSnapshot {
        self.describe(SmallVec::new())
    }

    fn describe(&self, waypoints: SmallVec<[usize; 4]>) -> FrameSnapshot {
        let t = &self.tuning;
        let pose = FloatPose::at(self.elapsed, &t.float);

        let nodes = self
            .nodes
            .iter()
            .zip(&self.config.nodes)
            .enumerate()
            .map(|(i, (node, cfg))| node.frame(i, cfg, pose, &t.node))
            .collect();

        let dash = Some((t.lines.dash_size, t.lines.gap_size));
        let connections = self
            .connections
            .iter()
            .map(|l| l.frame(t.lines.connection_color, dash))
            .collect();

        let attribute = self.attribute.map(|draw| {
            let line = draw.frame(t.lines.attribute_color, None);
            AttributeFrame {
                dot_radius: draw.progress() * t.lines.dot_scale,
                label: t.lines.attribute_label.clone(),
                label_anchor: draw.line().end + Vec3::on_x(0.5),
                label_scale: draw.progress(),
                line,
            }
        });

        FrameSnapshot {
            frame: self.frame,
            elapsed: self.elapsed,
            stage: self.config.stage,
            activated: self.config.activated(),
            nodes,
            connections,
            attribute,
            marker: self.path.as_ref().and_then(|p| p.marker(&t.path)),
            glow: self
                .config
                .ambient_glow
                .then(|| GlowFrame::at(self.elapsed, &t.glow)),
            waypoints,
            hit_counts: self.relay.counters().iter().copied().collect(),
        }
    }

    /// Unmount: cancel every timer. Time keeps advancing afterwards but nothing is triggered.
    pub fn teardown(&mut self) {
        if let Some(path) = self.path.as_mut() {
            path.teardown();
        }
        self.torn_down = true;
        tracing::debug!(elapsed = self.elapsed, "scene session torn down");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scene_session.rs"]
mod tests;
