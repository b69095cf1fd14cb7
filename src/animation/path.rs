use crate::animation::lerp::Lerp;
use crate::foundation::color::Color;
use crate::foundation::core::{Vec3, sanitize_delta};
use crate::foundation::error::{SceneError, SceneResult};
use crate::scene::selector::PathConfig;
use crate::scene::tuning::PathTuning;
use crate::timing::scheduler::{Scheduler, TimerId};
use smallvec::SmallVec;

/// Progress within this distance of 1.0 counts as arrival.
const ARRIVAL_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathState {
    Idle,
    Running,
}

/// One in-flight traversal.
#[derive(Clone, Debug, Default, PartialEq)]
struct PathRun {
    segment: usize,
    /// Fraction of the current segment covered, `0..=1`.
    progress: f64,
    notified: SmallVec<[usize; 4]>,
}

/// Render directives for the traveling marker.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MarkerFrame {
    pub position: Vec3,
    pub segment: usize,
    pub progress: f64,
    pub color: Color,
    pub radius: f64,
    pub trail_width: f64,
    pub trail_length: f64,
}

/// Marker that travels a [`PathConfig`] at constant speed and reports each waypoint it reaches.
///
/// Two timers drive it: a one-shot initial delay and a repeating interval. Either one firing
/// restarts the traversal from waypoint 0, discarding any run still in flight. Within a run, each
/// waypoint is reported at most once, and at most one segment completes per step.
#[derive(Debug)]
pub struct PathEffect {
    points: SmallVec<[Vec3; 4]>,
    chained: bool,
    speed: f64,
    state: PathState,
    run: PathRun,
    runs_started: u64,
    scheduler: Scheduler,
    timers: [Option<TimerId>; 2],
    torn_down: bool,
}

impl PathEffect {
    /// Validate `path` and arm both timers from `tuning`.
    pub fn new(path: &PathConfig, tuning: &PathTuning) -> SceneResult<Self> {
        Self::with_timing(
            path,
            tuning.speed,
            tuning.initial_delay_secs,
            tuning.interval_secs,
        )
    }

    pub fn with_timing(
        path: &PathConfig,
        speed: f64,
        initial_delay_secs: f64,
        interval_secs: f64,
    ) -> SceneResult<Self> {
        validate_path(path)?;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SceneError::validation(
                "path speed must be finite and > 0",
            ));
        }

        let mut scheduler = Scheduler::new();
        let initial = scheduler.schedule_once(initial_delay_secs)?;
        let repeat = scheduler.schedule_repeating(interval_secs)?;

        Ok(Self {
            points: path.points.clone(),
            chained: path.chained,
            speed,
            state: PathState::Idle,
            run: PathRun::default(),
            runs_started: 0,
            scheduler,
            timers: [Some(initial), Some(repeat)],
            torn_down: false,
        })
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PathState::Running
    }

    pub fn segment(&self) -> usize {
        self.run.segment
    }

    pub fn progress(&self) -> f64 {
        self.run.progress
    }

    /// Waypoints reported by the current (or last) run, in order.
    pub fn notified(&self) -> &[usize] {
        &self.run.notified
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Seconds this effect has been advanced.
    pub fn elapsed(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Restart the traversal from waypoint 0. Ignored after [`PathEffect::teardown`].
    pub fn start_run(&mut self) {
        if self.torn_down {
            return;
        }
        let preempted = self.state == PathState::Running;
        self.runs_started += 1;
        tracing::debug!(
            run = self.runs_started,
            preempted,
            at = self.scheduler.now(),
            "path run started"
        );
        self.run.segment = 0;
        self.run.progress = 0.0;
        self.run.notified.clear();
        self.state = PathState::Running;
    }

    /// Advance by `delta_secs`, appending reached waypoint indices to `reached`.
    ///
    /// Timers that fall inside the step split it: the old run moves up to the firing instant and
    /// the new run covers the remainder.
    pub fn advance(&mut self, delta_secs: f64, reached: &mut impl Extend<usize>) {
        let delta = sanitize_delta(delta_secs);
        let until = self.scheduler.now() + delta;
        if self.torn_down {
            self.scheduler.advance_to(until);
            return;
        }

        let mut cursor = self.scheduler.now();
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.step(fired.at - cursor, reached);
            cursor = cursor.max(fired.at);
            if fired.missed > 0 {
                tracing::trace!(missed = fired.missed, at = fired.at, "restarts folded");
            }
            if Some(fired.id) == self.timers[0] {
                self.timers[0] = None;
            }
            self.start_run();
        }
        self.step(until - cursor, reached);
        self.scheduler.advance_to(until);
    }

    fn step(&mut self, delta: f64, reached: &mut impl Extend<usize>) {
        if self.state != PathState::Running {
            return;
        }

        let seg = self.run.segment;
        let (a, b) = (self.points[seg], self.points[seg + 1]);
        let len = a.distance(b);
        if len > 0.0 {
            self.run.progress += delta.max(0.0) * self.speed / len;
        } else {
            self.run.progress = 1.0;
        }

        if self.run.progress < 1.0 - ARRIVAL_EPSILON {
            return;
        }

        let waypoint = seg + 1;
        if !self.run.notified.contains(&waypoint) {
            self.run.notified.push(waypoint);
            tracing::trace!(waypoint, run = self.runs_started, "waypoint reached");
            reached.extend(std::iter::once(waypoint));
        }

        if self.chained && waypoint < self.points.len() - 1 {
            self.run.segment = waypoint;
            self.run.progress = 0.0;
        } else {
            self.state = PathState::Idle;
            self.run.segment = 0;
            self.run.progress = 0.0;
        }
    }

    /// Marker directives, or `None` while idle (the marker is hidden between runs).
    pub fn marker(&self, tuning: &PathTuning) -> Option<MarkerFrame> {
        if self.state != PathState::Running {
            return None;
        }
        let seg = self.run.segment;
        let t = self.run.progress.clamp(0.0, 1.0);
        Some(MarkerFrame {
            position: Vec3::lerp(&self.points[seg], &self.points[seg + 1], t),
            segment: seg,
            progress: t,
            color: tuning.marker_color,
            radius: tuning.marker_radius,
            trail_width: tuning.trail_width,
            trail_length: tuning.trail_length,
        })
    }

    /// Cancel both timers and stop. The effect never runs or reports again.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let mut cancelled = 0usize;
        for id in self.timers.iter_mut().filter_map(Option::take) {
            cancelled += usize::from(self.scheduler.cancel(id));
        }
        self.state = PathState::Idle;
        self.run = PathRun::default();
        self.torn_down = true;
        tracing::debug!(cancelled, "path effect torn down");
    }
}

fn validate_path(path: &PathConfig) -> SceneResult<()> {
    if path.points.len() < 2 {
        return Err(SceneError::validation(
            "path needs at least two points",
        ));
    }
    if !path.chained && path.points.len() != 2 {
        return Err(SceneError::validation(
            "unchained path must be a single start/end segment",
        ));
    }
    if !path.points.iter().all(|p| p.is_finite()) {
        return Err(SceneError::validation("path points must be finite"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/path.rs"]
mod tests;
