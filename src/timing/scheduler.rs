use crate::foundation::error::{SceneError, SceneResult};

/// Cancellation handle returned by the `schedule_*` calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Repeat {
    Once,
    Every(f64),
}

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    due: f64,
    repeat: Repeat,
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired {
    pub id: TimerId,
    /// Clock reading at which the timer was due.
    pub at: f64,
    /// Earlier periods of a repeating timer folded into this firing.
    pub missed: u64,
}

/// Virtual-clock timer queue stepped by the frame loop.
///
/// Time only moves through [`Scheduler::pop_due`] and [`Scheduler::advance_to`], so a simulation
/// can be driven with arbitrary frame deltas and still fire timers at their exact due instants.
/// Repeating timers re-arm from their due time, so they do not drift under coarse frames. A
/// repeating timer fires at most once per `pop_due` window: periods it missed are folded into one
/// firing at the latest due instant.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading in seconds since construction.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire once, `delay_secs` from now.
    pub fn schedule_once(&mut self, delay_secs: f64) -> SceneResult<TimerId> {
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            return Err(SceneError::validation(
                "timer delay must be finite and >= 0",
            ));
        }
        Ok(self.push(self.now + delay_secs, Repeat::Once))
    }

    /// Fire every `interval_secs`, first one interval from now.
    pub fn schedule_repeating(&mut self, interval_secs: f64) -> SceneResult<TimerId> {
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return Err(SceneError::validation(
                "timer interval must be finite and > 0",
            ));
        }
        Ok(self.push(self.now + interval_secs, Repeat::Every(interval_secs)))
    }

    fn push(&mut self, due: f64, repeat: Repeat) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, due, repeat });
        id
    }

    /// Cancel one timer. Returns `false` when it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until` and move the clock to its due time.
    ///
    /// Ties fire in registration order. A repeating timer that is due several times before `until`
    /// fires once, at its last due instant, and is re-armed past `until`. Call in a loop until
    /// `None`, then [`Scheduler::advance_to`] `until`.
    pub fn pop_due(&mut self, until: f64) -> Option<Fired> {
        let (pos, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))?;

        let timer = &mut self.timers[pos];
        let mut fired = Fired {
            id: timer.id,
            at: timer.due,
            missed: 0,
        };
        let repeat = timer.repeat;
        match repeat {
            Repeat::Once => {
                self.timers.swap_remove(pos);
            }
            Repeat::Every(interval) => {
                let missed = ((until - timer.due) / interval).floor();
                let last = (timer.due + missed * interval).min(until);
                let mut next = last + interval;
                if next <= until {
                    next = until.next_up();
                }
                timer.due = next;
                fired.at = last;
                fired.missed = missed as u64;
            }
        }
        self.now = self.now.max(fired.at);
        Some(fired)
    }

    /// Move the clock forward without firing anything. Never moves it backward.
    pub fn advance_to(&mut self, t: f64) {
        if t.is_finite() {
            self.now = self.now.max(t);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/scheduler.rs"]
mod tests;
