use smallvec::SmallVec;

/// Routes waypoint notifications to per-node hit counters.
///
/// Waypoint `i` addresses node `i`. Counters only ever grow; node animators compare them against
/// the value they saw last to detect new hits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventRelay {
    counters: SmallVec<[u64; 4]>,
}

impl EventRelay {
    pub fn new(slots: usize) -> Self {
        Self {
            counters: smallvec::smallvec![0; slots],
        }
    }

    /// Record that the marker reached `waypoint`. Indices without a counter are ignored.
    pub fn on_reach(&mut self, waypoint: usize) -> bool {
        match self.counters.get_mut(waypoint) {
            Some(c) => {
                *c += 1;
                true
            }
            None => {
                tracing::trace!(waypoint, slots = self.counters.len(), "waypoint has no node");
                false
            }
        }
    }

    /// Hit counter for `node`; nodes without a slot read as zero.
    pub fn count(&self, node: usize) -> u64 {
        self.counters.get(node).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> &[u64] {
        &self.counters
    }
}
