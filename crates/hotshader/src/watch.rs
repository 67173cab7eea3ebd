//! Modification tracking for file-backed shaders.

use std::time::{Duration, SystemTime};

/// Last seen modification time of a shader file plus a frame-time
/// accumulator that throttles how often the file is checked.
///
/// The accumulator only decides *when* to look; the recorded time only moves
/// when the file is strictly newer than what was seen before.
#[derive(Debug, Clone)]
pub struct ModificationWatch {
    last_modified: SystemTime,
    accumulated: Duration,
    interval: Duration,
}

impl ModificationWatch {
    pub fn new(last_modified: SystemTime, interval: Duration) -> Self {
        Self {
            last_modified,
            accumulated: Duration::ZERO,
            interval,
        }
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// Add frame time. Returns `true` (and resets) once the interval is reached.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.accumulated += elapsed;
        if self.accumulated >= self.interval {
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Record `modified` if it is strictly newer. Returns whether it was.
    pub fn observe(&mut self, modified: SystemTime) -> bool {
        if modified > self.last_modified {
            self.last_modified = modified;
            true
        } else {
            false
        }
    }
}
