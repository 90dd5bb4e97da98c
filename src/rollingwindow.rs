use std::collections::VecDeque;

use serde::Serialize;

use crate::error::WindowError;
use crate::observation::Observation;

/// Point-in-time view of the window aggregates.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Aggregates {
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Count, sum, min and max over the observations that fall within the
/// trailing `window_duration` of the latest timestamp.
///
/// Timestamps must be non-decreasing. Inserting when nothing has expired is
/// O(1); an insertion that expires the oldest observation rescans the
/// retained observations to rebuild the aggregates.
#[derive(Debug)]
pub struct RollingWindow {
    window: VecDeque<Observation>,
    window_duration: f64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    evicted: u64,
}

impl RollingWindow {
    pub fn new(window_duration: f64) -> Result<RollingWindow, WindowError> {
        if !window_duration.is_finite() || window_duration <= 0.0 {
            return Err(WindowError::InvalidDuration(window_duration));
        }
        Ok(RollingWindow {
            window: VecDeque::new(),
            window_duration,
            sum: 0.0,
            min: None,
            max: None,
            evicted: 0,
        })
    }

    pub fn put(&mut self, timestamp: f64, value: f64) -> Result<(), WindowError> {
        if !timestamp.is_finite() || !value.is_finite() {
            return Err(WindowError::NonFinite { timestamp, value });
        }
        if let Some(latest) = self.latest_timestamp() {
            if timestamp < latest {
                return Err(WindowError::OutOfOrder { timestamp, latest });
            }
        }

        let cutoff = timestamp - self.window_duration;
        let nothing_expired = self
            .window
            .front()
            .map_or(true, |oldest| cutoff < oldest.timestamp);

        self.window.push_back(Observation::new(timestamp, value));

        if nothing_expired {
            self.sum += value;
            self.min = Some(self.min.map_or(value, |m| m.min(value)));
            self.max = Some(self.max.map_or(value, |m| m.max(value)));
            log::trace!("put {} @ {}: fast path, len {}", value, timestamp, self.window.len());
        } else {
            self.evict(cutoff);
        }
        Ok(())
    }

    // rebuild the aggregates from the observations newer than cutoff and drop the rest
    fn evict(&mut self, cutoff: f64) {
        let mut sum = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut expired = 0;

        for obs in self.window.iter() {
            if cutoff >= obs.timestamp {
                expired += 1;
                continue;
            }
            sum += obs.value;
            min = Some(min.map_or(obs.value, |m| m.min(obs.value)));
            max = Some(max.map_or(obs.value, |m| m.max(obs.value)));
        }

        // sorted input puts every expired observation at the front
        self.window.drain(..expired);
        self.evicted += expired as u64;
        self.sum = sum;
        self.min = min;
        self.max = max;

        log::debug!(
            "evicted {} observation(s) at or before {}, {} retained",
            expired,
            cutoff,
            self.window.len()
        );
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.sum / self.window.len() as f64)
        }
    }

    pub fn window_duration(&self) -> f64 {
        self.window_duration
    }

    pub fn latest_timestamp(&self) -> Option<f64> {
        self.window.back().map(|obs| obs.timestamp)
    }

    pub fn oldest_timestamp(&self) -> Option<f64> {
        self.window.front().map(|obs| obs.timestamp)
    }

    /// Total number of observations evicted since construction.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.window.iter()
    }

    pub fn snapshot(&self) -> Aggregates {
        Aggregates {
            count: self.window.len(),
            sum: self.sum,
            min: self.min,
            max: self.max,
        }
    }
}
