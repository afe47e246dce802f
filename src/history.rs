use std::collections::VecDeque;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

/// One centroid observation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub ts: f64,
}

/// Append-only, time-bounded queue of samples. Every push drops samples that
/// are no longer strictly newer than `ts - window`.
pub struct TimeWindow {
    deque: VecDeque<Sample>,
    window: f64,
}

impl Clone for TimeWindow {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque.clone(),
            window: self.window,
        }
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.deque.fmt(f)
    }
}

impl TimeWindow {
    #[inline]
    pub fn new(window: f64) -> Self {
        Self {
            deque: VecDeque::new(),
            window,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.deque.push_back(sample);

        let cutoff = sample.ts - self.window;
        while let Some(oldest) = self.deque.front() {
            if oldest.ts > cutoff {
                break;
            }
            self.deque.pop_front();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    #[inline]
    pub fn window(&self) -> f64 {
        self.window
    }

    #[inline]
    pub fn oldest(&self) -> Option<&Sample> {
        self.deque.front()
    }

    #[inline]
    pub fn newest(&self) -> Option<&Sample> {
        self.deque.back()
    }

    /// Oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'_ Sample> {
        self.deque.iter()
    }

    /// Samples strictly newer than `now - secs`.
    #[inline]
    pub fn since(&self, now: f64, secs: f64) -> impl Iterator<Item = &'_ Sample> {
        let cutoff = now - secs;
        self.deque.iter().filter(move |s| s.ts > cutoff)
    }
}
