use crate::history::{Sample, TimeWindow};
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Minimum samples in the trailing window before extent is trusted.
pub const MIN_EXTENT_SAMPLES: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Vehicle,
}

/// One tracked entity: its centroid history and the loitering alert latch.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: u32,
    pub history: TimeWindow,
    pub last_seen: f64,
    pub loitering_alerted: bool,
}

impl Track {
    pub fn new(id: u32, window: f64) -> Self {
        Self {
            id,
            history: TimeWindow::new(window),
            last_seen: 0.0,
            loitering_alerted: false,
        }
    }

    pub fn push(&mut self, pos: na::Point2<f64>, ts: f64) {
        self.history.push(Sample {
            x: pos.x,
            y: pos.y,
            ts,
        });
        self.last_seen = ts;
    }

    /// Latest centroid, origin for a track that was never fed.
    #[inline]
    pub fn center(&self) -> na::Point2<f64> {
        self.history
            .newest()
            .map(|s| na::Point2::new(s.x, s.y))
            .unwrap_or_else(na::Point2::origin)
    }

    #[inline]
    pub fn time_tracked(&self, now: f64) -> f64 {
        self.history.oldest().map(|s| now - s.ts).unwrap_or(0.0)
    }

    /// Larger side of the bbox spanned by the trailing `secs` of samples.
    /// Infinite when the window holds fewer than `MIN_EXTENT_SAMPLES`.
    pub fn extent(&self, now: f64, secs: f64) -> f64 {
        let mut count = 0;
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

        for s in self.history.since(now, secs) {
            count += 1;
            min_x = min_x.min(s.x);
            max_x = max_x.max(s.x);
            min_y = min_y.min(s.y);
            max_y = max_y.max(s.y);
        }

        if count < MIN_EXTENT_SAMPLES {
            return f64::INFINITY;
        }

        (max_x - min_x).max(max_y - min_y)
    }

    /// Path length over the trailing `secs`.
    pub fn movement_distance(&self, now: f64, secs: f64) -> f64 {
        let points: Vec<_> = self
            .history
            .since(now, secs)
            .map(|s| na::Point2::new(s.x, s.y))
            .collect();

        points.windows(2).map(|w| na::distance(&w[0], &w[1])).sum()
    }
}

/// Per-cycle tracker output for one surviving track.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackReport {
    pub id: u32,
    pub position: (f64, f64),
    pub time_tracked: f64,
    pub is_loitering: bool,
    /// Latch value before this cycle, so callers can spot the first alert.
    pub loitering_alerted: bool,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

impl TrackReport {
    /// True on the single cycle that should drive a notification.
    #[inline]
    pub fn should_alert(&self) -> bool {
        self.is_loitering && !self.loitering_alerted
    }
}
