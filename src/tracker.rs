use std::collections::BTreeMap;
use std::ops::Range;

use crate::clock::Clock;
use crate::detection::{Detection, PERSON, VEHICLE_CLASSES};
use crate::error::{ensure_positive, Error, Result};
use crate::track::{EntityKind, Track, TrackReport};
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info, warn};

fn default_history_window() -> f64 {
    60.0
}

fn default_id_span() -> u32 {
    999
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub kind: EntityKind,
    /// Detection classes fed to this tracker, everything else is ignored.
    pub classes: Vec<String>,
    /// Max centroid jump in px between cycles for a detection to match a track.
    pub max_distance: f64,
    /// Seconds a track must be observed before it can count as loitering.
    pub loiter_time: f64,
    /// Max spatial extent in px over the trailing `loiter_time`.
    pub loiter_radius: f64,
    /// Seconds without a match before a track is dropped.
    pub expire_time: f64,
    #[serde(default = "default_history_window")]
    pub history_window: f64,
    /// Ids are handed out from `first_id..first_id + id_span` and wrap
    /// around, skipping ids still in use.
    pub first_id: u32,
    #[serde(default = "default_id_span")]
    pub id_span: u32,
}

impl TrackerConfig {
    pub fn person() -> Self {
        Self {
            kind: EntityKind::Person,
            classes: vec![PERSON.to_string()],
            max_distance: 100.0,
            loiter_time: 30.0,
            loiter_radius: 80.0,
            expire_time: 5.0,
            history_window: default_history_window(),
            first_id: 1,
            id_span: default_id_span(),
        }
    }

    /// Vehicles are boxed less precisely but drift less once parked.
    pub fn vehicle() -> Self {
        Self {
            kind: EntityKind::Vehicle,
            classes: VEHICLE_CLASSES.iter().map(|c| c.to_string()).collect(),
            max_distance: 150.0,
            loiter_time: 20.0,
            loiter_radius: 50.0,
            expire_time: 10.0,
            history_window: default_history_window(),
            first_id: 1000,
            id_span: default_id_span(),
        }
    }

    pub fn with_loiter(mut self, loiter_time: f64, loiter_radius: f64) -> Self {
        self.loiter_time = loiter_time;
        self.loiter_radius = loiter_radius;
        self
    }

    pub fn with_expire_time(mut self, expire_time: f64) -> Self {
        self.expire_time = expire_time;
        self
    }

    pub fn with_ids(mut self, first_id: u32, id_span: u32) -> Self {
        self.first_id = first_id;
        self.id_span = id_span;
        self
    }

    #[inline]
    pub fn id_range(&self) -> Range<u32> {
        self.first_id..self.first_id.saturating_add(self.id_span)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("max_distance", self.max_distance)?;
        ensure_positive("loiter_time", self.loiter_time)?;
        ensure_positive("loiter_radius", self.loiter_radius)?;
        ensure_positive("expire_time", self.expire_time)?;
        ensure_positive("history_window", self.history_window)?;
        ensure_positive("id_span", self.id_span as f64)?;

        if self.first_id.checked_add(self.id_span).is_none() {
            return Err(Error::InvalidConfig {
                param: "id_span",
                value: self.id_span as f64,
            });
        }

        Ok(())
    }
}

/// Greedy nearest-neighbor centroid tracker with a dwell classifier.
///
/// Tracks are visited in ascending id order and each one takes the closest
/// unused detection within `max_distance`. This is not an optimal assignment:
/// an earlier track can take a detection a later track was closer to.
pub struct Tracker<C: Clock> {
    config: TrackerConfig,
    tracks: BTreeMap<u32, Track>,
    next_id: u32,
    clock: C,
}

impl<C: Clock> Tracker<C> {
    pub fn new(config: TrackerConfig, clock: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            next_id: config.first_id,
            config,
            tracks: BTreeMap::new(),
            clock,
        })
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    fn accepts(&self, det: &Detection) -> bool {
        self.config.classes.iter().any(|c| *c == det.class)
    }

    fn allocate_id(&mut self) -> Option<u32> {
        let range = self.config.id_range();

        for _ in 0..self.config.id_span {
            let id = self.next_id;
            self.next_id = if id + 1 >= range.end { range.start } else { id + 1 };

            if !self.tracks.contains_key(&id) {
                return Some(id);
            }
        }

        None
    }

    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackReport> {
        let now = self.clock.now();

        let centroids: Vec<na::Point2<f64>> = detections
            .iter()
            .filter(|d| self.accepts(d))
            .map(Detection::centroid)
            .collect();

        let mut used = vec![false; centroids.len()];
        let max_distance = self.config.max_distance;

        for track in self.tracks.values_mut() {
            let center = track.center();
            let mut best: Option<(usize, f64)> = None;

            for (idx, c) in centroids.iter().enumerate() {
                if used[idx] {
                    continue;
                }

                let dist = na::distance(&center, c);
                if dist < max_distance && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((idx, dist));
                }
            }

            if let Some((idx, _)) = best {
                used[idx] = true;
                track.push(centroids[idx], now);
            }
        }

        for (idx, c) in centroids.iter().enumerate() {
            if used[idx] {
                continue;
            }

            let id = match self.allocate_id() {
                Some(id) => id,
                None => {
                    warn!(kind = ?self.config.kind, "track id range exhausted, detection dropped");
                    continue;
                }
            };

            let mut track = Track::new(id, self.config.history_window);
            track.push(*c, now);
            debug!(id, kind = ?self.config.kind, x = c.x, y = c.y, "track spawned");
            self.tracks.insert(id, track);
        }

        let expire_time = self.config.expire_time;
        self.tracks.retain(|id, t| {
            let alive = now - t.last_seen <= expire_time;
            if !alive {
                debug!(id, "track expired");
            }
            alive
        });

        let mut results = Vec::with_capacity(self.tracks.len());
        for track in self.tracks.values_mut() {
            let is_loitering = is_loitering(&self.config, track, now);
            let time_tracked = track.time_tracked(now);

            if is_loitering && !track.loitering_alerted {
                info!(
                    id = track.id,
                    kind = ?self.config.kind,
                    "loitering for {:.0}s",
                    time_tracked
                );
            }

            let center = track.center();
            results.push(TrackReport {
                id: track.id,
                position: (center.x, center.y),
                time_tracked,
                is_loitering,
                loitering_alerted: track.loitering_alerted,
                kind: self.config.kind,
            });

            if is_loitering {
                track.loitering_alerted = true;
            }
        }

        results
    }

    /// Ids of tracks loitering right now, without touching alert latches.
    pub fn loitering(&self) -> Vec<u32> {
        let now = self.clock.now();

        self.tracks
            .values()
            .filter(|t| is_loitering(&self.config, t, now))
            .map(|t| t.id)
            .collect()
    }

    #[inline]
    pub fn track(&self, id: u32) -> Option<&Track> {
        self.tracks.get(&id)
    }

    #[inline]
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn is_loitering(config: &TrackerConfig, track: &Track, now: f64) -> bool {
    if track.time_tracked(now) < config.loiter_time {
        return false;
    }

    track.extent(now, config.loiter_time) < config.loiter_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::clock::ManualClock;
    use crate::error::Error;

    fn person_at(cx: i32, cy: i32) -> Detection {
        Detection::new("person", 0.9, BBox::ltrb(cx - 10, cy - 20, cx + 10, cy + 20))
    }

    fn tracker(config: TrackerConfig) -> (Tracker<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1000.0);
        (Tracker::new(config, clock.clone()).unwrap(), clock)
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        let bad = TrackerConfig::person().with_expire_time(0.0);
        assert!(matches!(
            Tracker::new(bad, ManualClock::default()),
            Err(Error::InvalidConfig {
                param: "expire_time",
                ..
            })
        ));

        let mut bad = TrackerConfig::person();
        bad.max_distance = -1.0;
        assert!(Tracker::new(bad, ManualClock::default()).is_err());
    }

    #[test]
    fn test_filters_classes() {
        let (mut t, _) = tracker(TrackerConfig::person());
        let dets = vec![
            Detection::new("car", 0.8, BBox::ltrb(0, 0, 50, 50)),
            Detection::new("dog", 0.8, BBox::ltrb(0, 0, 50, 50)),
        ];
        assert!(t.update(&dets).is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn test_keeps_identity_across_small_moves() {
        let (mut t, clock) = tracker(TrackerConfig::person());
        let first = t.update(&[person_at(100, 100)]);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, 1);

        clock.advance(0.5);
        let second = t.update(&[person_at(130, 110)]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, 1);
        assert_eq!(second[0].position, (130.0, 110.0));
    }

    #[test]
    fn test_far_detection_spawns_new_track() {
        let (mut t, clock) = tracker(TrackerConfig::person());
        t.update(&[person_at(100, 100)]);

        clock.advance(0.5);
        let out = t.update(&[person_at(400, 100)]);
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(out[0].position, (100.0, 100.0));
    }

    #[test]
    fn test_greedy_matching_follows_track_order() {
        let (mut t, clock) = tracker(TrackerConfig::person());
        t.update(&[person_at(100, 100), person_at(160, 100)]);

        // Both detections sit closer to track 2, but track 1 picks first.
        clock.advance(0.5);
        let out = t.update(&[person_at(150, 100), person_at(190, 100)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, (150.0, 100.0));
        assert_eq!(out[1].position, (190.0, 100.0));
    }

    #[test]
    fn test_vehicle_ids_start_at_thousand() {
        let (mut t, _) = tracker(TrackerConfig::vehicle());
        let out = t.update(&[
            Detection::new("truck", 0.8, BBox::ltrb(0, 0, 100, 60)),
            Detection::new("person", 0.8, BBox::ltrb(500, 0, 520, 60)),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1000);
        assert_eq!(out[0].kind, EntityKind::Vehicle);
    }

    #[test]
    fn test_expired_ids_are_not_reused() {
        let config = TrackerConfig::person().with_expire_time(1.0);
        let (mut t, clock) = tracker(config);
        t.update(&[person_at(100, 100)]);

        clock.advance(2.0);
        assert!(t.update(&[]).is_empty());

        let out = t.update(&[person_at(100, 100)]);
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn test_ids_wrap_within_range_and_skip_live_tracks() {
        let config = TrackerConfig::person().with_ids(10, 3).with_expire_time(1.0);
        let (mut t, clock) = tracker(config);

        let out = t.update(&[person_at(100, 100), person_at(400, 100), person_at(700, 100)]);
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);

        // Range exhausted while every id is live.
        let out = t.update(&[
            person_at(100, 100),
            person_at(400, 100),
            person_at(700, 100),
            person_at(1000, 100),
        ]);
        assert_eq!(out.len(), 3);

        // Only track 11 keeps being seen, the next spawn wraps past it.
        clock.advance(0.5);
        t.update(&[person_at(400, 100)]);
        clock.advance(0.8);
        let out = t.update(&[person_at(400, 100)]);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![11]);

        let out = t.update(&[person_at(400, 100), person_at(100, 400), person_at(700, 400)]);
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert!(ids.iter().all(|id| t.config().id_range().contains(id)));
    }

    #[test]
    fn test_rejects_bad_id_range() {
        let zero = TrackerConfig::person().with_ids(1, 0);
        assert!(matches!(
            zero.validate(),
            Err(Error::InvalidConfig { param: "id_span", .. })
        ));

        let overflow = TrackerConfig::vehicle().with_ids(u32::MAX - 5, 10);
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn test_loitering_latch_and_accessor() {
        let config = TrackerConfig::person().with_loiter(5.0, 20.0);
        let (mut t, clock) = tracker(config);

        let mut transitions = Vec::new();
        for _ in 0..30 {
            let out = t.update(&[person_at(200, 200)]);
            transitions.push((out[0].is_loitering, out[0].loitering_alerted));
            clock.advance(0.5);
        }

        let first = transitions.iter().position(|&(l, _)| l).unwrap();
        assert!(!transitions[first].1);
        assert!(transitions[first + 1..].iter().all(|&(l, a)| l && a));
        assert_eq!(t.loitering(), vec![1]);
    }
}
