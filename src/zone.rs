use std::collections::HashMap;

use crate::clock::Clock;
use crate::detection::Detection;
use crate::error::{ensure_non_negative, Result};
use crate::geometry::in_bounds;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_COOLDOWN_SECONDS: f64 = 10.0;
/// Red in BGR order, the overlay default.
pub const DEFAULT_COLOR: (u8, u8, u8) = (0, 0, 255);

fn default_enabled() -> bool {
    true
}

fn default_color() -> (u8, u8, u8) {
    DEFAULT_COLOR
}

/// Restricted polygon. Fewer than 3 vertices is accepted but never matches,
/// so a polygon can be built up point by point.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    pub points: Vec<(i32, i32)>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_color")]
    pub color: (u8, u8, u8),
}

impl Zone {
    pub fn new(name: impl Into<String>, points: Vec<(i32, i32)>) -> Self {
        Self {
            name: name.into(),
            points,
            enabled: true,
            color: DEFAULT_COLOR,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let vertices = self
            .points
            .iter()
            .map(|&(px, py)| na::Point2::new(px as f64, py as f64));

        in_bounds(&na::Point2::new(x as f64, y as f64), vertices)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Intrusion {
    pub zone: String,
    pub detection: Detection,
    pub center: (i32, i32),
}

/// Named zones plus a per-zone alert cooldown.
///
/// The cooldown is keyed by zone name, not by who entered: a second person
/// walking into the same zone inside the window is not reported.
pub struct ZoneRegistry<C: Clock> {
    zones: Vec<Zone>,
    last_alert: HashMap<String, f64>,
    cooldown_seconds: f64,
    clock: C,
}

impl<C: Clock> ZoneRegistry<C> {
    pub fn new(clock: C) -> Self {
        Self {
            zones: Vec::new(),
            last_alert: HashMap::new(),
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            clock,
        }
    }

    pub fn with_cooldown(clock: C, cooldown_seconds: f64) -> Result<Self> {
        ensure_non_negative("cooldown_seconds", cooldown_seconds)?;

        let mut registry = Self::new(clock);
        registry.cooldown_seconds = cooldown_seconds;
        Ok(registry)
    }

    #[inline]
    pub fn cooldown_seconds(&self) -> f64 {
        self.cooldown_seconds
    }

    pub fn add_zone(&mut self, name: impl Into<String>, points: Vec<(i32, i32)>) -> &Zone {
        self.insert(Zone::new(name, points))
    }

    pub fn add_zone_with_color(
        &mut self,
        name: impl Into<String>,
        points: Vec<(i32, i32)>,
        color: (u8, u8, u8),
    ) -> &Zone {
        let mut zone = Zone::new(name, points);
        zone.color = color;
        self.insert(zone)
    }

    /// Adds `zone`, replacing a same-named zone in place. The cooldown for
    /// that name is kept.
    pub fn insert(&mut self, zone: Zone) -> &Zone {
        let idx = match self.zones.iter().position(|z| z.name == zone.name) {
            Some(idx) => {
                self.zones[idx] = zone;
                idx
            }
            None => {
                self.zones.push(zone);
                self.zones.len() - 1
            }
        };

        &self.zones[idx]
    }

    pub fn remove_zone(&mut self, name: &str) -> Option<Zone> {
        let idx = self.zones.iter().position(|z| z.name == name)?;
        Some(self.zones.remove(idx))
    }

    /// Returns false when no zone has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.zones.iter_mut().find(|z| z.name == name) {
            Some(zone) => {
                zone.enabled = enabled;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn check_intrusions(&mut self, detections: &[Detection]) -> Vec<Intrusion> {
        let now = self.clock.now();
        let mut intrusions = Vec::new();

        for det in detections.iter().filter(|d| d.is_person()) {
            let (cx, cy) = det.center();

            for zone in self.zones.iter().filter(|z| z.enabled) {
                if !zone.contains(cx, cy) {
                    continue;
                }

                let cooled = match self.last_alert.get(&zone.name) {
                    Some(&last) => now - last > self.cooldown_seconds,
                    None => true,
                };

                if !cooled {
                    debug!(zone = %zone.name, "intrusion suppressed by cooldown");
                    continue;
                }

                info!(zone = %zone.name, cx, cy, "zone intrusion");
                self.last_alert.insert(zone.name.clone(), now);
                intrusions.push(Intrusion {
                    zone: zone.name.clone(),
                    detection: det.clone(),
                    center: (cx, cy),
                });
            }
        }

        intrusions
    }
}
