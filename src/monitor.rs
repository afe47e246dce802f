use crate::clock::Clock;
use crate::config::Config;
use crate::detection::Detection;
use crate::error::Result;
use crate::track::TrackReport;
use crate::tracker::Tracker;
use crate::zone::ZoneRegistry;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Alert-worthy state change produced by one `Monitor::process` cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SecurityEvent {
    Loitering { id: u32, duration: f64 },
    ParkedVehicle { id: u32, duration: f64 },
    ZoneIntrusion { zone: String, center: (i32, i32) },
    Crowd { count: usize },
}

impl SecurityEvent {
    pub fn title(&self) -> &'static str {
        match self {
            SecurityEvent::Loitering { .. } => "Loitering Detected",
            SecurityEvent::ParkedVehicle { .. } => "Vehicle Loitering",
            SecurityEvent::ZoneIntrusion { .. } => "Zone Intrusion!",
            SecurityEvent::Crowd { .. } => "Crowd Detected",
        }
    }

    pub fn message(&self) -> String {
        match self {
            SecurityEvent::Loitering { id, duration } => {
                format!("Person #{} in area for {:.0}s", id, duration)
            }
            SecurityEvent::ParkedVehicle { id, duration } => {
                format!("Vehicle #{} stationary for {:.0}s", id, duration)
            }
            SecurityEvent::ZoneIntrusion { zone, .. } => {
                format!("Entry to restricted zone: {}", zone)
            }
            SecurityEvent::Crowd { count } => format!("{} people detected", count),
        }
    }
}

/// Notification sink collaborator.
pub trait AlertSink {
    fn notify(&mut self, event: &SecurityEvent);
}

/// Sink that only writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn notify(&mut self, event: &SecurityEvent) {
        warn!(title = event.title(), "{}", event.message());
    }
}

impl AlertSink for Vec<SecurityEvent> {
    fn notify(&mut self, event: &SecurityEvent) {
        self.push(event.clone());
    }
}

/// One-shot crowd alert, re-armed once the count drops below the threshold.
#[derive(Debug, Clone)]
pub struct CrowdDetector {
    threshold: usize,
    alerted: bool,
}

impl CrowdDetector {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            alerted: false,
        }
    }

    pub fn update(&mut self, count: usize) -> Option<SecurityEvent> {
        if count < self.threshold {
            self.alerted = false;
            return None;
        }

        if self.alerted {
            return None;
        }

        self.alerted = true;
        Some(SecurityEvent::Crowd { count })
    }
}

/// Owns every per-camera detector so callers pass one context object around
/// instead of reaching for shared instances.
pub struct Monitor<C: Clock + Clone> {
    persons: Tracker<C>,
    vehicles: Tracker<C>,
    zones: ZoneRegistry<C>,
    crowd: CrowdDetector,
}

impl<C: Clock + Clone> Monitor<C> {
    pub fn new(config: &Config, clock: C) -> Result<Self> {
        config.validate()?;

        let mut zones = ZoneRegistry::with_cooldown(clock.clone(), config.zones.cooldown_seconds)?;
        for zone in &config.zones.zones {
            zones.insert(zone.clone());
        }

        Ok(Self {
            persons: Tracker::new(config.person.clone(), clock.clone())?,
            vehicles: Tracker::new(config.vehicle.clone(), clock)?,
            zones,
            crowd: CrowdDetector::new(config.crowd_threshold),
        })
    }

    #[inline]
    pub fn persons(&self) -> &Tracker<C> {
        &self.persons
    }

    #[inline]
    pub fn vehicles(&self) -> &Tracker<C> {
        &self.vehicles
    }

    #[inline]
    pub fn zones(&self) -> &ZoneRegistry<C> {
        &self.zones
    }

    #[inline]
    pub fn zones_mut(&mut self) -> &mut ZoneRegistry<C> {
        &mut self.zones
    }

    /// Runs one detection cycle through every detector.
    pub fn process(&mut self, detections: &[Detection]) -> Vec<SecurityEvent> {
        let persons = self.persons.update(detections);
        let vehicles = self.vehicles.update(detections);

        let mut events: Vec<SecurityEvent> = persons
            .iter()
            .filter(|r| r.should_alert())
            .map(|r: &TrackReport| SecurityEvent::Loitering {
                id: r.id,
                duration: r.time_tracked,
            })
            .collect();

        events.extend(
            vehicles
                .iter()
                .filter(|r| r.should_alert())
                .map(|r| SecurityEvent::ParkedVehicle {
                    id: r.id,
                    duration: r.time_tracked,
                }),
        );

        let person_count = detections.iter().filter(|d| d.is_person()).count();
        events.extend(self.crowd.update(person_count));

        events.extend(
            self.zones
                .check_intrusions(detections)
                .into_iter()
                .map(|i| SecurityEvent::ZoneIntrusion {
                    zone: i.zone,
                    center: i.center,
                }),
        );

        debug!(
            persons = persons.len(),
            vehicles = vehicles.len(),
            events = events.len(),
            "cycle processed"
        );

        events
    }

    /// `process` followed by delivery of every event to `sink`.
    pub fn dispatch<S: AlertSink>(&mut self, detections: &[Detection], sink: &mut S) -> usize {
        let events = self.process(detections);
        for event in &events {
            sink.notify(event);
        }

        events.len()
    }
}
