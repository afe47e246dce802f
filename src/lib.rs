pub mod analysis;
pub mod bbox;
pub mod clock;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod history;
pub mod merge;
pub mod monitor;
pub mod query;
pub mod report;
pub mod track;
pub mod tracker;
pub mod zone;

pub use bbox::BBox;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use detection::Detection;
pub use error::{Error, Result};
pub use merge::{EvidenceClip, MergeConfig, Moment, MomentMerger};
pub use monitor::{AlertSink, Monitor, SecurityEvent};
pub use query::Sensitivity;
pub use report::{IncidentReport, IncidentType, ReportSynthesizer};
pub use track::{EntityKind, Track, TrackReport};
pub use tracker::{Tracker, TrackerConfig};
pub use zone::{Intrusion, Zone, ZoneRegistry};

use nalgebra as na;
use std::fmt;

pub trait Float:
    num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}

impl<T> Float for T where
    T: num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}
