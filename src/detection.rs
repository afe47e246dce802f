use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use nalgebra as na;

pub const PERSON: &str = "person";
pub const VEHICLE_CLASSES: [&str; 4] = ["car", "truck", "bus", "motorcycle"];

/// One detector hit: class label, confidence and a pixel bbox
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub class: String,
    pub confidence: f64,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(class: impl Into<String>, confidence: f64, bbox: BBox) -> Self {
        Self {
            class: class.into(),
            confidence,
            bbox,
        }
    }

    #[inline(always)]
    pub fn is_person(&self) -> bool {
        self.class == PERSON
    }

    #[inline(always)]
    pub fn is_vehicle(&self) -> bool {
        VEHICLE_CLASSES.contains(&self.class.as_str())
    }

    #[inline(always)]
    pub fn centroid(&self) -> na::Point2<f64> {
        self.bbox.centroid()
    }

    #[inline(always)]
    pub fn center(&self) -> (i32, i32) {
        self.bbox.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_predicates() {
        let p = Detection::new("person", 0.9, BBox::ltrb(0, 0, 10, 20));
        let c = Detection::new("truck", 0.7, BBox::ltrb(0, 0, 10, 20));
        assert!(p.is_person() && !p.is_vehicle());
        assert!(c.is_vehicle() && !c.is_person());
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{"class":"person","confidence":0.5,"bbox":[1,2,3,4]}"#;
        let det: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(det.bbox, BBox::ltrb(1, 2, 3, 4));
        assert_eq!(serde_json::to_string(&det).unwrap(), json);
    }
}
