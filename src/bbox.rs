use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Left-top-right-bottom format in image pixels, `[x1, y1, x2, y2]`
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BBox([i32; 4]);

impl From<BBox> for [i32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.0
    }
}

impl From<(i32, i32, i32, i32)> for BBox {
    fn from((x1, y1, x2, y2): (i32, i32, i32, i32)) -> Self {
        BBox([x1, y1, x2, y2])
    }
}

impl BBox {
    #[inline]
    pub fn ltrb(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        BBox([x1, y1, x2, y2])
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32; 4] {
        &self.0
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> i32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> i32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.0[2] - self.0[0]
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.0[3] - self.0[1]
    }

    /// Detector output must satisfy `x1 < x2 && y1 < y2`; callers filter
    /// with this before handing boxes to a tracker.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0[0] < self.0[2] && self.0[1] < self.0[3]
    }

    /// Exact midpoint, used as the track position.
    #[inline]
    pub fn centroid(&self) -> na::Point2<f64> {
        na::Point2::new(
            (self.0[0] as f64 + self.0[2] as f64) / 2.0,
            (self.0[1] as f64 + self.0[3] as f64) / 2.0,
        )
    }

    /// Pixel center with floor division, used for zone checks.
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (
            (self.0[0] + self.0[2]).div_euclid(2),
            (self.0[1] + self.0[3]).div_euclid(2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_and_center() {
        let b = BBox::ltrb(0, 0, 11, 5);
        assert_eq!(b.centroid(), na::Point2::new(5.5, 2.5));
        assert_eq!(b.center(), (5, 2));
        assert_eq!((b.width(), b.height()), (11, 5));
    }

    #[test]
    fn test_center_floors_negative_coordinates() {
        let b = BBox::ltrb(-3, -3, 0, 0);
        assert_eq!(b.center(), (-2, -2));
    }

    #[test]
    fn test_validity() {
        assert!(BBox::ltrb(0, 0, 1, 1).is_valid());
        assert!(!BBox::ltrb(5, 0, 5, 10).is_valid());
        assert!(!BBox::from((0, 10, 10, 2)).is_valid());
    }

    #[test]
    fn test_serializes_as_array() {
        let b = BBox::ltrb(1, 2, 3, 4);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1,2,3,4]");
        let back: BBox = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(back, b);
    }
}
