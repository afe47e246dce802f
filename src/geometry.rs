use std::iter;

use crate::Float;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

#[inline(always)]
fn lower<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline(always)]
fn upper<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

/// Ray-casting point-in-polygon test over the polygon's vertices in order.
/// Polygons with fewer than 3 vertices contain nothing.
pub fn in_bounds<T, I>(p: &na::Point2<T>, poly: I) -> bool
where
    T: Float,
    I: IntoIterator<Item = na::Point2<T>>,
{
    let mut vertices = poly.into_iter();
    let first = match vertices.next() {
        Some(first) => first,
        None => return false,
    };

    let mut edges = 0usize;
    let mut inside = false;
    let mut p1 = first;
    let mut xints = T::zero();

    for p2 in vertices.chain(iter::once(first)) {
        edges += 1;

        if p.y > lower(p1.y, p2.y) && p.y <= upper(p1.y, p2.y) && p.x <= upper(p1.x, p2.x) {
            if p1.y != p2.y {
                xints = (p.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            }

            if p1.x == p2.x || p.x <= xints {
                inside = !inside;
            }
        }

        p1 = p2;
    }

    edges >= 3 && inside
}

/// Closed time interval in seconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Widens both sides by `pad`, flooring the start at 0 and capping the end
    /// at `limit`. The end never falls below the start.
    pub fn padded(&self, pad: f64, limit: f64) -> Self {
        let start = (self.start - pad).max(0.0);
        let end = (self.end + pad).min(limit).max(start);

        Self { start, end }
    }

    /// Extends only the end, used for gap tolerance when sweeping.
    #[inline]
    pub fn extended(&self, gap: f64) -> Self {
        Self {
            start: self.start,
            end: self.end + gap,
        }
    }
}
