//! Oriented bounding rectangles and the separating-axis overlap test.

use glam::DVec2;

use crate::TrigTable;

/// A rectangle of `length × width` centred on `center`, with its length axis
/// pointing along `rotation`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedRect {
    center: DVec2,
    /// Unit vector along the length axis.
    forward: DVec2,
    /// Unit vector along the width axis.
    left: DVec2,
    half_length: f64,
    half_width: f64,
}

impl OrientedRect {
    pub fn new(center: DVec2, length: f64, width: f64, rotation: f64, trig: &TrigTable) -> Self {
        let forward = trig.heading(rotation);
        Self {
            center,
            forward,
            left: forward.perp(),
            half_length: 0.5 * length,
            half_width: 0.5 * width,
        }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Diagonal length, the largest distance between any two points of the
    /// rectangle.
    #[inline]
    pub fn span(&self) -> f64 {
        2.0 * DVec2::new(self.half_length, self.half_width).length()
    }

    /// The four corners, counter-clockwise from front-left.
    pub fn corners(&self) -> [DVec2; 4] {
        let l = self.forward * self.half_length;
        let w = self.left * self.half_width;
        [
            self.center + l + w,
            self.center - l + w,
            self.center - l - w,
            self.center + l - w,
        ]
    }

    /// Half the extent of the rectangle's projection onto unit `axis`.
    #[inline]
    fn projected_radius(&self, axis: DVec2) -> f64 {
        self.half_length * self.forward.dot(axis).abs() + self.half_width * self.left.dot(axis).abs()
    }

    /// `true` if the interiors of the two rectangles intersect.
    ///
    /// Separating-axis test over the four edge normals.  Rectangles that only
    /// touch along an edge do not overlap.
    pub fn overlaps(&self, other: &OrientedRect) -> bool {
        let offset = other.center - self.center;
        [self.forward, self.left, other.forward, other.left]
            .into_iter()
            .all(|axis| {
                offset.dot(axis).abs() < self.projected_radius(axis) + other.projected_radius(axis)
            })
    }
}
