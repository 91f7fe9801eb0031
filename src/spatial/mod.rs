pub mod math;


use crate::spatial::math::{subcell_offset, vector::V3c};

/// Slack applied to bounds and containment comparisons (2⁻¹⁰).
pub const TOLERANCE: f64 = 1.0 / 1024.0;

/// Axis-aligned box described by its two extreme corners.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_position: V3c<f64>,
    pub max_position: V3c<f64>,
}

impl Aabb {
    pub fn new(min_position: V3c<f64>, max_position: V3c<f64>) -> Self {
        Self {
            min_position,
            max_position,
        }
    }

    /// The smallest box containing every given point.
    pub fn enveloping(points: &[V3c<f64>]) -> Self {
        let mut bound = Aabb::new(points[0], points[0]);
        for point in &points[1..] {
            bound.min_position = bound.min_position.min_components(*point);
            bound.max_position = bound.max_position.max_components(*point);
        }
        bound
    }

    /// Grows the box by the given margin on every face.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_position: self.min_position - V3c::unit(margin),
            max_position: self.max_position + V3c::unit(margin),
        }
    }

    pub fn include(&mut self, other: &Aabb) {
        self.min_position = self.min_position.min_components(other.min_position);
        self.max_position = self.max_position.max_components(other.max_position);
    }

    /// True when the boxes overlap on every axis. Shared faces count as
    /// overlap, so an item touching a cell boundary lands in both cells.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_position.x <= other.max_position.x
            && self.max_position.x >= other.min_position.x
            && self.min_position.y <= other.max_position.y
            && self.max_position.y >= other.min_position.y
            && self.min_position.z <= other.max_position.z
            && self.max_position.z >= other.min_position.z
    }

    pub fn contains_point(&self, point: &V3c<f64>) -> bool {
        point.x >= self.min_position.x
            && point.x <= self.max_position.x
            && point.y >= self.min_position.y
            && point.y <= self.max_position.y
            && point.z >= self.min_position.z
            && point.z <= self.max_position.z
    }
}

/// Axis-aligned cubical bound, as used by octree cells.
#[derive(Default, Clone, Copy, Debug)]
pub struct Cube {
    pub min_position: V3c<f64>,
    pub size: f64,
}

impl Cube {
    /// The cube enveloping the given box: anchored at its lower corner with a
    /// side equal to the longest dimension.
    pub fn enclosing(bound: &Aabb) -> Self {
        let extent = bound.max_position - bound.min_position;
        Self {
            min_position: bound.min_position,
            size: extent.x.max(extent.y).max(extent.z),
        }
    }

    pub fn max_position(&self) -> V3c<f64> {
        self.min_position + V3c::unit(self.size)
    }

    pub(crate) fn midpoint(&self) -> V3c<f64> {
        self.min_position + V3c::unit(self.size / 2.)
    }

    /// Creates a bounding box within the area described by the min_position
    /// and size, for the given subcell.
    pub(crate) fn subcell_bounds(&self, subcell: u8) -> Cube {
        let half = self.size / 2.;
        Cube {
            min_position: self.min_position + (subcell_offset(subcell) * half),
            size: half,
        }
    }

    pub fn as_aabb(&self) -> Aabb {
        Aabb::new(self.min_position, self.max_position())
    }

    /// Containment check with the given margin of slack on every face.
    pub(crate) fn contains_point(&self, point: &V3c<f64>, margin: f64) -> bool {
        self.as_aabb().expanded(margin).contains_point(point)
    }
}
