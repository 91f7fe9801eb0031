use crate::octree::types::{Cell, CellContent, Octree};
use crate::scene::triangle::Triangle;
use crate::spatial::math::{subcell_for, vector::V3c};
use crate::spatial::TOLERANCE;

impl Octree {
    /// Provides the nearest triangle hit by the ray together with the impact
    /// point, skipping `last_hit` so a ray leaving a surface never reports
    /// the surface it originates on.
    pub fn intersection(
        &self,
        triangles: &[Triangle],
        origin: V3c<f64>,
        direction: V3c<f64>,
        last_hit: Option<u32>,
    ) -> Option<(u32, V3c<f64>)> {
        self.root
            .intersection(triangles, origin, direction, last_hit, origin)
    }
}

impl Cell {
    /// `start` is a point known to lie within this cell; the root is entered
    /// at the ray origin.
    pub(in crate::octree) fn intersection(
        &self,
        triangles: &[Triangle],
        origin: V3c<f64>,
        direction: V3c<f64>,
        last_hit: Option<u32>,
        start: V3c<f64>,
    ) -> Option<(u32, V3c<f64>)> {
        match &self.content {
            CellContent::Items(items) => {
                self.nearest_in_leaf(items, triangles, origin, direction, last_hit)
            }
            CellContent::Subcells(subcells) => {
                self.walk_subcells(subcells, triangles, origin, direction, last_hit, start)
            }
        }
    }

    fn nearest_in_leaf(
        &self,
        items: &[u32],
        triangles: &[Triangle],
        origin: V3c<f64>,
        direction: V3c<f64>,
        last_hit: Option<u32>,
    ) -> Option<(u32, V3c<f64>)> {
        let mut nearest_distance = f64::INFINITY;
        let mut nearest = None;
        for &item in items {
            if last_hit == Some(item) {
                continue;
            }
            if let Some(distance) = triangles[item as usize].intersection(origin, direction) {
                if distance < nearest_distance {
                    let hit = origin + direction * distance;
                    // a hit outside this cell belongs to a neighbor leaf
                    if self.bound.contains_point(&hit, TOLERANCE) {
                        nearest = Some((item, hit));
                        nearest_distance = distance;
                    }
                }
            }
        }
        nearest
    }

    /// Visits subcells in the order the ray crosses their interior
    /// partitions. Every step flips exactly one index bit in the direction of
    /// travel, so no subcell is ever revisited.
    fn walk_subcells(
        &self,
        subcells: &[Option<Box<Cell>>; 8],
        triangles: &[Triangle],
        origin: V3c<f64>,
        direction: V3c<f64>,
        last_hit: Option<u32>,
        start: V3c<f64>,
    ) -> Option<(u32, V3c<f64>)> {
        let midpoint = self.bound.midpoint();
        let mut subcell = subcell_for(&start, &midpoint);
        let mut cell_position = start;

        loop {
            if let Some(child) = &subcells[subcell as usize] {
                let found =
                    child.intersection(triangles, origin, direction, last_hit, cell_position);
                if found.is_some() {
                    return found;
                }
            }

            // find the face of the current subcell the ray crosses first;
            // heading outward on an axis means the outer face, otherwise the
            // interior partition at the midpoint
            let mut step = f64::INFINITY;
            let mut axis = 0usize;
            for m in 0..3 {
                let high = (subcell >> m) & 1 == 1;
                let face = if (direction[m] >= 0.) == high {
                    self.bound.min_position[m] + if high { self.bound.size } else { 0. }
                } else {
                    midpoint[m]
                };
                // a zero direction component yields ±inf/NaN and is never the minimum
                let distance = (face - origin[m]) / direction[m];
                if distance < step {
                    step = distance;
                    axis = m;
                }
            }

            // crossing the outer face on the stepped axis leaves this cell
            if (direction[axis] >= 0.) == ((subcell >> axis) & 1 == 1) {
                return None;
            }

            subcell ^= 1 << axis;
            cell_position = origin + direction * step;
        }
    }
}
