pub mod raytracing;
pub mod types;

mod tests;

pub use types::Octree;

use crate::scene::triangle::Triangle;
use crate::spatial::math::vector::V3c;
use crate::spatial::{Aabb, Cube, TOLERANCE};
use types::{Cell, CellContent, MAX_ITEMS, MAX_LEVELS};

impl Octree {
    /// Builds the index over all triangles, with the root cube enveloping
    /// every item bound plus the eye position.
    pub fn new(eye_position: V3c<f64>, triangles: &[Triangle]) -> Self {
        let mut envelope = Aabb::new(eye_position, eye_position);
        for triangle in triangles {
            envelope.include(&triangle.bound());
        }

        let items = (0..triangles.len() as u32).collect();
        Self {
            root: Cell::new(Cube::enclosing(&envelope), items, triangles, 0),
        }
    }

    /// Number of levels in the built tree; a lone leaf root counts as 1.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
}

impl Cell {
    /// Subdivides while the cell is overpopulated and the level allows it.
    ///
    /// Curtailment guards against unbounded recursion: a second subcell
    /// inheriting the parent's entire item set, or a subcell side shrinking
    /// below 4·TOLERANCE, forces its children to become leaves.
    fn new(bound: Cube, items: Vec<u32>, triangles: &[Triangle], level: u32) -> Self {
        if items.len() <= MAX_ITEMS || level >= MAX_LEVELS - 1 {
            return Self {
                bound,
                content: CellContent::Items(items),
            };
        }

        let mut subcells: [Option<Box<Cell>>; 8] = Default::default();
        let mut inheritances = 0u32;
        for (subcell, slot) in subcells.iter_mut().enumerate() {
            let subcell_bound = bound.subcell_bounds(subcell as u8);
            let subcell_aabb = subcell_bound.as_aabb();
            let subcell_items: Vec<u32> = items
                .iter()
                .copied()
                .filter(|&item| triangles[item as usize].bound().overlaps(&subcell_aabb))
                .collect();
            if subcell_items.is_empty() {
                continue;
            }

            inheritances += (subcell_items.len() == items.len()) as u32;
            let curtailed = inheritances > 1 || subcell_bound.size < TOLERANCE * 4.;
            let next_level = if curtailed { MAX_LEVELS } else { level + 1 };
            *slot = Some(Box::new(Cell::new(
                subcell_bound,
                subcell_items,
                triangles,
                next_level,
            )));
        }

        Self {
            bound,
            content: CellContent::Subcells(subcells),
        }
    }

    fn depth(&self) -> u32 {
        match &self.content {
            CellContent::Items(_) => 1,
            CellContent::Subcells(subcells) => {
                1 + subcells
                    .iter()
                    .flatten()
                    .map(|subcell| subcell.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}
