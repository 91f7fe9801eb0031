pub mod vector;

use crate::spatial::math::vector::V3c;

/// Each cell is separated into 8 subcells; bit m of a subcell index selects
/// the high half of axis m, so x maps to bit 0, y to bit 1 and z to bit 2.
pub(crate) fn subcell_offset(subcell: u8) -> V3c<f64> {
    match subcell {
        0 => V3c::new(0., 0., 0.),
        1 => V3c::new(1., 0., 0.),
        2 => V3c::new(0., 1., 0.),
        3 => V3c::new(1., 1., 0.),
        4 => V3c::new(0., 0., 1.),
        5 => V3c::new(1., 0., 1.),
        6 => V3c::new(0., 1., 1.),
        7 => V3c::new(1., 1., 1.),
        _ => panic!("Invalid subcell index provided for spatial reference!"),
    }
}

/// Maps a point to the subcell it occupies, relative to the cell midpoint.
pub(crate) fn subcell_for(point: &V3c<f64>, midpoint: &V3c<f64>) -> u8 {
    (point.x >= midpoint.x) as u8
        | (((point.y >= midpoint.y) as u8) << 1)
        | (((point.z >= midpoint.z) as u8) << 2)
}
