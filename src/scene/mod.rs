pub mod camera;
pub mod surface;
pub mod triangle;


use crate::octree::Octree;
use crate::random::Random;
use crate::spatial::math::vector::V3c;
use triangle::Triangle;

/// Upper limit on the triangle soup (2²⁴); the model reader stops there.
pub const MAX_TRIANGLES: usize = 0x0100_0000;

/// The renderable content: a triangle soup with its emitter sublist, the
/// sky/ground background, and the spatial index built over everything.
///
/// Built once from the model file; read-only for the rest of the render.
pub struct Scene {
    triangles: Vec<Triangle>,
    emitters: Vec<u32>,
    sky_emission: V3c<f64>,
    ground_reflection: V3c<f64>,
    index: Octree,
}

impl Scene {
    pub fn new(
        sky_emission: V3c<f64>,
        ground_reflection: V3c<f64>,
        triangles: Vec<Triangle>,
        eye_position: V3c<f64>,
    ) -> Self {
        let sky_emission = sky_emission.max_components(V3c::unit(0.));
        let ground_reflection =
            ground_reflection.clamped(V3c::unit(0.), V3c::unit(1.)) * sky_emission;

        let emitters = triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.is_emitter())
            .map(|(id, _)| id as u32)
            .collect();
        let index = Octree::new(eye_position, &triangles);
        log::debug!(
            "spatial index over {} triangles built, depth {}",
            triangles.len(),
            index.depth()
        );

        Self {
            triangles,
            emitters,
            sky_emission,
            ground_reflection,
            index,
        }
    }

    /// Nearest triangle hit by the ray, excluding `last_hit`.
    pub fn intersection(
        &self,
        origin: V3c<f64>,
        direction: V3c<f64>,
        last_hit: Option<u32>,
    ) -> Option<(u32, V3c<f64>)> {
        self.index
            .intersection(&self.triangles, origin, direction, last_hit)
    }

    /// Uniformly chosen emitter with a uniformly sampled point on it.
    pub fn emitter(&self, random: &mut Random) -> Option<(u32, V3c<f64>)> {
        if self.emitters.is_empty() {
            return None;
        }
        let index = ((random.real01() * self.emitters.len() as f64) as usize)
            .min(self.emitters.len() - 1);
        let id = self.emitters[index];
        Some((id, self.triangles[id as usize].sample_point(random)))
    }

    pub fn emitters_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn triangles_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle(&self, id: u32) -> &Triangle {
        &self.triangles[id as usize]
    }

    /// Background radiance for a missed ray. `back_direction` points from the
    /// miss toward the eye, so a downward back direction means the ray looked
    /// up into the sky.
    pub fn default_emission(&self, back_direction: V3c<f64>) -> V3c<f64> {
        if back_direction.y < 0. {
            self.sky_emission
        } else {
            self.ground_reflection
        }
    }
}
