use crate::random::Random;
use crate::spatial::math::vector::V3c;
use crate::spatial::{Aabb, TOLERANCE};

/// Determinant threshold below which a ray is treated as parallel (2⁻²⁰).
pub(crate) const EPSILON: f64 = 1.0 / 1048576.0;

/// A triangle with a diffuse material: the only scene primitive.
///
/// Vertices are not shared between triangles. Reflectivity is clamped into
/// [0,1] per channel and emissivity to non-negative values at construction,
/// so every constructed triangle satisfies the material invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    vertices: [V3c<f64>; 3],
    reflectivity: V3c<f64>,
    emissivity: V3c<f64>,
}

impl Triangle {
    pub fn new(vertices: [V3c<f64>; 3], reflectivity: V3c<f64>, emissivity: V3c<f64>) -> Self {
        Self {
            vertices,
            reflectivity: reflectivity.clamped(V3c::unit(0.), V3c::unit(1.)),
            emissivity: emissivity.max_components(V3c::unit(0.)),
        }
    }

    pub fn reflectivity(&self) -> V3c<f64> {
        self.reflectivity
    }

    pub fn emissivity(&self) -> V3c<f64> {
        self.emissivity
    }

    /// Axis-aligned bound over the vertices, inflated by TOLERANCE on every
    /// face so boundary comparisons against cell bounds have slack.
    pub fn bound(&self) -> Aabb {
        Aabb::enveloping(&self.vertices).expanded(TOLERANCE)
    }

    /// Möller-Trumbore ray intersection; the distance along the ray to the
    /// hit point, if there is one ahead of the origin.
    pub fn intersection(&self, origin: V3c<f64>, direction: V3c<f64>) -> Option<f64> {
        let edge0 = self.vertices[1] - self.vertices[0];
        let edge3 = self.vertices[2] - self.vertices[0];

        let p = direction.cross(edge3);
        let determinant = edge0.dot(&p);
        if determinant.abs() < EPSILON {
            return None;
        }
        let inverse_determinant = 1. / determinant;

        let to_origin = origin - self.vertices[0];
        let u = to_origin.dot(&p) * inverse_determinant;
        if !(0. ..=1.).contains(&u) {
            return None;
        }

        let q = to_origin.cross(edge0);
        let v = direction.dot(&q) * inverse_determinant;
        if v < 0. || u + v > 1. {
            return None;
        }

        let distance = edge3.dot(&q) * inverse_determinant;
        (distance >= 0.).then_some(distance)
    }

    /// Uniformly distributed point on the triangle surface.
    pub fn sample_point(&self, random: &mut Random) -> V3c<f64> {
        let sqr1 = random.real01().sqrt();
        let r2 = random.real01();
        let a = 1. - sqr1;
        let b = (1. - r2) * sqr1;

        let edge0 = self.vertices[1] - self.vertices[0];
        let edge3 = self.vertices[2] - self.vertices[0];
        self.vertices[0] + edge0 * a + edge3 * b
    }

    pub fn normal(&self) -> V3c<f64> {
        let edge0 = self.vertices[1] - self.vertices[0];
        let edge1 = self.vertices[2] - self.vertices[1];
        edge0.cross(edge1).normalized()
    }

    pub fn tangent(&self) -> V3c<f64> {
        (self.vertices[1] - self.vertices[0]).normalized()
    }

    pub fn area(&self) -> f64 {
        let edge0 = self.vertices[1] - self.vertices[0];
        let edge1 = self.vertices[2] - self.vertices[1];
        edge0.cross(edge1).length() * 0.5
    }

    /// Zero-area triangles never emit, whatever their emissivity says.
    pub fn is_emitter(&self) -> bool {
        self.emissivity != V3c::unit(0.) && self.area() > 0.
    }
}
