use crate::random::Random;
use crate::scene::triangle::Triangle;
use crate::spatial::math::vector::V3c;

/// Floor for the squared emitter distance in the solid angle estimate.
const DISTANCE2_MIN: f64 = 1e-6;

/// An ephemeral pairing of a triangle and a world position on it: the local
/// shading model of the renderer lives here.
pub struct SurfacePoint<'a> {
    triangle: &'a Triangle,
    triangle_id: u32,
    position: V3c<f64>,
}

impl<'a> SurfacePoint<'a> {
    pub fn new(triangle: &'a Triangle, triangle_id: u32, position: V3c<f64>) -> Self {
        Self {
            triangle,
            triangle_id,
            position,
        }
    }

    pub fn position(&self) -> V3c<f64> {
        self.position
    }

    pub fn hit_id(&self) -> u32 {
        self.triangle_id
    }

    /// Emitted radiance toward `to_position`. Only the front face emits;
    /// `is_solid_angle` scales by the subtended solid angle of the triangle
    /// as seen from the target.
    pub fn emission(
        &self,
        to_position: V3c<f64>,
        out_direction: V3c<f64>,
        is_solid_angle: bool,
    ) -> V3c<f64> {
        let ray = to_position - self.position;
        let distance2 = ray.dot(&ray);
        let cos_area = out_direction.dot(&self.triangle.normal()) * self.triangle.area();

        let solid_angle = if is_solid_angle {
            cos_area / distance2.max(DISTANCE2_MIN)
        } else {
            1.
        };

        if cos_area > 0. {
            self.triangle.emissivity() * solid_angle
        } else {
            V3c::unit(0.)
        }
    }

    /// Incoming radiance diffusely reflected toward `out_direction`; zero
    /// when in and out directions are on opposite sides of the surface.
    pub fn reflection(
        &self,
        in_direction: V3c<f64>,
        in_radiance: V3c<f64>,
        out_direction: V3c<f64>,
    ) -> V3c<f64> {
        let normal = self.triangle.normal();
        let in_dot = in_direction.dot(&normal);
        let out_dot = out_direction.dot(&normal);

        if (in_dot < 0.) != (out_dot < 0.) {
            return V3c::unit(0.);
        }
        self.triangle.reflectivity() * in_radiance * (in_dot.abs() / std::f64::consts::PI)
    }

    /// Samples the continuation of a path arriving along `in_direction`:
    /// Russian roulette on the mean reflectivity, then a cosine-weighted
    /// hemisphere direction about the normal facing the in side. The returned
    /// color scale divides out the survival probability, so the π and cosine
    /// factors of the diffuse reflection cancel against the sampling density.
    pub fn next_direction(
        &self,
        random: &mut Random,
        in_direction: V3c<f64>,
    ) -> Option<(V3c<f64>, V3c<f64>)> {
        let reflectivity = self.triangle.reflectivity();
        let reflectivity_mean = reflectivity.dot(&V3c::unit(1.)) / 3.;

        if random.real01() >= reflectivity_mean {
            return None;
        }
        let color = reflectivity / reflectivity_mean;

        let phi = 2. * std::f64::consts::PI * random.real01();
        let sine = random.real01().sqrt();
        let x = phi.cos() * sine;
        let y = phi.sin() * sine;
        let z = (1. - sine * sine).sqrt();

        let mut normal = self.triangle.normal();
        let tangent = self.triangle.tangent();
        if normal.dot(&in_direction) < 0. {
            normal = -normal;
        }

        let out_direction = tangent * x + normal.cross(tangent) * y + normal * z;
        if out_direction == V3c::unit(0.) {
            return None;
        }
        Some((out_direction, color))
    }
}
