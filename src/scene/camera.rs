use crate::image::Image;
use crate::random::Random;
use crate::scene::Scene;
use crate::spatial::math::vector::V3c;
use crate::tracer::RayTracer;

pub(crate) const VIEW_ANGLE_MIN_DEGREES: f64 = 10.;
pub(crate) const VIEW_ANGLE_MAX_DEGREES: f64 = 160.;

/// Eye position with an orthonormal view frame and a field of view; produces
/// one frame of jittered eye rays per render iteration.
pub struct Camera {
    view_position: V3c<f64>,
    view_direction: V3c<f64>,
    view_angle: f64,
    right: V3c<f64>,
    up: V3c<f64>,
}

impl Camera {
    /// A zero view direction falls back to +z; the view angle is taken in
    /// degrees and clamped into [10°, 160°].
    pub fn new(view_position: V3c<f64>, view_direction: V3c<f64>, view_angle_degrees: f64) -> Self {
        let view_direction = {
            let unit = view_direction.normalized();
            if unit == V3c::unit(0.) {
                V3c::new(0., 0., 1.)
            } else {
                unit
            }
        };
        let view_angle = view_angle_degrees
            .clamp(VIEW_ANGLE_MIN_DEGREES, VIEW_ANGLE_MAX_DEGREES)
            .to_radians();

        let mut right = V3c::new(0., 1., 0.).cross(view_direction).normalized();
        let up;
        if right != V3c::unit(0.) {
            up = view_direction.cross(right).normalized();
        } else {
            // view direction is colinear with world y
            up = V3c::new(0., 0., if view_direction.y < 0. { 1. } else { -1. });
            right = up.cross(view_direction).normalized();
        }

        Self {
            view_position,
            view_direction,
            view_angle,
            right,
            up,
        }
    }

    pub fn view_position(&self) -> V3c<f64> {
        self.view_position
    }

    pub fn view_direction(&self) -> V3c<f64> {
        self.view_direction
    }

    pub fn right(&self) -> V3c<f64> {
        self.right
    }

    pub fn up(&self) -> V3c<f64> {
        self.up
    }

    /// View angle in radians.
    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    /// Accumulates one sample per pixel into the image, row-major over the
    /// full grid with sub-pixel jitter. The y aspect factor keeps pixels
    /// square for non-square images.
    pub fn frame(&self, scene: &Scene, random: &mut Random, image: &mut Image) {
        let tracer = RayTracer::new(scene);
        let width = image.width();
        let height = image.height();
        let aspect = height as f64 / width as f64;
        let tan_view = (self.view_angle * 0.5).tan();

        for y in 0..height {
            for x in 0..width {
                let x_coefficient = ((x as f64 + random.real01()) * 2. / width as f64) - 1.;
                let y_coefficient = ((y as f64 + random.real01()) * 2. / height as f64) - 1.;

                let offset = self.right * x_coefficient + self.up * (y_coefficient * aspect);
                let sample_direction =
                    (self.view_direction + (offset * tan_view)).normalized();

                let radiance = tracer.radiance(self.view_position, sample_direction, random, None);
                image.add_to_pixel(x, y, radiance);
            }
        }
    }
}
