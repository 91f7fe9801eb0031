
use crate::random::Random;
use crate::scene::surface::SurfacePoint;
use crate::scene::Scene;
use crate::spatial::math::vector::V3c;

/// Recursive radiance estimator: BRDF-sampled recursion plus next-event
/// emitter sampling, terminated by Russian roulette in the surface model.
pub struct RayTracer<'a> {
    scene: &'a Scene,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Radiance arriving at `origin` from `direction`. `last_hit` names the
    /// triangle the ray originates on, excluded from intersection to prevent
    /// self-hits; eye rays pass none.
    pub fn radiance(
        &self,
        origin: V3c<f64>,
        direction: V3c<f64>,
        random: &mut Random,
        last_hit: Option<u32>,
    ) -> V3c<f64> {
        let Some((hit_id, hit_position)) = self.scene.intersection(origin, direction, last_hit)
        else {
            return self.scene.default_emission(-direction);
        };

        let surface = SurfacePoint::new(self.scene.triangle(hit_id), hit_id, hit_position);

        // emission is counted from the eye ray only; on later bounces the
        // emitter-sample term already accounts for it
        let local_emission = if last_hit.is_none() {
            surface.emission(origin, -direction, false)
        } else {
            V3c::unit(0.)
        };

        let illumination = self.emitter_sample(direction, &surface, random);

        let reflection = match surface.next_direction(random, -direction) {
            Some((next_direction, color)) => {
                color * self.radiance(surface.position(), next_direction, random, Some(hit_id))
            }
            None => V3c::unit(0.),
        };

        reflection + illumination + local_emission
    }

    /// Direct lighting estimate: one uniformly chosen emitter, shadow-tested
    /// and weighted by the emitter count to stay unbiased.
    fn emitter_sample(
        &self,
        direction: V3c<f64>,
        surface: &SurfacePoint,
        random: &mut Random,
    ) -> V3c<f64> {
        let Some((emitter_id, emitter_position)) = self.scene.emitter(random) else {
            return V3c::unit(0.);
        };

        let emit_direction = (emitter_position - surface.position()).normalized();

        // a nearest hit on the chosen emitter itself counts as a clear path
        let unshadowed = match self
            .scene
            .intersection(surface.position(), emit_direction, Some(surface.hit_id()))
        {
            None => true,
            Some((hit_id, _)) => hit_id == emitter_id,
        };
        if !unshadowed {
            return V3c::unit(0.);
        }

        let emitter =
            SurfacePoint::new(self.scene.triangle(emitter_id), emitter_id, emitter_position);
        let emission_in = emitter.emission(surface.position(), -emit_direction, true);

        surface.reflection(
            emit_direction,
            emission_in * self.scene.emitters_count() as f64,
            -direction,
        )
    }
}
