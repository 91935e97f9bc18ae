/// Solar Canvas: the classic flat orrery.
///
/// Nine bodies on circular orbits around a fixed Sun, drawn every frame on a
/// 2D canvas. Drag to pan, scroll to zoom towards the centre.

use orrery_engine::*;
use orrery_engine::assets::manifest::scatter_angle;

use crate::bodies::BODIES;

pub struct SolarCanvas {
    /// Scatters the starting angles so the planets don't line up.
    seed: u32,
}

impl SolarCanvas {
    pub fn new() -> Self {
        Self::with_seed(orrery_web::host::random_seed())
    }

    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl Simulation for SolarCanvas {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            view: ViewConfig {
                compensate_zoom: cfg!(feature = "compensate-zoom"),
                ..ViewConfig::default()
            },
            ..EngineConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        for (index, row) in BODIES.iter().enumerate() {
            let angle = if row.distance > 0.0 {
                scatter_angle(self.seed, index)
            } else {
                0.0
            };
            let id = ctx.bodies.next_id();
            ctx.bodies.spawn(
                Body::new(id, row.name)
                    .with_color(Color::css(row.color))
                    .with_radius(row.radius)
                    .with_orbit(row.distance, row.speed)
                    .with_angle(angle),
            );
        }
        log::info!("solar-canvas: {} bodies, seed {}", ctx.bodies.len(), self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BODY_COUNT;
    use std::f32::consts::TAU;

    fn init_ctx(seed: u32) -> EngineContext {
        let mut sim = SolarCanvas::with_seed(seed);
        let mut ctx = EngineContext::new(&sim.config());
        sim.init(&mut ctx);
        ctx
    }

    #[test]
    fn spawns_the_whole_table_in_order() {
        let ctx = init_ctx(3);
        assert_eq!(ctx.bodies.len(), BODY_COUNT);
        let names: Vec<&str> = ctx.bodies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names[0], "Sun");
        assert_eq!(names[8], "Neptune");

        let earth = ctx.bodies.find_by_name("Earth").unwrap();
        assert_eq!(earth.radius, 11.0);
        assert_eq!(earth.distance, 140.0);
        assert_eq!(earth.speed, 0.029);
        assert_eq!(earth.material.color.as_css(), "blue");
    }

    #[test]
    fn sun_is_fixed_at_the_origin() {
        let mut ctx = init_ctx(11);
        let sun = ctx.bodies.find_by_name("Sun").unwrap().id;
        for _ in 0..100 {
            ctx.step();
        }
        assert_eq!(ctx.bodies.position(sun), glam::Vec2::ZERO);
    }

    #[test]
    fn starting_angles_are_scattered() {
        let ctx = init_ctx(12345);
        let angles: Vec<f32> = ctx.bodies.iter().skip(1).map(|b| b.angle).collect();
        assert!(angles.iter().all(|a| (0.0..TAU).contains(a)));
        assert!(angles.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn planets_advance_by_their_speed() {
        let mut ctx = init_ctx(1);
        let mercury = ctx.bodies.find_by_name("Mercury").unwrap();
        let (id, start) = (mercury.id, mercury.angle);
        ctx.step();
        let after = ctx.bodies.get(id).unwrap().angle;
        assert!((after - start - 0.047).abs() < 1e-5);
    }

    #[test]
    fn draws_every_label() {
        let ctx = init_ctx(5);
        let mut rec = CommandRecorder::new();
        SolarCanvas::with_seed(5).render(&ctx, &mut rec);
        assert_eq!(rec.texts().len(), BODY_COUNT);
    }

    #[test]
    fn compensation_follows_the_feature() {
        let sim = SolarCanvas::with_seed(0);
        assert_eq!(sim.config().view.compensate_zoom, cfg!(feature = "compensate-zoom"));
    }
}
