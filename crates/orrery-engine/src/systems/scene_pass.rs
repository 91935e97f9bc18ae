use glam::{Mat4, Vec3};

use crate::core::body::Body;
use crate::core::system::BodySystem;
use crate::renderer::instance::{SceneBuffer, SceneInstance};
use crate::scene::rig::SceneRigs;

/// Ring tint relative to the body color.
const RING_ALPHA: f32 = 0.8;

/// Fill `buffer` with one sphere per body plus one ring per ringed body,
/// in system order. Expects `rigs` to be synced for this frame.
pub fn build_scene_buffer(system: &BodySystem, rigs: &SceneRigs, buffer: &mut SceneBuffer) {
    buffer.clear();

    for body in system.iter() {
        let Some(matrix) = rigs.body_matrix(body.id) else {
            continue;
        };
        let model = matrix * Mat4::from_scale(Vec3::splat(body.radius));
        let color = body.material.color.to_array();
        if !buffer.push(SceneInstance::sphere(model, color, body.material.texture, body.radius)) {
            log::warn!("scene buffer full at {} instances", buffer.capacity());
            return;
        }

        if body.ring {
            let Some(tilt) = rigs.ring_matrix(body.id) else {
                continue;
            };
            let outer = body.radius * Body::RING_OUTER;
            let model = tilt * Mat4::from_scale(Vec3::splat(outer));
            let [r, g, b, a] = color;
            let ring = SceneInstance::ring(
                model,
                [r, g, b, a * RING_ALPHA],
                body.radius,
                Body::RING_INNER / Body::RING_OUTER,
            );
            if !buffer.push(ring) {
                log::warn!("scene buffer full at {} instances", buffer.capacity());
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TextureId;
    use crate::assets::texture::Material;
    use crate::core::color::Color;
    use crate::renderer::instance::InstanceKind;

    fn system() -> BodySystem {
        let mut sys = BodySystem::new();
        let sun = sys.next_id();
        sys.spawn(
            Body::new(sun, "Sun")
                .with_material(Material::new(Color::css("yellow")).with_texture(TextureId(0)))
                .with_radius(40.0),
        );
        let saturn = sys.next_id();
        sys.spawn(
            Body::new(saturn, "Saturn")
                .with_color(Color::css("khaki"))
                .with_radius(20.0)
                .with_orbit(340.0, 0.009)
                .with_ring(true),
        );
        sys
    }

    #[test]
    fn one_sphere_per_body_plus_rings() {
        let sys = system();
        let rigs = SceneRigs::build(&sys);
        let mut buf = SceneBuffer::new(16);
        build_scene_buffer(&sys, &rigs, &mut buf);

        let kinds: Vec<InstanceKind> = buf.instances.iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, [InstanceKind::Sphere, InstanceKind::Sphere, InstanceKind::Ring]);
        assert_eq!(buf.instances[0].texture(), Some(TextureId(0)));
        assert_eq!(buf.instances[1].texture(), None);
    }

    #[test]
    fn model_matrix_carries_position_and_radius() {
        let sys = system();
        let rigs = SceneRigs::build(&sys);
        let mut buf = SceneBuffer::new(16);
        build_scene_buffer(&sys, &rigs, &mut buf);

        let saturn = buf.instances[1].matrix();
        let pos = saturn.w_axis.truncate();
        assert!((pos - Vec3::new(340.0, 0.0, 0.0)).length() < 1e-3);
        assert!((saturn.x_axis.truncate().length() - 20.0).abs() < 1e-3);

        let ring = buf.instances[2].matrix();
        assert!((ring.x_axis.truncate().length() - 44.0).abs() < 1e-3);
    }

    #[test]
    fn full_buffer_stops_early() {
        let sys = system();
        let rigs = SceneRigs::build(&sys);
        let mut buf = SceneBuffer::new(2);
        build_scene_buffer(&sys, &rigs, &mut buf);
        assert_eq!(buf.instance_count(), 2);
    }

    #[test]
    fn rebuild_replaces_previous_frame() {
        let sys = system();
        let rigs = SceneRigs::build(&sys);
        let mut buf = SceneBuffer::new(16);
        build_scene_buffer(&sys, &rigs, &mut buf);
        build_scene_buffer(&sys, &rigs, &mut buf);
        assert_eq!(buf.instance_count(), 3);
    }
}
