use std::f32::consts::TAU;

use crate::core::body::Body;
use crate::core::system::BodySystem;
use crate::renderer::canvas::{Canvas2d, TextAlign};
use crate::renderer::view::{Surface, ViewState};

pub const BACKGROUND: &str = "black";
pub const ORBIT_STYLE: &str = "rgba(255, 255, 255, 0.2)";
pub const LABEL_STYLE: &str = "white";
pub const LABEL_FONT_PX: f32 = 12.0;
pub const LABEL_FONT_FAMILY: &str = "Arial";
/// Distance from the disc centre to the label baseline, beyond the radius.
pub const LABEL_GAP: f32 = 15.0;
pub const ORBIT_LINE_WIDTH: f32 = 1.0;
pub const RING_LINE_WIDTH: f32 = 2.0;
/// Vertical squash of the 2D ring ellipse.
const RING_FLATTEN: f32 = 0.35;

/// CSS font shorthand for labels at the given zoom factor.
pub fn label_font(factor: f32) -> String {
    format!("{}px {}", LABEL_FONT_PX * factor, LABEL_FONT_FAMILY)
}

/// Draw one frame of the 2D orrery.
///
/// Clears the surface, applies the pan/zoom transform, then draws every body
/// in table order: orbit track, disc, ring, label.
pub fn draw_frame<C: Canvas2d + ?Sized>(
    canvas: &mut C,
    system: &BodySystem,
    view: &ViewState,
    surface: &Surface,
) {
    canvas.set_fill_style(BACKGROUND);
    canvas.fill_rect(0.0, 0.0, surface.width, surface.height);

    canvas.save();
    let origin = view.origin(surface);
    canvas.translate(origin.x, origin.y);
    canvas.scale(view.scale, view.scale);

    let factor = view.stroke_factor();
    for body in system.iter() {
        draw_body(canvas, system, body, factor);
    }

    canvas.restore();
}

fn draw_body<C: Canvas2d + ?Sized>(canvas: &mut C, system: &BodySystem, body: &Body, factor: f32) {
    let pos = system.position(body.id);

    if body.is_orbiting() {
        let center = system.orbit_center(body.id);
        canvas.begin_path();
        canvas.arc(center.x, center.y, body.distance, 0.0, TAU);
        canvas.set_stroke_style(ORBIT_STYLE);
        canvas.set_line_width(ORBIT_LINE_WIDTH * factor);
        canvas.stroke();
    }

    canvas.begin_path();
    canvas.arc(pos.x, pos.y, body.radius, 0.0, TAU);
    canvas.set_fill_style(body.material.color.as_css());
    canvas.fill();

    if body.ring {
        let rx = body.radius * Body::RING_OUTER;
        canvas.begin_path();
        canvas.ellipse(pos.x, pos.y, rx, rx * RING_FLATTEN, body.axial_tilt);
        canvas.set_stroke_style(body.material.color.as_css());
        canvas.set_line_width(RING_LINE_WIDTH * factor);
        canvas.stroke();
    }

    canvas.set_fill_style(LABEL_STYLE);
    canvas.set_font(&label_font(factor));
    canvas.set_text_align(TextAlign::Center);
    canvas.fill_text(&body.name, pos.x, pos.y + body.radius + LABEL_GAP * factor);
}
