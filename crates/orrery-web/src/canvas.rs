use orrery_engine::{Canvas2d, TextAlign};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Canvas2d`] over a browser 2D context. Calls the browser rejects are
/// logged and skipped.
pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
}

fn check(op: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("canvas {op} failed: {e:?}");
    }
}

impl WebCanvas {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Acquire the element's 2D context.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self::new(ctx))
    }
}

impl Canvas2d for WebCanvas {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        check("translate", self.ctx.translate(x as f64, y as f64));
    }

    fn scale(&mut self, x: f32, y: f32) {
        check("scale", self.ctx.scale(x as f64, y as f64));
    }

    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style_str(css);
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style_str(css);
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        check(
            "arc",
            self.ctx
                .arc(x as f64, y as f64, radius as f64, start as f64, end as f64),
        );
    }

    fn ellipse(&mut self, x: f32, y: f32, radius_x: f32, radius_y: f32, rotation: f32) {
        check(
            "ellipse",
            self.ctx.ellipse(
                x as f64,
                y as f64,
                radius_x as f64,
                radius_y as f64,
                rotation as f64,
                0.0,
                std::f64::consts::TAU,
            ),
        );
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        check("fill_text", self.ctx.fill_text(text, x as f64, y as f64));
    }
}
