//! Immediate-mode 2D drawing contract.
//!
//! Mirrors the subset of the browser `CanvasRenderingContext2d` API the 2D
//! orrery uses. The web crate implements it over a real canvas; the
//! [`CommandRecorder`] implementation captures calls for inspection.

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// CSS keyword for `ctx.textAlign`.
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Path/fill/stroke/text drawing surface.
///
/// Calls are infallible: a surface that cannot honour one (e.g. a lost
/// context) skips it.
pub trait Canvas2d {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);

    fn set_fill_style(&mut self, css: &str);
    fn set_stroke_style(&mut self, css: &str);
    fn set_line_width(&mut self, width: f32);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn begin_path(&mut self);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn ellipse(&mut self, x: f32, y: f32, radius_x: f32, radius_y: f32, rotation: f32);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f32),
    Font(String),
    TextAlign(TextAlign),
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    BeginPath,
    Arc { x: f32, y: f32, radius: f32, start: f32, end: f32 },
    Ellipse { x: f32, y: f32, radius_x: f32, radius_y: f32, rotation: f32 },
    Fill,
    Stroke,
    FillText { text: String, x: f32, y: f32 },
}

/// A [`Canvas2d`] that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Every `FillText` as `(text, x, y)`.
    pub fn texts(&self) -> Vec<(&str, f32, f32)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, x, y } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas2d for CommandRecorder {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Scale { x, y });
    }

    fn set_fill_style(&mut self, css: &str) {
        self.commands.push(DrawCommand::FillStyle(css.to_string()));
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.commands.push(DrawCommand::StrokeStyle(css.to_string()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::TextAlign(align));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc { x, y, radius, start, end });
    }

    fn ellipse(&mut self, x: f32, y: f32, radius_x: f32, radius_y: f32, rotation: f32) {
        self.commands.push(DrawCommand::Ellipse { x, y, radius_x, radius_y, rotation });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText { text: text.to_string(), x, y });
    }
}
