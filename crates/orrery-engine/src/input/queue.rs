/// Input events the engine understands, in surface (CSS pixel) coordinates.
///
/// Hosts decide where each listener is attached: pointer-down comes from the
/// canvas, pointer-move and pointer-up from the whole window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the drawing surface.
    PointerDown { x: f32, y: f32 },
    /// Pointer moved anywhere in the window.
    PointerMove { x: f32, y: f32 },
    /// Button released anywhere in the window.
    PointerUp { x: f32, y: f32 },
    /// Wheel scrolled over the surface. Positive `delta_y` scrolls down.
    Wheel { delta_y: f32 },
    /// The window (and with it the drawing surface) changed size.
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// Host callbacks push; the runner drains once per frame, in order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
