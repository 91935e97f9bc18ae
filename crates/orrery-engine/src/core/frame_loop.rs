use std::cell::Cell;
use std::rc::Rc;

/// What the host should do after pumping a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Request another frame.
    Continue,
    /// Stop requesting frames; the loop is finished.
    Stop,
}

/// Cancel handle for a running [`FrameLoop`]. Cheap to clone; all clones
/// share one flag.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop. Takes effect at the next pump.
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// A single-threaded tick function driven by a host frame clock.
///
/// The host calls [`FrameLoop::pump`] from its "next frame" callback and
/// schedules another frame only while it returns [`LoopControl::Continue`].
pub struct FrameLoop<F: FnMut(f64)> {
    tick: F,
    handle: LoopHandle,
}

impl<F: FnMut(f64)> FrameLoop<F> {
    pub fn new(tick: F) -> Self {
        Self {
            tick,
            handle: LoopHandle::new(),
        }
    }

    /// A handle that can stop this loop from anywhere on the same thread.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run one frame at host timestamp `now_ms`, unless stopped.
    pub fn pump(&mut self, now_ms: f64) -> LoopControl {
        if self.handle.is_stopped() {
            return LoopControl::Stop;
        }
        (self.tick)(now_ms);
        LoopControl::Continue
    }
}
