//! Browser glue: sizing the canvas, routing DOM events into the engine's
//! input queue, and driving a [`FrameLoop`] from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use orrery_engine::{Canvas2d, FrameLoop, InputEvent, LoopControl, LoopHandle};

use crate::canvas::WebCanvas;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Look up a canvas by element id.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not a canvas")))
}

/// Current window inner size in CSS pixels.
pub fn window_size(window: &Window) -> (f32, f32) {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (read(window.inner_width()), read(window.inner_height()))
}

/// Match the canvas backing store to the window and report the new size.
pub fn fit_to_window(canvas: &HtmlCanvasElement) -> Result<InputEvent, JsValue> {
    let (width, height) = window_size(&window()?);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    Ok(InputEvent::Resize { width, height })
}

type Listener = Closure<dyn FnMut(Event)>;

/// Registered DOM listeners. Dropping this removes them.
pub struct InputListeners {
    registered: Vec<(EventTarget, &'static str, Listener)>,
}

impl InputListeners {
    fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        options: Option<&AddEventListenerOptions>,
        listener: Listener,
    ) -> Result<(), JsValue> {
        let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
        match options {
            Some(opts) => target.add_event_listener_with_callback_and_add_event_listener_options(kind, callback, opts)?,
            None => target.add_event_listener_with_callback(kind, callback)?,
        }
        self.registered.push((target.clone(), kind, listener));
        Ok(())
    }
}

impl Drop for InputListeners {
    fn drop(&mut self) {
        for (target, kind, listener) in &self.registered {
            let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
            let _ = target.remove_event_listener_with_callback(kind, callback);
        }
    }
}

fn pointer(event: &Event) -> Option<(f32, f32)> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|e| (e.client_x() as f32, e.client_y() as f32))
}

/// Wire DOM events to `sink`.
///
/// Pointer-down listens on the canvas; pointer-move and pointer-up on the
/// window, so a drag released outside the canvas still ends. The wheel
/// listener is non-passive and suppresses page scrolling. Resize refits the
/// canvas before reporting the new size.
pub fn attach_input<F>(canvas: &HtmlCanvasElement, sink: F) -> Result<InputListeners, JsValue>
where
    F: Fn(InputEvent) + Clone + 'static,
{
    let win = window()?;
    let mut listeners = InputListeners { registered: Vec::new() };

    let s = sink.clone();
    listeners.add(
        canvas,
        "mousedown",
        None,
        Closure::new(move |e: Event| {
            if let Some((x, y)) = pointer(&e) {
                s(InputEvent::PointerDown { x, y });
            }
        }),
    )?;

    let s = sink.clone();
    listeners.add(
        &win,
        "mousemove",
        None,
        Closure::new(move |e: Event| {
            if let Some((x, y)) = pointer(&e) {
                s(InputEvent::PointerMove { x, y });
            }
        }),
    )?;

    let s = sink.clone();
    listeners.add(
        &win,
        "mouseup",
        None,
        Closure::new(move |e: Event| {
            if let Some((x, y)) = pointer(&e) {
                s(InputEvent::PointerUp { x, y });
            }
        }),
    )?;

    let s = sink.clone();
    let wheel_opts = AddEventListenerOptions::new();
    wheel_opts.set_passive(false);
    listeners.add(
        canvas,
        "wheel",
        Some(&wheel_opts),
        Closure::new(move |e: Event| {
            e.prevent_default();
            if let Some(w) = e.dyn_ref::<WheelEvent>() {
                s(InputEvent::Wheel { delta_y: w.delta_y() as f32 });
            }
        }),
    )?;

    let s = sink;
    let resized = canvas.clone();
    listeners.add(
        &win,
        "resize",
        None,
        Closure::new(move |_: Event| match fit_to_window(&resized) {
            Ok(event) => s(event),
            Err(e) => log::warn!("resize failed: {e:?}"),
        }),
    )?;

    Ok(listeners)
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Drive `tick` from `requestAnimationFrame` until the returned handle is
/// stopped. The tick receives the frame timestamp in milliseconds.
pub fn run_frame_loop<F>(tick: F) -> Result<LoopHandle, JsValue>
where
    F: FnMut(f64) + 'static,
{
    let win = window()?;
    let mut frame_loop = FrameLoop::new(tick);
    let handle = frame_loop.handle();

    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let frame_win = win.clone();
    *callback.borrow_mut() = Some(Closure::new(move |now: f64| {
        match frame_loop.pump(now) {
            LoopControl::Continue => {
                if let Some(cb) = next.borrow().as_ref() {
                    if let Err(e) = request_frame(&frame_win, cb) {
                        log::error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }
            LoopControl::Stop => log::info!("frame loop stopped"),
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        request_frame(&win, cb)?;
    }
    log::info!("frame loop started");
    Ok(handle)
}

/// Random `u32`, for scattering starting angles.
pub fn random_seed() -> u32 {
    (js_sys::Math::random() * u32::MAX as f64) as u32
}

/// A mounted simulation: its DOM listeners plus the running frame loop.
pub struct HostState {
    _listeners: InputListeners,
    handle: LoopHandle,
}

impl HostState {
    /// Size the canvas to the window, wire input to `sink` and start calling
    /// `tick` every animation frame. With `draw_2d`, the tick also receives
    /// the canvas' 2D context; failing to acquire one aborts the mount.
    pub fn mount<S, T>(canvas: &HtmlCanvasElement, draw_2d: bool, sink: S, mut tick: T) -> Result<Self, JsValue>
    where
        S: Fn(InputEvent) + Clone + 'static,
        T: FnMut(f64, Option<&mut dyn Canvas2d>) + 'static,
    {
        let mut surface = if draw_2d {
            match WebCanvas::from_canvas(canvas) {
                Ok(c) => Some(c),
                Err(e) => {
                    log::error!("could not get a 2d context: {e:?}");
                    return Err(e);
                }
            }
        } else {
            None
        };

        sink(fit_to_window(canvas)?);
        let listeners = attach_input(canvas, sink)?;
        let handle = run_frame_loop(move |now| {
            tick(now, surface.as_mut().map(|c| c as &mut dyn Canvas2d));
        })?;

        Ok(Self {
            _listeners: listeners,
            handle,
        })
    }

    /// Stop requesting frames. Listeners stay until the state is dropped.
    pub fn stop(&self) {
        self.handle.stop();
    }
}
