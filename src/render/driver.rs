//! `requestAnimationFrame` loop for the browser

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::SceneError;

type FrameCallback = Closure<dyn FnMut(f64)>;

#[derive(Default)]
struct LoopState {
    active: Cell<bool>,
    handle: Cell<Option<i32>>,
}

/// Calls a frame handler once per display refresh until the handler
/// returns false or the loop is stopped.
///
/// The closure is created once and re-requested from inside itself; it lives
/// until [`FrameDriver::release`] drops it.
pub struct FrameDriver {
    state: Rc<LoopState>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameDriver {
    /// `on_frame` receives the host timestamp (ms) and returns whether it
    /// wants another frame
    pub fn new<F>(mut on_frame: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let state = Rc::new(LoopState::default());
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let loop_state = Rc::clone(&state);
        let slot = Rc::downgrade(&callback);
        let closure = Closure::wrap(Box::new(move |now: f64| {
            loop_state.handle.set(None);
            if !loop_state.active.get() {
                return;
            }
            if !on_frame(now) {
                loop_state.active.set(false);
                log::debug!("frame loop idle");
                return;
            }

            let Some(slot) = slot.upgrade() else {
                return;
            };
            let requested = slot.borrow().as_ref().map(request_frame);
            match requested {
                Some(Ok(id)) => loop_state.handle.set(Some(id)),
                Some(Err(err)) => {
                    loop_state.active.set(false);
                    log::error!("frame loop stopped: {}", err);
                }
                None => loop_state.active.set(false),
            }
        }) as Box<dyn FnMut(f64)>);
        *callback.borrow_mut() = Some(closure);

        Self { state, callback }
    }

    /// Request the first frame. Returns false if the loop is already running.
    pub fn start(&self) -> Result<bool, SceneError> {
        if self.state.active.get() {
            return Ok(false);
        }

        let slot = self.callback.borrow();
        let closure = slot.as_ref().ok_or(SceneError::Destroyed)?;
        let id = request_frame(closure)?;
        self.state.handle.set(Some(id));
        self.state.active.set(true);
        Ok(true)
    }

    /// Cancel the outstanding frame request, if any
    pub fn stop(&self) {
        self.state.active.set(false);
        if let Some(id) = self.state.handle.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
            }
        }
    }

    /// Stop and drop the closure; the driver cannot be restarted
    pub fn release(&self) {
        self.stop();
        self.callback.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.state.active.get()
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(callback: &FrameCallback) -> Result<i32, SceneError> {
    let window = web_sys::window().ok_or_else(|| SceneError::Host("no global window".to_string()))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|e| SceneError::Host(format!("requestAnimationFrame failed: {:?}", e)))
}
