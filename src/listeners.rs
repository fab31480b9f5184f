//! Window-level listener lifetime: gesture tracking and container resizing.
//!
//! A gesture tracks the pointer on `window` so it keeps following when the
//! pointer leaves the item. Those listeners are owned by a [`ListenerGuard`];
//! dropping the guard detaches them.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, Window};

const MOVE_EVENTS: [&str; 2] = ["mousemove", "touchmove"];
const END_EVENTS: [&str; 2] = ["mouseup", "touchend"];

/// Runs its disposer exactly once: on [`ListenerGuard::dispose`] or on drop.
pub struct ListenerGuard {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    #[must_use]
    pub fn new(disposer: impl FnOnce() + 'static) -> Self {
        Self { disposer: Some(Box::new(disposer)) }
    }

    /// Detach now. Later calls and the eventual drop do nothing.
    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("active", &self.is_active()).finish()
    }
}

/// Attach move and end listeners to `window`.
///
/// `touchmove` is registered non-passive so the handler can cancel page
/// scrolling. The returned guard removes every listener it attached.
#[must_use]
pub fn attach_window_listeners(
    window: &Window,
    on_move: impl FnMut(Event) + 'static,
    on_end: impl FnMut(Event) + 'static,
) -> ListenerGuard {
    let move_cb = Closure::wrap(Box::new(on_move) as Box<dyn FnMut(Event)>);
    let end_cb = Closure::wrap(Box::new(on_end) as Box<dyn FnMut(Event)>);

    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    for name in MOVE_EVENTS {
        let result = window.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            move_cb.as_ref().unchecked_ref(),
            &options,
        );
        if let Err(err) = result {
            warn!(event = name, ?err, "failed to attach listener");
        }
    }
    for name in END_EVENTS {
        if let Err(err) = window.add_event_listener_with_callback(name, end_cb.as_ref().unchecked_ref()) {
            warn!(event = name, ?err, "failed to attach listener");
        }
    }
    trace!("window listeners attached");

    let window = window.clone();
    ListenerGuard::new(move || {
        for name in MOVE_EVENTS {
            if let Err(err) = window.remove_event_listener_with_callback(name, move_cb.as_ref().unchecked_ref()) {
                warn!(event = name, ?err, "failed to detach listener");
            }
        }
        for name in END_EVENTS {
            if let Err(err) = window.remove_event_listener_with_callback(name, end_cb.as_ref().unchecked_ref()) {
                warn!(event = name, ?err, "failed to detach listener");
            }
        }
        trace!("window listeners detached");
        drop(move_cb);
        drop(end_cb);
    })
}

/// Attach a `resize` listener to `window` for the lifetime of the returned guard.
#[must_use]
pub fn attach_resize_listener(window: &Window, on_resize: impl FnMut(Event) + 'static) -> ListenerGuard {
    let resize_cb = Closure::wrap(Box::new(on_resize) as Box<dyn FnMut(Event)>);
    if let Err(err) = window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()) {
        warn!(event = "resize", ?err, "failed to attach listener");
    }

    let window = window.clone();
    ListenerGuard::new(move || {
        if let Err(err) = window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()) {
            warn!(event = "resize", ?err, "failed to detach listener");
        }
        drop(resize_cb);
    })
}
