//! Browser binding: DOM events in, engine actions out.
//!
//! [`Engine`] owns the canvas container element and shares an [`EngineCore`]
//! with the window listeners of the active gesture and with its own `resize`
//! listener. The host forwards item, handle, and background events here and
//! re-renders from the change callback.
//!
//! Touch starts are never cancelled, so the host may register `touchstart`
//! as passive. Taps still produce the `click` that selects or deletes.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, MouseEvent, TouchEvent};

use crate::engine::{Action, EngineCore};
use crate::geometry::{Point, Rect};
use crate::input::{Button, ContainerSize, PointerInput};
use crate::listeners::{ListenerGuard, attach_resize_listener, attach_window_listeners};
use crate::store::{CanvasStore, Item, ItemId};
use crate::view::{PointerTarget, cancels_pointer_default, dispatch_click, dispatch_pointer_down};

/// Host callback run after any handler produced actions. The engine is
/// borrowed for the duration of the call and must not be re-entered.
pub type ChangeCallback = dyn Fn(&EngineCore, &[Action]);

pub struct Engine {
    container: HtmlElement,
    core: Rc<RefCell<EngineCore>>,
    capture: Rc<RefCell<Option<ListenerGuard>>>,
    resize: Option<ListenerGuard>,
    on_change: Rc<ChangeCallback>,
}

impl Engine {
    /// Bind to the container, measure it, and start following window resizes.
    #[must_use]
    pub fn new(container: HtmlElement, store: CanvasStore, on_change: impl Fn(&EngineCore, &[Action]) + 'static) -> Self {
        let core = Rc::new(RefCell::new(EngineCore::with_store(store)));
        core.borrow_mut().set_container(Some(measure(&container)));
        let on_change: Rc<ChangeCallback> = Rc::new(on_change);

        let resize = match web_sys::window() {
            Some(window) => {
                let element = container.clone();
                let core = Rc::clone(&core);
                let on_change = Rc::clone(&on_change);
                Some(attach_resize_listener(&window, move |_event: Event| {
                    let actions = core.borrow_mut().set_container(Some(measure(&element)));
                    notify(&core, &on_change, &actions);
                }))
            }
            None => {
                warn!("no window; container size will not follow resizes");
                None
            }
        };

        Self { container, core, capture: Rc::new(RefCell::new(None)), resize, on_change }
    }

    /// Re-read the container's size, e.g. after a layout change that did not
    /// resize the window.
    pub fn sync_container(&self) {
        let actions = self.core.borrow_mut().set_container(Some(measure(&self.container)));
        self.apply(actions);
    }

    #[must_use]
    pub fn core(&self) -> Ref<'_, EngineCore> {
        self.core.borrow()
    }

    // --- Pointer-down (mousedown / touchstart) ---

    pub fn on_item_pointer_down(&self, event: &Event, id: ItemId) {
        self.pointer_down(event, PointerTarget::Item(id), None);
    }

    /// `item_element` is the item's box; its center is the transform pivot.
    pub fn on_handle_pointer_down(&self, event: &Event, id: ItemId, item_element: &Element) {
        self.pointer_down(event, PointerTarget::TransformHandle(id), Some(element_rect(item_element)));
    }

    /// Keeps a press on the delete button from starting a drag of its item.
    pub fn on_delete_pointer_down(&self, event: &Event, id: ItemId) {
        self.pointer_down(event, PointerTarget::DeleteButton(id), None);
    }

    fn pointer_down(&self, event: &Event, target: PointerTarget, item_rect: Option<Rect>) {
        event.stop_propagation();
        if cancels_pointer_default(&target, event.dyn_ref::<TouchEvent>().is_some()) {
            event.prevent_default();
        }
        let Some(pointer) = pointer_from_event(event) else {
            return;
        };
        let actions = dispatch_pointer_down(&mut self.core.borrow_mut(), target, pointer, item_rect);
        self.apply(actions);
    }

    // --- Clicks ---

    pub fn on_item_click(&self, event: &MouseEvent, id: ItemId) {
        event.stop_propagation();
        self.click(PointerTarget::Item(id));
    }

    pub fn on_delete_click(&self, event: &MouseEvent, id: ItemId) {
        event.stop_propagation();
        self.click(PointerTarget::DeleteButton(id));
    }

    /// Only clicks on the container itself count; clicks bubbling up from
    /// items are ignored.
    pub fn on_background_click(&self, event: &MouseEvent) {
        if event.target() != event.current_target() {
            return;
        }
        self.click(PointerTarget::Background);
    }

    fn click(&self, target: PointerTarget) {
        let actions = dispatch_click(&mut self.core.borrow_mut(), target);
        self.apply(actions);
    }

    // --- Store operations from the surrounding page ---

    pub fn select_item(&self, item: Item) {
        let actions = self.core.borrow_mut().select_item(item);
        self.apply(actions);
    }

    pub fn remove_item(&self, id: &ItemId) {
        let actions = self.core.borrow_mut().remove_item(id);
        self.apply(actions);
    }

    pub fn full_reset(&self) {
        let actions = self.core.borrow_mut().full_reset();
        self.apply(actions);
    }

    pub fn set_background(&self, background: &str) {
        let actions = self.core.borrow_mut().set_background(background);
        self.apply(actions);
    }

    /// Attach or release window listeners as requested, then notify the host.
    fn apply(&self, mut actions: Vec<Action>) {
        if actions.contains(&Action::CaptureReleased) {
            self.capture.borrow_mut().take();
        }
        if actions.contains(&Action::CaptureStarted) && !self.begin_capture() {
            actions = self.core.borrow_mut().abandon_capture(actions);
        }
        notify(&self.core, &self.on_change, &actions);
    }

    /// Attach the gesture's window listeners. False when there is no window.
    fn begin_capture(&self) -> bool {
        self.capture.borrow_mut().take();
        let Some(window) = web_sys::window() else {
            warn!("no window; abandoning gesture");
            return false;
        };

        let core = Rc::clone(&self.core);
        let on_change = Rc::clone(&self.on_change);
        let on_move = move |event: Event| {
            // Cancels touch scrolling while a gesture is live.
            event.prevent_default();
            let Some(pointer) = pointer_from_event(&event) else {
                return;
            };
            let actions = core.borrow_mut().handle_pointer_move(pointer);
            notify(&core, &on_change, &actions);
        };

        let core = Rc::clone(&self.core);
        let on_change = Rc::clone(&self.on_change);
        let capture = Rc::clone(&self.capture);
        let on_end = move |_event: Event| {
            let actions = core.borrow_mut().handle_pointer_up();
            capture.borrow_mut().take();
            notify(&core, &on_change, &actions);
        };

        let guard = attach_window_listeners(&window, on_move, on_end);
        *self.capture.borrow_mut() = Some(guard);
        true
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // The gesture listeners hold clones of `capture`; dropping the guard breaks the cycle.
        self.capture.borrow_mut().take();
        self.resize.take();
        if !self.core.borrow_mut().handle_pointer_up().is_empty() {
            debug!("engine dropped mid-gesture");
        }
    }
}

fn notify(core: &Rc<RefCell<EngineCore>>, on_change: &Rc<ChangeCallback>, actions: &[Action]) {
    if actions.is_empty() {
        return;
    }
    on_change(&core.borrow(), actions);
}

fn measure(container: &HtmlElement) -> ContainerSize {
    let rect = container.get_bounding_client_rect();
    ContainerSize::new(rect.width(), rect.height())
}

/// First touch of a touch event, or position and button of a mouse event.
fn pointer_from_event(event: &Event) -> Option<PointerInput> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event.touches().get(0)?;
        return Some(PointerInput {
            point: Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())),
            button: Button::Primary,
        });
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(PointerInput {
        point: Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
        button: Button::from_dom(mouse.button()),
    })
}

fn element_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
