use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};
use std::time::Duration;

use matrix_grid_core::{GridConfig, Point, Rect, StyleProperty, Viewport};
use matrix_grid_effect::{EventKind, HostEvent, LifecycleController, Platform, TaskHandle};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget, HtmlElement, MouseEvent, TouchEvent,
    Window,
};

type Controller = LifecycleController<WebPlatform>;

/// A registered DOM listener, removed again when the platform is dropped.
#[derive(Debug)]
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// [`Platform`] backed by the page's `window` and `document`.
///
/// Fired callbacks re-enter the controller through a weak reference, so the
/// controller and its platform are dropped together once JS releases the
/// owning [`MatrixGrid`].
#[derive(Debug)]
pub struct WebPlatform {
    window: Window,
    document: Document,
    owner: Weak<RefCell<Controller>>,
    next_handle: u64,
    /// Pending animation frames in request order with their browser ids.
    frames: VecDeque<(TaskHandle, i32)>,
    timers: HashMap<TaskHandle, i32>,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
    timer_callback: Option<Closure<dyn FnMut(JsValue)>>,
    listeners: Vec<Listener>,
}

impl WebPlatform {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            window,
            document,
            owner: Weak::new(),
            next_handle: 1,
            frames: VecDeque::new(),
            timers: HashMap::new(),
            frame_callback: None,
            timer_callback: None,
            listeners: Vec::new(),
        })
    }

    /// Point callbacks at the controller that owns this platform.
    fn attach(&mut self, owner: Weak<RefCell<Controller>>) {
        let frame_owner = owner.clone();
        self.frame_callback = Some(Closure::new(move |_timestamp: f64| {
            with_controller(&frame_owner, |ctl| {
                // Browsers run animation frames in request order.
                if let Some((handle, _)) = ctl.platform_mut().frames.pop_front() {
                    ctl.dispatch(HostEvent::Frame(handle));
                }
            });
        }));

        let timer_owner = owner.clone();
        self.timer_callback = Some(Closure::new(move |raw: JsValue| {
            let Some(raw) = raw.as_f64() else {
                return;
            };
            let handle = TaskHandle(raw as u64);
            with_controller(&timer_owner, |ctl| {
                ctl.platform_mut().timers.remove(&handle);
                ctl.dispatch(HostEvent::Timer(handle));
            });
        }));

        self.owner = owner;
    }

    fn next_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn add_listener(&mut self, target: EventTarget, event: &'static str, passive: bool) {
        let owner = self.owner.clone();
        let document = self.document.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let Some(host_event) = translate(event, &e, &document) else {
                return;
            };
            with_controller(&owner, |ctl| ctl.dispatch(host_event));
        });

        let result = if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        };
        if let Err(err) = result {
            tracing::warn!(event, ?err, "failed to add event listener");
            return;
        }

        self.listeners.push(Listener {
            target,
            event,
            callback,
        });
    }
}

impl Drop for WebPlatform {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        for (_, id) in self.frames.drain(..) {
            let _ = self.window.cancel_animation_frame(id);
        }
        for (_, id) in self.timers.drain() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

/// Run `f` against the controller unless it was dropped or is already borrowed.
fn with_controller(owner: &Weak<RefCell<Controller>>, f: impl FnOnce(&mut Controller)) {
    let Some(shared) = owner.upgrade() else {
        return;
    };
    match shared.try_borrow_mut() {
        Ok(mut ctl) => f(&mut ctl),
        Err(_) => tracing::warn!("matrix grid busy, dropping re-entrant event"),
    }
}

fn translate(event: &str, e: &Event, document: &Document) -> Option<HostEvent> {
    match event {
        "DOMContentLoaded" => Some(HostEvent::DomReady),
        "mousemove" => {
            let mouse = e.dyn_ref::<MouseEvent>()?;
            Some(HostEvent::PointerMove(Point::new(
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
            )))
        }
        "touchmove" => {
            let touches = e.dyn_ref::<TouchEvent>()?.touches();
            let points = (0..touches.length())
                .filter_map(|i| touches.get(i))
                .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
                .collect();
            Some(HostEvent::TouchMove(points))
        }
        "resize" => Some(HostEvent::Resize),
        "visibilitychange" => Some(HostEvent::VisibilityChange {
            hidden: document.hidden(),
        }),
        _ => None,
    }
}

fn warn_on_err<T>(what: &str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        tracing::warn!(?err, "{what} failed");
    }
}

impl Platform for WebPlatform {
    type Element = HtmlElement;

    fn query_mount(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn is_loading(&self) -> bool {
        crate::is_loading_state(&self.document.ready_state())
    }

    fn viewport(&self) -> Viewport {
        let extent = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
        };
        Viewport::new(
            extent(self.window.inner_width()),
            extent(self.window.inner_height()),
        )
    }

    fn clear_children(&mut self, parent: &HtmlElement) {
        parent.set_inner_html("");
    }

    fn create_element(&mut self, class_name: &str) -> HtmlElement {
        // createElement only rejects invalid tag names, and `div` is valid.
        let element = self
            .document
            .create_element("div")
            .expect_throw("document.createElement(\"div\") failed")
            .unchecked_into::<HtmlElement>();
        element.set_class_name(class_name);
        element
    }

    fn set_attribute(&mut self, element: &HtmlElement, name: &str, value: &str) {
        warn_on_err("setAttribute", element.set_attribute(name, value));
    }

    fn append_child(&mut self, parent: &HtmlElement, child: &HtmlElement) {
        warn_on_err("appendChild", parent.append_child(child));
    }

    fn set_style(&mut self, element: &HtmlElement, property: StyleProperty, value: &str) {
        warn_on_err(
            "style.setProperty",
            element.style().set_property(property.css_name(), value),
        );
    }

    fn remove_style(&mut self, element: &HtmlElement, property: StyleProperty) {
        warn_on_err(
            "style.removeProperty",
            element.style().remove_property(property.css_name()),
        );
    }

    fn bounding_rect(&self, element: &HtmlElement) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn listen(&mut self, kind: EventKind) {
        let window: EventTarget = self.window.clone().into();
        let document: EventTarget = self.document.clone().into();
        match kind {
            EventKind::DomReady => self.add_listener(document, "DOMContentLoaded", false),
            EventKind::PointerMove => self.add_listener(document, "mousemove", false),
            EventKind::TouchMove => self.add_listener(document, "touchmove", true),
            EventKind::Resize => self.add_listener(window, "resize", false),
            EventKind::VisibilityChange => {
                self.add_listener(document, "visibilitychange", false)
            }
        }
    }

    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.next_handle();
        let Some(callback) = self.frame_callback.as_ref() else {
            return handle;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.frames.push_back((handle, id)),
            Err(err) => tracing::warn!(?err, "requestAnimationFrame failed"),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: TaskHandle) {
        if let Some(pos) = self.frames.iter().position(|&(h, _)| h == handle)
            && let Some((_, id)) = self.frames.remove(pos)
        {
            warn_on_err("cancelAnimationFrame", self.window.cancel_animation_frame(id));
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TaskHandle {
        let handle = self.next_handle();
        let Some(callback) = self.timer_callback.as_ref() else {
            return handle;
        };
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                callback.as_ref().unchecked_ref(),
                millis,
                &JsValue::from_f64(handle.0 as f64),
            ) {
            Ok(id) => {
                self.timers.insert(handle, id);
            }
            Err(err) => tracing::warn!(?err, "setTimeout failed"),
        }
        handle
    }

    fn clear_timeout(&mut self, handle: TaskHandle) {
        if let Some(id) = self.timers.remove(&handle) {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn entropy_seed(&mut self) -> u64 {
        let random = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
        random ^ (js_sys::Date::now() as u64).rotate_left(32)
    }
}

/// JS handle to a running grid effect.
#[wasm_bindgen]
pub struct MatrixGrid {
    inner: Rc<RefCell<Controller>>,
}

#[wasm_bindgen]
impl MatrixGrid {
    /// Start the effect. `options` may override any configuration key.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<MatrixGrid, JsValue> {
        let config = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                let text: String = js_sys::JSON::stringify(&value)?.into();
                crate::config_from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            _ => GridConfig::default(),
        };

        let platform = WebPlatform::new()?;
        let inner = Rc::new(RefCell::new(LifecycleController::new(platform, config)));
        {
            let mut ctl = inner.borrow_mut();
            ctl.platform_mut().attach(Rc::downgrade(&inner));
            ctl.start();
        }
        Ok(Self { inner })
    }

    /// Rebuild the grid at the current window size.
    ///
    /// Returns `false` when the mount element is missing.
    pub fn init(&self) -> bool {
        self.inner.borrow_mut().init()
    }

    /// Recompute row speeds and directions for a pointer position.
    #[wasm_bindgen(js_name = updateAnimation)]
    pub fn update_animation(&self, x: f64, y: f64) {
        self.inner.borrow_mut().update_animation(Point::new(x, y));
    }

    /// Active configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        let text = crate::config_to_json(self.inner.borrow().config())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        js_sys::JSON::parse(&text)
    }
}

/// Start a default grid when the module loads and expose it as `window.MatrixGrid`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let grid = MatrixGrid::new(None)?;
    js_sys::Reflect::set(&window, &JsValue::from_str("MatrixGrid"), &JsValue::from(grid))?;
    Ok(())
}
