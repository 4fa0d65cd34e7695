//! The seam between the effect and the document it draws into.

use std::fmt::Debug;
use std::time::Duration;

use matrix_grid_core::{Point, Rect, StyleProperty, Viewport};

/// Opaque id for a scheduled frame callback or timer.
///
/// Handles are allocated by the platform and only compared for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// Events the effect can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The document finished loading.
    DomReady,
    PointerMove,
    /// Must be registered as passive so it never blocks scrolling.
    TouchMove,
    Resize,
    VisibilityChange,
}

/// Everything the host forwards into
/// [`LifecycleController::dispatch`](crate::LifecycleController::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    DomReady,
    PointerMove(Point),
    /// Active touch points, first touch first.
    TouchMove(Vec<Point>),
    Resize,
    VisibilityChange { hidden: bool },
    /// A frame callback obtained from [`Platform::request_frame`] fired.
    Frame(TaskHandle),
    /// A timer obtained from [`Platform::set_timeout`] fired.
    Timer(TaskHandle),
}

/// Host document operations used by the effect.
///
/// Implementations never call back into the effect synchronously: fired
/// callbacks and subscribed events are delivered later as [`HostEvent`]s.
pub trait Platform {
    type Element: Clone + Debug;

    /// Look up the container element with the given id.
    fn query_mount(&self, id: &str) -> Option<Self::Element>;

    /// Whether the document is still loading.
    fn is_loading(&self) -> bool;

    fn viewport(&self) -> Viewport;

    /// Remove every child of `parent`.
    fn clear_children(&mut self, parent: &Self::Element);

    /// Create a detached element carrying `class_name`.
    fn create_element(&mut self, class_name: &str) -> Self::Element;

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Set an inline style override.
    fn set_style(&mut self, element: &Self::Element, property: StyleProperty, value: &str);

    /// Drop an inline style override, reverting to the stylesheet.
    fn remove_style(&mut self, element: &Self::Element, property: StyleProperty);

    /// Current on-screen bounding box, including animation transforms.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn listen(&mut self, kind: EventKind);

    /// Schedule a callback before the next paint.
    fn request_frame(&mut self) -> TaskHandle;

    fn cancel_frame(&mut self, handle: TaskHandle);

    fn set_timeout(&mut self, delay: Duration) -> TaskHandle;

    fn clear_timeout(&mut self, handle: TaskHandle);

    /// Seed for the character sampler.
    fn entropy_seed(&mut self) -> u64;
}
