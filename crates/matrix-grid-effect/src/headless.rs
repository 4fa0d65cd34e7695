//! In-memory document with deterministic layout and a host-advanced clock.
//!
//! Elements live in an arena and are laid out the way the grid stylesheet lays
//! them out: rows stacked top to bottom, cells left to right, every cell a
//! `cell_size` square. Rows can be shifted horizontally with
//! [`HeadlessPlatform::set_scroll_offset`] to stand in for the CSS scroll
//! animation.
//!
//! Frame callbacks and timers are never fired on their own. The host drains
//! them with [`HeadlessPlatform::take_frames`] and [`HeadlessPlatform::advance`]
//! and feeds the resulting events back into the controller.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use matrix_grid_core::{Rect, StyleProperty, Viewport};

use crate::platform::{EventKind, HostEvent, Platform, TaskHandle};

/// Arena index of a headless element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default, Clone)]
struct Node {
    /// Id attribute; only mount points carry one.
    id: Option<String>,
    class_name: String,
    attributes: BTreeMap<String, String>,
    style: HashMap<StyleProperty, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position among the parent's children.
    index: usize,
    scroll_offset: f64,
}

#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    viewport: Viewport,
    cell_size: f64,
    loading: bool,
    listeners: Vec<EventKind>,
    next_handle: u64,
    frames: Vec<TaskHandle>,
    timers: Vec<(TaskHandle, Duration)>,
    now: Duration,
    seed: u64,
}

impl HeadlessPlatform {
    /// Empty document of the given size. `cell_size` drives element layout.
    pub fn new(viewport: Viewport, cell_size: f64) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            viewport,
            cell_size,
            loading: false,
            listeners: Vec::new(),
            next_handle: 1,
            frames: Vec::new(),
            timers: Vec::new(),
            now: Duration::ZERO,
            seed: 0x5eed,
        }
    }

    /// Value returned from [`Platform::entropy_seed`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a top-level container element with the given id.
    pub fn add_mount(&mut self, id: &str) -> NodeId {
        let node = self.alloc(String::new());
        self.nodes[node.0].id = Some(id.to_string());
        node
    }

    /// Detach the mount point with the given id, along with its subtree.
    pub fn remove_mount(&mut self, id: &str) {
        if let Some(mount) = self.query_mount(id) {
            self.release(mount);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Registered event subscriptions, in registration order.
    pub fn listeners(&self) -> &[EventKind] {
        &self.listeners
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    /// Frame callbacks requested and not yet cancelled or drained.
    pub fn pending_frames(&self) -> &[TaskHandle] {
        &self.frames
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire every pending frame callback, in request order.
    pub fn take_frames(&mut self) -> Vec<HostEvent> {
        self.frames.drain(..).map(HostEvent::Frame).collect()
    }

    /// Move the clock forward by `dt` and fire the timers that came due.
    pub fn advance(&mut self, dt: Duration) -> Vec<HostEvent> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;

        let mut due: Vec<(TaskHandle, Duration)> = Vec::new();
        self.timers.retain(|&(handle, deadline)| {
            if deadline <= now {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, deadline)| (deadline, handle));
        due.into_iter()
            .map(|(handle, _)| HostEvent::Timer(handle))
            .collect()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn class_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].class_name
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&str> {
        self.nodes[node.0].style.get(&property).map(String::as_str)
    }

    /// Shift a row horizontally by `offset` pixels (negative moves it left).
    pub fn set_scroll_offset(&mut self, node: NodeId, offset: f64) {
        self.nodes[node.0].scroll_offset = offset;
    }

    pub fn scroll_offset(&self, node: NodeId) -> f64 {
        self.nodes[node.0].scroll_offset
    }

    fn alloc(&mut self, class_name: String) -> NodeId {
        let node = Node {
            class_name,
            ..Default::default()
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Return `node` and its subtree to the free list.
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let slot = std::mem::take(&mut self.nodes[id.0]);
            stack.extend(slot.children);
            self.free.push(id);
        }
    }

    fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[node.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }
}

impl Platform for HeadlessPlatform {
    type Element = NodeId;

    fn query_mount(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear_children(&mut self, parent: &NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            self.release(child);
        }
    }

    fn create_element(&mut self, class_name: &str) -> NodeId {
        self.alloc(class_name.to_string())
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        self.nodes[element.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        let index = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.push(*child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(*parent);
        node.index = index;
    }

    fn set_style(&mut self, element: &NodeId, property: StyleProperty, value: &str) {
        self.nodes[element.0]
            .style
            .insert(property, value.to_string());
    }

    fn remove_style(&mut self, element: &NodeId, property: StyleProperty) {
        self.nodes[element.0].style.remove(&property);
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        let cell = self.cell_size;
        let node = &self.nodes[element.0];
        match (self.depth(*element), node.parent) {
            (0, _) if node.id.is_some() => {
                Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height)
            }
            (1, Some(_)) => Rect::new(
                node.scroll_offset,
                node.index as f64 * cell,
                node.children.len() as f64 * cell,
                cell,
            ),
            (2, Some(row)) => {
                let row = &self.nodes[row.0];
                Rect::new(
                    row.scroll_offset + node.index as f64 * cell,
                    row.index as f64 * cell,
                    cell,
                    cell,
                )
            }
            _ => Rect::default(),
        }
    }

    fn listen(&mut self, kind: EventKind) {
        self.listeners.push(kind);
    }

    fn request_frame(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: TaskHandle) {
        self.frames.retain(|&pending| pending != handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push((handle, self.now.saturating_add(delay)));
        handle
    }

    fn clear_timeout(&mut self, handle: TaskHandle) {
        self.timers.retain(|&(pending, _)| pending != handle);
    }

    fn entropy_seed(&mut self) -> u64 {
        self.seed
    }
}
