//! Initialization, debounced rebuilds and visibility gating.

use matrix_grid_core::{GridConfig, PlayState, Point, StyleProperty};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::builder;
use crate::grid::GridRoot;
use crate::platform::{EventKind, HostEvent, Platform, TaskHandle};
use crate::tracker::InteractionTracker;
use crate::updater;

/// Where the controller is in its build cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started, or started without finding the mount point.
    Uninitialized,
    /// Waiting for the document to finish loading.
    AwaitingReady,
    Ready,
    /// A resize is waiting out the debounce interval.
    Rebuilding,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Owns the grid and routes host events to the builder, tracker and updater.
#[derive(Debug)]
pub struct LifecycleController<P: Platform> {
    platform: P,
    config: GridConfig,
    rng: SmallRng,
    tracker: InteractionTracker,
    grid: Option<GridRoot<P::Element>>,
    phase: Phase,
    visibility: Visibility,
    resize_timer: Option<TaskHandle>,
    started: bool,
    pointer_subscribed: bool,
    build_count: u64,
}

impl<P: Platform> LifecycleController<P> {
    /// Create a controller seeded from the platform's entropy source.
    pub fn new(mut platform: P, config: GridConfig) -> Self {
        let seed = platform.entropy_seed();
        Self::with_seed(platform, config, seed)
    }

    /// Create a controller with a fixed sampling seed.
    pub fn with_seed(platform: P, config: GridConfig, seed: u64) -> Self {
        let tracker = InteractionTracker::new(platform.viewport().center());
        Self {
            platform,
            config,
            rng: SmallRng::seed_from_u64(seed),
            tracker,
            grid: None,
            phase: Phase::Uninitialized,
            visibility: Visibility::Visible,
            resize_timer: None,
            started: false,
            pointer_subscribed: false,
            build_count: 0,
        }
    }

    /// Subscribe to lifecycle events and build now, or once the document is ready.
    ///
    /// Only the first call has any effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.platform.listen(EventKind::Resize);
        self.platform.listen(EventKind::VisibilityChange);

        if self.platform.is_loading() {
            self.platform.listen(EventKind::DomReady);
            self.phase = Phase::AwaitingReady;
        } else {
            self.init();
        }
    }

    /// Rebuild the grid at the current viewport size.
    ///
    /// Returns `false` without touching anything when the mount point is absent.
    pub fn init(&mut self) -> bool {
        let Some(mount) = self.platform.query_mount(&self.config.mount_id) else {
            tracing::trace!(mount_id = %self.config.mount_id, "mount point not found, skipping build");
            return false;
        };

        let viewport = self.platform.viewport();
        let grid = builder::build(
            &mut self.platform,
            mount,
            viewport,
            &self.config,
            &mut self.rng,
        );
        self.grid = Some(grid);
        self.build_count += 1;
        self.phase = Phase::Ready;

        if !self.pointer_subscribed {
            InteractionTracker::subscribe(&mut self.platform);
            self.pointer_subscribed = true;
        }
        true
    }

    /// Recompute row speed and direction for `pointer` without touching cell highlights.
    pub fn update_animation(&mut self, pointer: Point) {
        let width = self.platform.viewport().width;
        if let Some(grid) = self.grid.as_mut() {
            updater::update_rows(&mut self.platform, grid, pointer.x, width, &self.config);
        }
    }

    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::DomReady => {
                if self.phase == Phase::AwaitingReady && !self.init() {
                    self.phase = Phase::Uninitialized;
                }
            }
            HostEvent::PointerMove(position) => {
                self.tracker.on_pointer_move(&mut self.platform, position)
            }
            HostEvent::TouchMove(touches) => {
                self.tracker.on_touch_move(&mut self.platform, &touches)
            }
            HostEvent::Resize => self.on_resize(),
            HostEvent::VisibilityChange { hidden } => self.on_visibility_change(hidden),
            HostEvent::Frame(handle) => {
                if let Some(pointer) = self.tracker.take_frame(handle) {
                    self.apply_pointer(pointer);
                }
            }
            HostEvent::Timer(handle) => {
                if self.resize_timer == Some(handle) {
                    self.resize_timer = None;
                    self.rebuild();
                }
            }
        }
    }

    fn apply_pointer(&mut self, pointer: Point) {
        let width = self.platform.viewport().width;
        if let Some(grid) = self.grid.as_mut() {
            updater::update_rows(&mut self.platform, grid, pointer.x, width, &self.config);
            updater::update_cells(&mut self.platform, grid, pointer, &self.config);
        }
    }

    fn on_resize(&mut self) {
        if let Some(pending) = self.resize_timer.take() {
            self.platform.clear_timeout(pending);
        }
        self.resize_timer = Some(self.platform.set_timeout(self.config.resize_debounce()));
        if self.phase == Phase::Ready {
            self.phase = Phase::Rebuilding;
        }
    }

    fn rebuild(&mut self) {
        if !self.init() {
            self.phase = if self.grid.is_some() {
                Phase::Ready
            } else {
                Phase::Uninitialized
            };
        }
    }

    fn on_visibility_change(&mut self, hidden: bool) {
        self.visibility = if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };

        let Some(mount) = self.platform.query_mount(&self.config.mount_id) else {
            return;
        };
        let state = match self.visibility {
            Visibility::Hidden => PlayState::Paused,
            Visibility::Visible => PlayState::Running,
        };
        self.platform
            .set_style(&mount, StyleProperty::AnimationPlayState, state.as_css());
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access for hosts that drive the platform directly.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn grid(&self) -> Option<&GridRoot<P::Element>> {
        self.grid.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn pointer(&self) -> Point {
        self.tracker.pointer()
    }

    /// Number of completed builds, including the first.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }
}
