//! Pointer-reactive matrix grid effect.
//!
//! The effect fills a container with rows of random characters that the host
//! stylesheet scrolls horizontally. Pointer position changes each row's
//! scroll speed and direction and highlights the cells near the pointer.
//!
//! All document access goes through [`Platform`], so the same
//! [`LifecycleController`] drives a browser DOM, the in-memory
//! [`HeadlessPlatform`], or anything else that can create elements and
//! schedule callbacks.

pub mod builder;
mod grid;
mod headless;
mod lifecycle;
mod platform;
mod tracker;
pub mod updater;

pub use grid::{Cell, GridDimensions, GridRoot, Highlight, Row, RowMotion};
pub use headless::{HeadlessPlatform, NodeId};
pub use lifecycle::{LifecycleController, Phase, Visibility};
pub use platform::{EventKind, HostEvent, Platform, TaskHandle};
pub use tracker::InteractionTracker;
