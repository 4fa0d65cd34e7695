//! Core types shared by the matrix grid crates.
//!
//! Everything here is plain data: the immutable [`GridConfig`], the geometry
//! used for hit testing, and the class/style vocabulary the effect writes to
//! its host document.

mod chars;
mod config;
mod error;
mod geometry;
mod style;

pub use chars::DEFAULT_PALETTE;
pub use config::{BaseSpeed, GridConfig, LayoutBuffer, MouseEffect, Opacity, SpeedBounds};
pub use error::ConfigError;
pub use geometry::{Point, Rect, Viewport};
pub use style::{
    AnimationDirection, CELL_CLASS, CHAR_ATTRIBUTE, PlayState, ROW_CLASS, RowClass,
    StyleProperty,
};
