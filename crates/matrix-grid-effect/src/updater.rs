//! Pointer-driven row motion and cell highlighting.
//!
//! Both updates are pure functions of the pointer position and the grid
//! state; nothing from earlier frames feeds into them.

use matrix_grid_core::{GridConfig, Point, RowClass, StyleProperty};

use crate::grid::{GridRoot, Highlight, RowMotion};
use crate::platform::Platform;

/// Horizontal pointer offset from the center, normalized so the viewport
/// edges map to -1 and 1.
pub fn speed_multiplier(pointer_x: f64, viewport_width: f64) -> f64 {
    let center_x = viewport_width / 2.0;
    (pointer_x - center_x) / center_x
}

/// Motion for the row at `index`.
pub fn row_motion(
    index: usize,
    pointer_x: f64,
    viewport_width: f64,
    config: &GridConfig,
) -> RowMotion {
    let class = RowClass::for_index(index);
    let base = config.base_speed.for_class(class);
    let multiplier = speed_multiplier(pointer_x, viewport_width);
    let raw = base * (1.0 - multiplier * config.mouse_effect.speed_multiplier);

    // Left of center inverts each row's stylesheet direction.
    let direction = if pointer_x < viewport_width / 2.0 {
        class.default_direction().flipped()
    } else {
        class.default_direction()
    };

    RowMotion {
        duration_secs: config.speed_bounds.clamp(raw),
        direction,
    }
}

/// Highlight for a cell centered at `cell_center`, or `None` outside the radius.
pub fn cell_highlight(cell_center: Point, pointer: Point, config: &GridConfig) -> Option<Highlight> {
    let radius = config.mouse_effect.radius;
    let distance = cell_center.distance_to(pointer);
    if distance < radius {
        let intensity = 1.0 - distance / radius;
        Some(Highlight {
            intensity,
            opacity: config.opacity.highlight * intensity,
        })
    } else {
        None
    }
}

/// Apply [`row_motion`] to every row.
pub fn update_rows<P: Platform>(
    platform: &mut P,
    grid: &mut GridRoot<P::Element>,
    pointer_x: f64,
    viewport_width: f64,
    config: &GridConfig,
) {
    for row in &mut grid.rows {
        let motion = row_motion(row.index, pointer_x, viewport_width, config);
        platform.set_style(
            &row.element,
            StyleProperty::AnimationDuration,
            &format!("{}s", motion.duration_secs),
        );
        platform.set_style(
            &row.element,
            StyleProperty::AnimationDirection,
            motion.direction.as_css(),
        );
        row.motion = Some(motion);
    }
}

/// Recompute the highlight of every cell against `pointer`.
///
/// Cells whose highlight did not change are not written back.
pub fn update_cells<P: Platform>(
    platform: &mut P,
    grid: &mut GridRoot<P::Element>,
    pointer: Point,
    config: &GridConfig,
) {
    for cell in grid.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
        let center = platform.bounding_rect(&cell.element).center();
        let highlight = cell_highlight(center, pointer, config);
        if highlight == cell.highlight {
            continue;
        }

        match highlight {
            Some(h) => {
                platform.set_style(
                    &cell.element,
                    StyleProperty::BorderColor,
                    &config.highlight_color,
                );
                platform.set_style(&cell.element, StyleProperty::Opacity, &h.opacity.to_string());
            }
            None => {
                platform.remove_style(&cell.element, StyleProperty::BorderColor);
                platform.remove_style(&cell.element, StyleProperty::Opacity);
            }
        }
        cell.highlight = highlight;
    }
}
