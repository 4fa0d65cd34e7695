//! Terminal rendering of the headless grid document.
//!
//! The browser scrolls rows with a CSS animation; here [`RowScroll`] plays that
//! animation by reading each row's inline duration, direction and the mount's
//! play state, then shifting the row element. Every cell takes two terminal
//! columns so full-width katakana line up with the ASCII digits.

use std::time::Duration;

use matrix_grid_core::{
    AnimationDirection, CHAR_ATTRIBUTE, GridConfig, PlayState, Point, RowClass, StyleProperty,
    Viewport,
};
use matrix_grid_effect::{HeadlessPlatform, LifecycleController, NodeId, Platform};
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::color::opacity_to_color;

pub type Controller = LifecycleController<HeadlessPlatform>;

/// Viewport in pixels for a terminal of `cols` x `rows`.
pub fn viewport_for(cols: u16, rows: u16, cell_size: f64) -> Viewport {
    Viewport::new(f64::from(cols / 2) * cell_size, f64::from(rows) * cell_size)
}

/// Pixel coordinate at the center of the cell under a terminal position.
pub fn pointer_for(column: u16, row: u16, cell_size: f64) -> Point {
    Point::new(
        (f64::from(column / 2) + 0.5) * cell_size,
        (f64::from(row) + 0.5) * cell_size,
    )
}

/// Parse a CSS time such as `12.5s`.
fn parse_seconds(value: &str) -> Option<f64> {
    value
        .strip_suffix('s')?
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
}

/// Per-row progress through the scroll animation.
#[derive(Debug, Default)]
pub struct RowScroll {
    phases: Vec<f64>,
    build: u64,
}

impl RowScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every row by `dt` and move its element to match.
    pub fn advance(&mut self, ctl: &mut Controller, dt: Duration) {
        let base_speed = ctl.config().base_speed;
        let mount_id = ctl.config().mount_id.clone();
        let cell_size = ctl.config().cell_size;
        let build = ctl.build_count();

        let Some(grid) = ctl.grid() else {
            return;
        };
        let rows: Vec<(NodeId, RowClass, f64)> = grid
            .rows
            .iter()
            .map(|row| (row.element, row.class, row.cells.len() as f64 * cell_size))
            .collect();

        if self.build != build || self.phases.len() != rows.len() {
            self.phases = vec![0.0; rows.len()];
            self.build = build;
        }

        let platform = ctl.platform_mut();
        let paused = platform
            .query_mount(&mount_id)
            .and_then(|mount| platform.style(mount, StyleProperty::AnimationPlayState))
            .and_then(PlayState::from_css)
            == Some(PlayState::Paused);

        for (phase, &(row, class, width)) in self.phases.iter_mut().zip(&rows) {
            if !paused {
                let duration = platform
                    .style(row, StyleProperty::AnimationDuration)
                    .and_then(parse_seconds)
                    .unwrap_or_else(|| base_speed.for_class(class));
                *phase = (*phase + dt.as_secs_f64() / duration).fract();
            }

            let direction = platform
                .style(row, StyleProperty::AnimationDirection)
                .and_then(AnimationDirection::from_css)
                .unwrap_or_else(|| class.default_direction());
            let progress = match direction {
                AnimationDirection::Normal => *phase,
                AnimationDirection::Reverse => 1.0 - *phase,
            };
            // Rows hold twice the cells needed, so half a row is one full loop.
            platform.set_scroll_offset(row, -progress * width / 2.0);
        }
    }
}

/// Draw the grid as it currently stands in the headless document.
pub fn render(frame: &mut Frame, ctl: &Controller) {
    let area = frame.area();
    let config = ctl.config();
    let platform = ctl.platform();
    let Some(mount) = platform.query_mount(&config.mount_id) else {
        return;
    };
    let cell_size = platform.cell_size();
    let rows = platform.children(mount);

    let lines: Vec<Line> = (0..area.height)
        .map(|y| {
            let Some(&row) = rows.get(y as usize) else {
                return Line::default();
            };
            let cells = platform.children(row);
            let offset = platform.scroll_offset(row);

            let spans: Vec<Span> = (0..area.width / 2)
                .map(|slot| {
                    let index = ((f64::from(slot) * cell_size - offset) / cell_size).floor();
                    match cells.get(index.max(0.0) as usize) {
                        Some(&cell) if index >= 0.0 => render_cell(platform, cell, config),
                        _ => Span::raw("  "),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_cell(platform: &HeadlessPlatform, cell: NodeId, config: &GridConfig) -> Span<'static> {
    let glyph = platform.attribute(cell, CHAR_ATTRIBUTE).unwrap_or(" ");
    let opacity = platform
        .style(cell, StyleProperty::Opacity)
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(config.opacity.grid);

    let mut style =
        Style::new().fg(opacity_to_color(opacity, config.opacity.grid, config.opacity.highlight));
    if platform.style(cell, StyleProperty::BorderColor).is_some() {
        style = style.add_modifier(Modifier::BOLD);
    }

    // Katakana are double width; pad single-width glyphs to fill the slot.
    let text = if glyph.is_ascii() {
        format!("{glyph} ")
    } else {
        glyph.to_string()
    };
    Span::styled(text, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_grid_effect::HostEvent;

    fn started(cols: u16, rows: u16) -> Controller {
        let config = GridConfig::default();
        let viewport = viewport_for(cols, rows, config.cell_size);
        let mut platform = HeadlessPlatform::new(viewport, config.cell_size);
        platform.add_mount(&config.mount_id);
        let mut ctl = LifecycleController::with_seed(platform, config, 3);
        ctl.start();
        ctl
    }

    #[test]
    fn test_terminal_geometry() {
        assert_eq!(viewport_for(81, 24, 50.0), Viewport::new(2000.0, 1200.0));
        assert_eq!(pointer_for(0, 0, 50.0), Point::new(25.0, 25.0));
        assert_eq!(pointer_for(3, 2, 50.0), Point::new(75.0, 125.0));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("12.5s"), Some(12.5));
        assert_eq!(parse_seconds("20s"), Some(20.0));
        assert_eq!(parse_seconds("0s"), None);
        assert_eq!(parse_seconds("20"), None);
    }

    #[test]
    fn test_rows_scroll_by_class() {
        let mut ctl = started(40, 10);
        let mut scroll = RowScroll::new();
        scroll.advance(&mut ctl, Duration::from_secs(10));

        let grid = ctl.grid().unwrap();
        let half_width = grid.rows[0].cells.len() as f64 * 50.0 / 2.0;
        let platform = ctl.platform();

        // Normal row: 10s of a 20s cycle.
        let normal = platform.scroll_offset(grid.rows[0].element);
        assert!((normal + 0.5 * half_width).abs() < 1e-9);

        // Reverse row: 10s of a 25s cycle, played backwards.
        let reverse = platform.scroll_offset(grid.rows[1].element);
        assert!((reverse + 0.6 * half_width).abs() < 1e-9);
    }

    #[test]
    fn test_paused_rows_hold_position() {
        let mut ctl = started(40, 10);
        let mut scroll = RowScroll::new();
        scroll.advance(&mut ctl, Duration::from_secs(3));
        let row = ctl.grid().unwrap().rows[0].element;
        let before = ctl.platform().scroll_offset(row);

        ctl.dispatch(HostEvent::VisibilityChange { hidden: true });
        scroll.advance(&mut ctl, Duration::from_secs(5));
        assert_eq!(ctl.platform().scroll_offset(row), before);

        ctl.dispatch(HostEvent::VisibilityChange { hidden: false });
        scroll.advance(&mut ctl, Duration::from_secs(1));
        assert_ne!(ctl.platform().scroll_offset(row), before);
    }

    #[test]
    fn test_inline_duration_overrides_class() {
        let mut ctl = started(40, 10);
        // Pointer on the right edge halves the normal row duration to 10s.
        ctl.update_animation(Point::new(1000.0, 0.0));

        let mut scroll = RowScroll::new();
        scroll.advance(&mut ctl, Duration::from_secs(5));

        let grid = ctl.grid().unwrap();
        let half_width = grid.rows[0].cells.len() as f64 * 50.0 / 2.0;
        let offset = ctl.platform().scroll_offset(grid.rows[0].element);
        assert!((offset + 0.5 * half_width).abs() < 1e-9);
    }
}
