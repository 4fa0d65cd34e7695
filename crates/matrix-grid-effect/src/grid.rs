//! The built grid: element handles plus the style state last written to them.

use matrix_grid_core::{AnimationDirection, GridConfig, RowClass, Viewport};

/// Row and cell counts for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub rows: usize,
    pub cells_per_row: usize,
}

impl GridDimensions {
    /// `ceil(height / cell) + extra_rows` rows of `ceil(width / cell) * column_factor` cells.
    pub fn for_viewport(viewport: Viewport, config: &GridConfig) -> Self {
        let cell = config.cell_size;
        let span = |extent: f64| (extent / cell).ceil().max(0.0) as usize;
        Self {
            rows: span(viewport.height) + config.layout.extra_rows,
            cells_per_row: span(viewport.width) * config.layout.column_factor,
        }
    }

    pub const fn cell_count(&self) -> usize {
        self.rows * self.cells_per_row
    }
}

/// Animation applied to a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMotion {
    /// Seconds per animation cycle; lower is faster.
    pub duration_secs: f64,
    pub direction: AnimationDirection,
}

/// Highlight applied to a cell near the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// 1 under the pointer, falling linearly to 0 at the radius.
    pub intensity: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct Cell<E> {
    pub element: E,
    /// Sampled once at build time.
    pub glyph: char,
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone)]
pub struct Row<E> {
    pub element: E,
    pub index: usize,
    pub class: RowClass,
    /// `None` until the first pointer update; the stylesheet drives the row until then.
    pub motion: Option<RowMotion>,
    pub cells: Vec<Cell<E>>,
}

/// A fully built grid attached under its mount element.
#[derive(Debug, Clone)]
pub struct GridRoot<E> {
    pub mount: E,
    pub viewport: Viewport,
    pub dimensions: GridDimensions,
    pub rows: Vec<Row<E>>,
}

impl<E> GridRoot<E> {
    pub fn cells(&self) -> impl Iterator<Item = &Cell<E>> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn highlighted_count(&self) -> usize {
        self.cells().filter(|cell| cell.highlight.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_grid_core::LayoutBuffer;

    #[test]
    fn test_dimensions_match_formula() {
        let config = GridConfig::default();
        let dims = GridDimensions::for_viewport(Viewport::new(1280.0, 720.0), &config);
        // ceil(720 / 50) + 2 = 17, ceil(1280 / 50) * 2 = 52
        assert_eq!(dims.rows, 17);
        assert_eq!(dims.cells_per_row, 52);
        assert_eq!(dims.cell_count(), 17 * 52);
    }

    #[test]
    fn test_dimensions_exact_multiple() {
        let config = GridConfig::default();
        let dims = GridDimensions::for_viewport(Viewport::new(500.0, 500.0), &config);
        assert_eq!(dims.rows, 12);
        assert_eq!(dims.cells_per_row, 20);
    }

    #[test]
    fn test_dimensions_zero_viewport_keeps_buffer_rows() {
        let config = GridConfig::default();
        let dims = GridDimensions::for_viewport(Viewport::new(0.0, 0.0), &config);
        assert_eq!(dims.rows, 2);
        assert_eq!(dims.cells_per_row, 0);
    }

    #[test]
    fn test_dimensions_respect_layout_buffer() {
        let config = GridConfig {
            layout: LayoutBuffer {
                extra_rows: 0,
                column_factor: 3,
            },
            ..Default::default()
        };
        let dims = GridDimensions::for_viewport(Viewport::new(120.0, 120.0), &config);
        assert_eq!(dims.rows, 3);
        assert_eq!(dims.cells_per_row, 9);
    }
}
