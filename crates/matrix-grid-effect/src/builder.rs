//! Grid construction.

use matrix_grid_core::{CELL_CLASS, CHAR_ATTRIBUTE, GridConfig, RowClass, Viewport};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{Cell, GridDimensions, GridRoot, Row};
use crate::platform::Platform;

/// Replace everything under `mount` with a fresh grid sized to `viewport`.
///
/// Each cell gets one character sampled uniformly from the palette.
pub fn build<P, R>(
    platform: &mut P,
    mount: P::Element,
    viewport: Viewport,
    config: &GridConfig,
    rng: &mut R,
) -> GridRoot<P::Element>
where
    P: Platform,
    R: Rng + ?Sized,
{
    platform.clear_children(&mount);

    let dimensions = GridDimensions::for_viewport(viewport, config);
    let palette = config.palette();
    let mut glyph_buf = [0u8; 4];

    let rows = (0..dimensions.rows)
        .map(|index| {
            let class = RowClass::for_index(index);
            let element = platform.create_element(class.class_name());

            let cells = (0..dimensions.cells_per_row)
                .map(|_| {
                    let glyph = palette.choose(&mut *rng).copied().unwrap_or(' ');
                    let cell = platform.create_element(CELL_CLASS);
                    platform.set_attribute(&cell, CHAR_ATTRIBUTE, glyph.encode_utf8(&mut glyph_buf));
                    platform.append_child(&element, &cell);
                    Cell {
                        element: cell,
                        glyph,
                        highlight: None,
                    }
                })
                .collect();

            platform.append_child(&mount, &element);
            Row {
                element,
                index,
                class,
                motion: None,
                cells,
            }
        })
        .collect();

    tracing::debug!(
        rows = dimensions.rows,
        cells_per_row = dimensions.cells_per_row,
        width = viewport.width,
        height = viewport.height,
        "built matrix grid"
    );

    GridRoot {
        mount,
        viewport,
        dimensions,
        rows,
    }
}
