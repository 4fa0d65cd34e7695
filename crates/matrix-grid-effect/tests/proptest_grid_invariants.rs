//! Property-based invariant tests for grid construction and row motion.
//!
//! Verifies:
//! 1. Row count is `ceil(height / cell) + 2` and every row holds `ceil(width / cell) * 2` cells
//! 2. Every cell character is drawn from the palette
//! 3. Row classes alternate by parity
//! 4. Applied row durations always sit inside the clamp bounds
//! 5. Pointer side of center flips the direction of every row

use matrix_grid_core::{CHAR_ATTRIBUTE, GridConfig, RowClass, Viewport};
use matrix_grid_effect::{HeadlessPlatform, builder, updater};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn arb_viewport() -> impl Strategy<Value = Viewport> {
    (1.0f64..1500.0, 1.0f64..1500.0).prop_map(|(w, h)| Viewport::new(w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn grid_covers_viewport(
        viewport in arb_viewport(),
        cell_size in 20.0f64..200.0,
        seed in any::<u64>(),
    ) {
        let config = GridConfig { cell_size, ..Default::default() };
        let palette = config.palette();
        let mut platform = HeadlessPlatform::new(viewport, cell_size);
        let mount = platform.add_mount(&config.mount_id);
        let mut rng = SmallRng::seed_from_u64(seed);

        let grid = builder::build(&mut platform, mount, viewport, &config, &mut rng);

        let expected_rows = (viewport.height / cell_size).ceil() as usize + 2;
        let expected_cells = (viewport.width / cell_size).ceil() as usize * 2;
        prop_assert_eq!(grid.rows.len(), expected_rows);
        prop_assert_eq!(platform.children(mount).len(), expected_rows);

        for (index, row) in grid.rows.iter().enumerate() {
            prop_assert_eq!(row.class, RowClass::for_index(index));
            prop_assert_eq!(platform.class_name(row.element), RowClass::for_index(index).class_name());
            prop_assert_eq!(platform.children(row.element).len(), expected_cells);
            for cell in &row.cells {
                prop_assert!(palette.contains(&cell.glyph));
                let attr = platform.attribute(cell.element, CHAR_ATTRIBUTE).unwrap_or_default();
                prop_assert_eq!(attr.chars().collect::<Vec<_>>(), vec![cell.glyph]);
            }
        }
    }

    #[test]
    fn row_duration_stays_clamped(
        index in 0usize..64,
        pointer_x in -5000.0f64..5000.0,
        width in 1.0f64..4000.0,
        base in 0.1f64..500.0,
    ) {
        let mut config = GridConfig::default();
        config.base_speed.normal = base;
        config.base_speed.reverse = base;
        let motion = updater::row_motion(index, pointer_x, width, &config);
        prop_assert!(motion.duration_secs >= config.speed_bounds.min);
        prop_assert!(motion.duration_secs <= config.speed_bounds.max);
    }

    #[test]
    fn pointer_side_flips_direction(
        index in 0usize..64,
        width in 2.0f64..4000.0,
        left_frac in 0.0f64..0.49,
        right_frac in 0.5f64..1.0,
    ) {
        let config = GridConfig::default();
        let left = updater::row_motion(index, width * left_frac, width, &config);
        let right = updater::row_motion(index, width * right_frac, width, &config);
        prop_assert_ne!(left.direction, right.direction);
    }
}

#[test]
fn rebuild_keeps_structure() {
    let config = GridConfig::default();
    let viewport = Viewport::new(1024.0, 768.0);
    let mut platform = HeadlessPlatform::new(viewport, config.cell_size);
    let mount = platform.add_mount(&config.mount_id);
    let mut rng = SmallRng::seed_from_u64(7);

    let first = builder::build(&mut platform, mount, viewport, &config, &mut rng);
    let first_glyphs: Vec<char> = first.cells().map(|c| c.glyph).collect();
    let second = builder::build(&mut platform, mount, viewport, &config, &mut rng);
    let second_glyphs: Vec<char> = second.cells().map(|c| c.glyph).collect();

    assert_eq!(first.dimensions, second.dimensions);
    assert_eq!(platform.children(mount).len(), second.dimensions.rows);
    assert_eq!(first_glyphs.len(), second_glyphs.len());
    assert_ne!(first_glyphs, second_glyphs);
}

#[test]
fn sampling_reaches_whole_palette() {
    let config = GridConfig::default();
    let palette = config.palette();
    let viewport = Viewport::new(1920.0, 1080.0);
    let mut platform = HeadlessPlatform::new(viewport, config.cell_size);
    let mount = platform.add_mount(&config.mount_id);
    let mut rng = SmallRng::seed_from_u64(42);

    let grid = builder::build(&mut platform, mount, viewport, &config, &mut rng);
    // 24 rows * 78 cells against a 47 character palette
    for ch in &palette {
        assert!(grid.cells().any(|cell| cell.glyph == *ch), "never sampled {ch}");
    }
}
