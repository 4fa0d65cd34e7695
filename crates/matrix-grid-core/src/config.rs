//! Tunables for the grid effect.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chars::DEFAULT_PALETTE;
use crate::error::ConfigError;
use crate::style::RowClass;

/// Base animation-cycle duration in seconds for each row class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSpeed {
    pub normal: f64,
    pub reverse: f64,
}

impl Default for BaseSpeed {
    fn default() -> Self {
        Self {
            normal: 20.0,
            reverse: 25.0,
        }
    }
}

impl BaseSpeed {
    pub const fn for_class(&self, class: RowClass) -> f64 {
        match class {
            RowClass::Normal => self.normal,
            RowClass::Reverse => self.reverse,
        }
    }
}

/// How strongly the pointer influences the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseEffect {
    /// Highlight radius in pixels.
    pub radius: f64,
    /// Scales the horizontal pointer offset into a speed change.
    pub speed_multiplier: f64,
}

impl Default for MouseEffect {
    fn default() -> Self {
        Self {
            radius: 100.0,
            speed_multiplier: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opacity {
    /// Resting opacity of the grid, applied by the stylesheet.
    pub grid: f64,
    /// Opacity of a cell directly under the pointer.
    pub highlight: f64,
}

impl Default for Opacity {
    fn default() -> Self {
        Self {
            grid: 0.08,
            highlight: 0.3,
        }
    }
}

/// Clamp applied to computed row durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 50.0,
        }
    }
}

impl SpeedBounds {
    pub fn clamp(&self, seconds: f64) -> f64 {
        seconds.max(self.min).min(self.max)
    }
}

/// Off-screen margins so scrolling rows never expose an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutBuffer {
    /// Extra rows below the viewport.
    pub extra_rows: usize,
    /// Multiplier on the number of cells needed to span the viewport width.
    pub column_factor: usize,
}

impl Default for LayoutBuffer {
    fn default() -> Self {
        Self {
            extra_rows: 2,
            column_factor: 2,
        }
    }
}

/// Grid configuration. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Id of the container element the grid is mounted into.
    pub mount_id: String,
    /// Edge length of a square cell in pixels.
    pub cell_size: f64,
    /// Palette sampled into cells, one `char` per entry.
    pub characters: String,
    pub base_speed: BaseSpeed,
    pub mouse_effect: MouseEffect,
    pub opacity: Opacity,
    pub speed_bounds: SpeedBounds,
    pub layout: LayoutBuffer,
    /// Quiet period after the last resize before the grid is rebuilt.
    pub resize_debounce_ms: u64,
    /// Border color applied to highlighted cells.
    pub highlight_color: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            mount_id: "matrixGrid".to_string(),
            cell_size: 50.0,
            characters: DEFAULT_PALETTE.to_string(),
            base_speed: BaseSpeed::default(),
            mouse_effect: MouseEffect::default(),
            opacity: Opacity::default(),
            speed_bounds: SpeedBounds::default(),
            layout: LayoutBuffer::default(),
            resize_debounce_ms: 250,
            highlight_color: "var(--primary-green)".to_string(),
        }
    }
}

impl GridConfig {
    /// Palette characters in order.
    pub fn palette(&self) -> Vec<char> {
        self.characters.chars().collect()
    }

    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Reject values the effect cannot render with.
    ///
    /// The runtime never checks these; loaders call this before handing a
    /// configuration to the effect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.cell_size) {
            return Err(ConfigError::invalid(format!(
                "cell_size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if self.characters.is_empty() {
            return Err(ConfigError::invalid("characters must not be empty"));
        }
        if !positive(self.base_speed.normal) || !positive(self.base_speed.reverse) {
            return Err(ConfigError::invalid("base speeds must be positive"));
        }
        if !positive(self.mouse_effect.radius) {
            return Err(ConfigError::invalid("mouse_effect.radius must be positive"));
        }
        if !self.mouse_effect.speed_multiplier.is_finite() {
            return Err(ConfigError::invalid("mouse_effect.speed_multiplier must be finite"));
        }
        if !(self.opacity.grid.is_finite() && self.opacity.highlight.is_finite()) {
            return Err(ConfigError::invalid("opacity values must be finite"));
        }
        if !(self.speed_bounds.min.is_finite() && self.speed_bounds.max.is_finite()) {
            return Err(ConfigError::invalid("speed_bounds must be finite"));
        }
        if self.speed_bounds.min > self.speed_bounds.max {
            return Err(ConfigError::invalid(format!(
                "speed_bounds.min ({}) exceeds speed_bounds.max ({})",
                self.speed_bounds.min, self.speed_bounds.max
            )));
        }
        if self.layout.column_factor == 0 {
            return Err(ConfigError::invalid("layout.column_factor must be at least 1"));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero; rejects NaN.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_size, 50.0);
        assert_eq!(config.base_speed.for_class(RowClass::Normal), 20.0);
        assert_eq!(config.base_speed.for_class(RowClass::Reverse), 25.0);
        assert_eq!(config.resize_debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_palette_splits_multibyte_chars() {
        let config = GridConfig {
            characters: "01ア".to_string(),
            ..Default::default()
        };
        assert_eq!(config.palette(), vec!['0', '1', 'ア']);
    }

    #[test]
    fn test_speed_bounds_clamp() {
        let bounds = SpeedBounds::default();
        assert_eq!(bounds.clamp(0.0), 5.0);
        assert_eq!(bounds.clamp(1000.0), 50.0);
        assert_eq!(bounds.clamp(20.0), 20.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = GridConfig {
            characters: String::new(),
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        let zero_cell = GridConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(zero_cell.validate().is_err());

        let inverted = GridConfig {
            speed_bounds: SpeedBounds {
                min: 60.0,
                max: 10.0,
            },
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let no_columns = GridConfig {
            layout: LayoutBuffer {
                extra_rows: 2,
                column_factor: 0,
            },
            ..Default::default()
        };
        assert!(no_columns.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut speed = GridConfig::default();
        speed.base_speed.reverse = f64::NAN;
        assert!(matches!(speed.validate(), Err(ConfigError::Invalid(_))));

        let mut radius = GridConfig::default();
        radius.mouse_effect.radius = f64::NAN;
        assert!(radius.validate().is_err());

        let mut factor = GridConfig::default();
        factor.mouse_effect.speed_multiplier = f64::NAN;
        assert!(factor.validate().is_err());

        let mut bounds = GridConfig::default();
        bounds.speed_bounds.max = f64::NAN;
        assert!(bounds.validate().is_err());

        let mut opacity = GridConfig::default();
        opacity.opacity.highlight = f64::NAN;
        assert!(opacity.validate().is_err());

        let mut infinite = GridConfig::default();
        infinite.base_speed.normal = f64::INFINITY;
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{"cell_size": 32, "mouse_effect": {"radius": 80}}"#).unwrap();
        assert_eq!(config.cell_size, 32.0);
        assert_eq!(config.mouse_effect.radius, 80.0);
        assert_eq!(config.mouse_effect.speed_multiplier, 0.5);
        assert_eq!(config.characters, DEFAULT_PALETTE);
    }
}
