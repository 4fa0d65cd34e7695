#![forbid(unsafe_code)]

//! Browser frontend for the matrix grid effect.
//!
//! On `wasm32` this crate binds [`matrix_grid_effect::LifecycleController`] to
//! the page DOM and exports a `MatrixGrid` class. Loading the module starts a
//! default instance and publishes it as `window.MatrixGrid`, so a page only
//! needs a `<div id="matrixGrid">` and the grid stylesheet.
//!
//! Failed browser calls are reported through `tracing::warn!` and otherwise
//! ignored. This crate installs no subscriber, so those warnings are silent
//! unless the embedding wasm application installs one.
//!
//! Native builds only compile the option parsing, so `cargo check --workspace`
//! stays green off-wasm.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{MatrixGrid, WebPlatform};

use matrix_grid_core::{ConfigError, GridConfig};

/// Build a configuration from JSON overrides; absent keys keep their defaults.
pub fn config_from_json(text: &str) -> Result<GridConfig, ConfigError> {
    let config: GridConfig =
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Whether a `document.readyState` value means the page is still parsing.
///
/// `interactive` already fired `DOMContentLoaded`, so only `loading` defers the build.
pub fn is_loading_state(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Serialize a configuration for handing back to JavaScript.
pub fn config_to_json(config: &GridConfig) -> Result<String, ConfigError> {
    serde_json::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(config_from_json("{}").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_overrides_merge_with_defaults() {
        let config = config_from_json(r#"{"cell_size": 24, "opacity": {"highlight": 0.6}}"#)
            .unwrap();
        assert_eq!(config.cell_size, 24.0);
        assert_eq!(config.opacity.highlight, 0.6);
        assert_eq!(config.opacity.grid, 0.08);
    }

    #[test]
    fn test_rejects_invalid_overrides() {
        assert!(matches!(
            config_from_json(r#"{"characters": ""}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            config_from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_only_loading_state_defers() {
        assert!(is_loading_state("loading"));
        assert!(!is_loading_state("interactive"));
        assert!(!is_loading_state("complete"));
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = GridConfig {
            highlight_color: "#39ff14".to_string(),
            ..Default::default()
        };
        let text = config_to_json(&config).unwrap();
        assert_eq!(config_from_json(&text).unwrap(), config);
    }
}
