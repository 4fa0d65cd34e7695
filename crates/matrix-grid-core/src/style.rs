//! Class names, attributes and style properties written to the host document.

/// Class carried by every row element.
pub const ROW_CLASS: &str = "grid-row";

/// Class carried by every cell element.
pub const CELL_CLASS: &str = "grid-cell";

/// Attribute holding a cell's character; the stylesheet renders it via `attr()`.
pub const CHAR_ATTRIBUTE: &str = "data-char";

/// Row class derived from row parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowClass {
    /// Even rows.
    Normal,
    /// Odd rows.
    Reverse,
}

impl RowClass {
    /// Class for the row at `index`.
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RowClass::Normal
        } else {
            RowClass::Reverse
        }
    }

    /// Full `class` attribute value for a row of this class.
    pub const fn class_name(self) -> &'static str {
        match self {
            RowClass::Normal => "grid-row",
            RowClass::Reverse => "grid-row reverse",
        }
    }

    /// Direction the stylesheet assigns before any pointer input.
    pub const fn default_direction(self) -> AnimationDirection {
        match self {
            RowClass::Normal => AnimationDirection::Normal,
            RowClass::Reverse => AnimationDirection::Reverse,
        }
    }
}

/// Value of the `animation-direction` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationDirection {
    Normal,
    Reverse,
}

impl AnimationDirection {
    pub const fn as_css(self) -> &'static str {
        match self {
            AnimationDirection::Normal => "normal",
            AnimationDirection::Reverse => "reverse",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(AnimationDirection::Normal),
            "reverse" => Some(AnimationDirection::Reverse),
            _ => None,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            AnimationDirection::Normal => AnimationDirection::Reverse,
            AnimationDirection::Reverse => AnimationDirection::Normal,
        }
    }
}

/// Value of the `animation-play-state` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
}

impl PlayState {
    pub const fn as_css(self) -> &'static str {
        match self {
            PlayState::Running => "running",
            PlayState::Paused => "paused",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value {
            "running" => Some(PlayState::Running),
            "paused" => Some(PlayState::Paused),
            _ => None,
        }
    }
}

/// Inline style properties the effect mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    AnimationDuration,
    AnimationDirection,
    AnimationPlayState,
    BorderColor,
    Opacity,
}

impl StyleProperty {
    /// CSS property name.
    pub const fn css_name(self) -> &'static str {
        match self {
            StyleProperty::AnimationDuration => "animation-duration",
            StyleProperty::AnimationDirection => "animation-direction",
            StyleProperty::AnimationPlayState => "animation-play-state",
            StyleProperty::BorderColor => "border-color",
            StyleProperty::Opacity => "opacity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_class_follows_parity() {
        assert_eq!(RowClass::for_index(0), RowClass::Normal);
        assert_eq!(RowClass::for_index(1), RowClass::Reverse);
        assert_eq!(RowClass::for_index(2), RowClass::Normal);
        assert_eq!(RowClass::for_index(7), RowClass::Reverse);
    }

    #[test]
    fn test_class_names_share_row_class() {
        assert!(RowClass::Normal.class_name().starts_with(ROW_CLASS));
        assert!(RowClass::Reverse.class_name().starts_with(ROW_CLASS));
        assert!(RowClass::Reverse.class_name().ends_with("reverse"));
    }

    #[test]
    fn test_css_values_parse_back() {
        for dir in [AnimationDirection::Normal, AnimationDirection::Reverse] {
            assert_eq!(AnimationDirection::from_css(dir.as_css()), Some(dir));
        }
        for state in [PlayState::Running, PlayState::Paused] {
            assert_eq!(PlayState::from_css(state.as_css()), Some(state));
        }
        assert_eq!(AnimationDirection::from_css("alternate"), None);
    }
}
