//! Character constants for the grid.

/// Characters sampled into grid cells: binary digits followed by katakana.
pub const DEFAULT_PALETTE: &str =
    "01アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";
