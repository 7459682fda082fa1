//! Board accent colors
//!
//! Every board gets a stable color: its configured one when that parses, or
//! one derived from its name otherwise.

use super::Rgba;
use crate::core::board::Board;
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::hash::Hasher;

/// Hover colors are this much darker (HSL lightness ratio)
pub const HOVER_DARKEN: f32 = 0.1;

/// Style property `line_style` targets when no key is given
pub const DEFAULT_LINE_STYLE_KEY: &str = "border-left-color";

/// Resolved color pair of a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColors {
    pub color: String,
    pub hover: String,
}

/// Returns the board's CSS color.
///
/// The configured color is tried as-is, then with a `#` prefix (bare hex
/// fragments are common in board settings). If neither parses, the color is
/// derived from the board name.
pub fn color_for(board: &Board) -> String {
    if let Some(color) = board.color.as_deref() {
        if let Some(parsed) = Rgba::parse(color).or_else(|| Rgba::parse(&format!("#{color}"))) {
            return parsed.to_css();
        }
        tracing::debug!(
            "Board {} has unparseable color '{color}', using name hash",
            board.id
        );
    }
    name_color(&board.name)
}

/// `#rrggbb` from the low 24 bits of a fast hash of `name`
pub fn name_color(name: &str) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(name.as_bytes());
    format!("#{:06x}", hasher.finish() & 0x00FF_FFFF)
}

/// Color and hover color of a board
pub fn colors_for(board: &Board) -> BoardColors {
    let color = color_for(board);
    let hover = hover_color(&color);
    BoardColors { color, hover }
}

/// Darkened variant of a color produced by [`color_for`]
pub fn hover_color(color: &str) -> String {
    match Rgba::parse(color) {
        Some(c) => c.darken(HOVER_DARKEN).to_css(),
        None => color.to_string(),
    }
}

/// Inline style map `{key: color}` for a board's accent line
pub fn line_style(board: &Board, key: Option<&str>) -> BTreeMap<String, String> {
    let key = key.unwrap_or(DEFAULT_LINE_STYLE_KEY);
    BTreeMap::from([(key.to_string(), color_for(board))])
}
