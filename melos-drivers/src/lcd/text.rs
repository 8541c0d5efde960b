//! Text folding and fitting for fixed-width character panels.
//!
//! HD44780 character ROMs only cover ASCII (plus vendor glyphs we do not
//! rely on), so every line is folded to ASCII before it goes out: NFKD
//! decomposition, then combining marks and any remaining non-ASCII scalars
//! are dropped. Folding happens before the width cut so a decomposition
//! that lengthens the text cannot push a line past the panel edge.

use heapless::String;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use melos_core::config::MAX_DISPLAY_WIDTH;

/// Capacity of one fitted line, sized for the widest supported panel.
pub const MAX_LINE_LEN: usize = MAX_DISPLAY_WIDTH as usize;

/// One display line, folded and padded to its exact width.
pub type Line = String<MAX_LINE_LEN>;

/// Horizontal placement of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    Left,
    Center,
}

/// Folds `text` to ASCII and fits it to exactly `width` characters.
///
/// Oversized text is cut, undersized text is padded with spaces on the
/// side(s) `align` dictates. Centering favors the left cell when the
/// padding is odd.
pub fn fit(text: &str, width: usize, align: Align) -> Line {
    debug_assert!(width <= MAX_LINE_LEN);
    let mut content = Line::new();
    for c in folded(text).take(width) {
        let _ = content.push(c);
    }
    // all ASCII from here on, so bytes and characters agree
    let lead = match align {
        Align::Left => 0,
        Align::Center => width.saturating_sub(content.len()) / 2,
    };
    let mut line = Line::new();
    for _ in 0..lead {
        let _ = line.push(' ');
    }
    let _ = line.push_str(&content);
    while line.len() < width {
        let _ = line.push(' ');
    }
    line
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
}
