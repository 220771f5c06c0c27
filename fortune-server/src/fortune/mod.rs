//! Fortune content, the random draw and the shareable link codec.

pub mod catalog;
pub mod codec;
pub mod generator;

use catalog::{fortunes, lucky_colors, lucky_places, Language};

/// The outcome of one draw, stored as indices so the display language can
/// change without losing the draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FortuneSelection {
    pub fortune_id: usize,
    pub color_index: usize,
    pub place_index: usize,
    pub lucky_number: i64,
}

/// Display fields of a selection resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneView {
    pub fortune_id: usize,
    pub text: &'static str,
    pub color_name: &'static str,
    pub color_hex: &'static str,
    pub lucky_number: i64,
    pub place: &'static str,
}

impl FortuneSelection {
    /// Resolve the display fields for `language`.
    /// `None` if any index is out of range for that language's lists.
    pub fn resolve(&self, language: Language) -> Option<FortuneView> {
        let color = lucky_colors(language).get(self.color_index)?;
        Some(FortuneView {
            fortune_id: self.fortune_id,
            text: fortunes(language).get(self.fortune_id)?,
            color_name: color.name,
            color_hex: color.hex,
            lucky_number: self.lucky_number,
            place: lucky_places(language).get(self.place_index)?,
        })
    }

    /// Resolve for `language`, falling back to the other language when the
    /// lists differ in length.
    pub fn resolve_or_fallback(&self, language: Language) -> Option<FortuneView> {
        self.resolve(language)
            .or_else(|| self.resolve(language.other()))
    }
}
