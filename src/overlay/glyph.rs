use std::str::FromStr;

use crate::foundation::error::{InstaframeError, InstaframeResult};

/// Fixed palette of decorative stamp symbols.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StampGlyph {
    Heart,
    Star,
    Headphones,
    SmilingFaceWithHearts,
}

impl StampGlyph {
    /// Palette in button order.
    pub const ALL: [StampGlyph; 4] = [
        StampGlyph::Heart,
        StampGlyph::Star,
        StampGlyph::Headphones,
        StampGlyph::SmilingFaceWithHearts,
    ];

    /// Display symbol painted for this stamp.
    pub fn symbol(self) -> &'static str {
        match self {
            StampGlyph::Heart => "\u{2764}\u{fe0f}",
            StampGlyph::Star => "\u{2b50}\u{fe0f}",
            StampGlyph::Headphones => "\u{1f3a7}",
            StampGlyph::SmilingFaceWithHearts => "\u{1f970}",
        }
    }

    /// Stable snake_case name, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            StampGlyph::Heart => "heart",
            StampGlyph::Star => "star",
            StampGlyph::Headphones => "headphones",
            StampGlyph::SmilingFaceWithHearts => "smiling_face_with_hearts",
        }
    }

    /// Straight RGBA tint used when no stamp font is available.
    pub fn fallback_rgba(self) -> [u8; 4] {
        match self {
            StampGlyph::Heart => [226, 40, 60, 255],
            StampGlyph::Star => [250, 198, 30, 255],
            StampGlyph::Headphones => [58, 60, 72, 255],
            StampGlyph::SmilingFaceWithHearts => [250, 176, 58, 255],
        }
    }
}

impl FromStr for StampGlyph {
    type Err = InstaframeError;

    /// Accepts either the stable name or the display symbol.
    fn from_str(s: &str) -> InstaframeResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.name() == s || g.symbol() == s || g.symbol().trim_end_matches('\u{fe0f}') == s)
            .ok_or_else(|| InstaframeError::validation(format!("unknown stamp glyph '{s}'")))
    }
}

impl std::fmt::Display for StampGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/glyph.rs"]
mod tests;
