use crate::error::{PlaygroundError, Result};

/// Glyphs the playground draws from. Some entries carry a variation selector,
/// so glyphs are kept as strings rather than `char`s.
pub const EMOJI_GLYPHS: [&str; 17] = [
    "🥎", "☕️", "🍧", "🥣", "🎈", "🎀", "🧽", "📍", "✂️", "💚", "🧿", "💴", "💿", "🎲", "🥦", "🥑",
    "🌍",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<&'static str>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(EMOJI_GLYPHS.to_vec())
    }
}

impl Palette {
    #[must_use]
    pub const fn new(glyphs: Vec<&'static str>) -> Self {
        Self { glyphs }
    }

    /// Picks a glyph uniformly at random.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Result<&'static str> {
        rng.choice(self.glyphs.iter().copied())
            .ok_or(PlaygroundError::EmptyPalette)
    }

    #[must_use]
    pub fn contains(&self, glyph: &str) -> bool {
        self.glyphs.contains(&glyph)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_has_seventeen_glyphs() {
        assert_eq!(Palette::default().len(), 17);
    }

    #[test]
    fn picks_come_from_the_palette() {
        let palette = Palette::default();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let glyph = palette.pick(&mut rng).unwrap();
            assert!(palette.contains(glyph));
        }
    }

    #[test]
    fn every_glyph_eventually_shows_up() {
        let palette = Palette::default();
        let mut rng = fastrand::Rng::with_seed(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(palette.pick(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), palette.len());
    }

    #[test]
    fn empty_palette_fails_instead_of_returning_a_blank() {
        let palette = Palette::new(Vec::new());
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(palette.pick(&mut rng), Err(PlaygroundError::EmptyPalette));
    }
}
