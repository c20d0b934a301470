//! Palette struct: an ordered, non-empty list of output colors.

use serde::{Deserialize, Serialize};

use super::error::PaletteError;
use crate::color::Rgb;

/// An ordered, non-empty set of output colors.
///
/// Order is significant: nearest-color ties resolve to the earliest entry.
///
/// # Example
///
/// ```
/// use poster_pipeline::{Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
///
/// let palette = Palette::from_hex(&["#000", "#ff0000", "#fff"]).unwrap();
/// assert_eq!(palette.get(1), Rgb::new(255, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Create a palette from hex color strings (`#RGB` or `#RRGGBB`).
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.as_ref()
                    .parse::<Rgb>()
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Whether `color` is one of the palette entries.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
