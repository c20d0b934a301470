//! Palette derivation from user-picked colors.
//!
//! Users pick 2 to 8 swatches. With strict swatches the picks become the
//! palette as-is; otherwise they are stretched into an evenly spaced
//! gradient whose first and last entries are the first and last picks.

use poster_pipeline::{Palette, Rgb};

use crate::error::DeriveError;

pub const MIN_COLORS: usize = 2;
pub const MAX_COLORS: usize = 8;
pub const MAX_STEPS: usize = 256;

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("navy", Rgb::new(0, 0, 128)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("gold", Rgb::new(255, 215, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("teal", Rgb::new(0, 128, 128)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("purple", Rgb::new(128, 0, 128)),
    ("pink", Rgb::new(255, 192, 203)),
    ("brown", Rgb::new(165, 42, 42)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
];

/// Parse a color name or hex string (`#RGB`, `#RRGGBB`, `#` optional).
pub fn parse_color(s: &str) -> Result<Rgb, DeriveError> {
    let trimmed = s.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(*rgb);
    }
    trimmed
        .parse::<Rgb>()
        .map_err(|_| DeriveError::UnknownColor(trimmed.to_string()))
}

/// Parse a comma-separated color list, e.g. `"#000,#fff,red"`.
pub fn parse_color_list(s: &str) -> Result<Vec<Rgb>, DeriveError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_color)
        .collect()
}

/// Spread `steps` colors evenly along the polyline through `colors`.
///
/// `steps - 1` equal intervals cover `colors.len() - 1` segments; channels
/// are interpolated linearly in encoded RGB and rounded. The first and last
/// outputs equal the first and last inputs exactly.
pub fn interpolate_gradient(colors: &[Rgb], steps: usize) -> Vec<Rgb> {
    match (colors.len(), steps) {
        (0, _) | (_, 0) => return Vec::new(),
        (1, _) | (_, 1) => return vec![colors[0]],
        _ => {}
    }

    let segments = colors.len() - 1;
    (0..steps)
        .map(|i| {
            if i == steps - 1 {
                return colors[segments];
            }
            let t = i as f32 / (steps - 1) as f32 * segments as f32;
            let seg = (t.floor() as usize).min(segments - 1);
            lerp(colors[seg], colors[seg + 1], t - seg as f32)
        })
        .collect()
}

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Build the processing palette from picked swatches.
///
/// Strict mode returns the swatches in order. Gradient mode interpolates
/// `steps` entries and collapses duplicates, keeping first occurrences.
pub fn derive(colors: &[Rgb], strict_swatches: bool, steps: usize) -> Result<Palette, DeriveError> {
    if !(MIN_COLORS..=MAX_COLORS).contains(&colors.len()) {
        return Err(DeriveError::ColorCount {
            count: colors.len(),
            min: MIN_COLORS,
            max: MAX_COLORS,
        });
    }

    let entries = if strict_swatches {
        colors.to_vec()
    } else {
        if !(2..=MAX_STEPS).contains(&steps) {
            return Err(DeriveError::Steps {
                steps,
                max: MAX_STEPS,
            });
        }
        let mut unique: Vec<Rgb> = Vec::with_capacity(steps);
        for rgb in interpolate_gradient(colors, steps) {
            if !unique.contains(&rgb) {
                unique.push(rgb);
            }
        }
        unique
    };

    Ok(Palette::new(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_names_and_hex() {
        assert_eq!(parse_color("black").unwrap(), Rgb::BLACK);
        assert_eq!(parse_color("  White ").unwrap(), Rgb::WHITE);
        assert_eq!(parse_color("#f00").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_color("00ff00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(
            parse_color("mauve"),
            Err(DeriveError::UnknownColor("mauve".to_string()))
        );
    }

    #[test]
    fn test_parse_color_list() {
        let colors = parse_color_list("#000, red ,#ffffff,").unwrap();
        assert_eq!(colors, vec![Rgb::BLACK, Rgb::new(255, 0, 0), Rgb::WHITE]);
        assert!(parse_color_list("#000,nope").is_err());
    }

    #[test]
    fn test_gradient_two_colors() {
        let gradient = interpolate_gradient(&[Rgb::BLACK, Rgb::WHITE], 5);
        let greys: Vec<u8> = gradient.iter().map(|c| c.r).collect();
        // 0, 63.75, 127.5, 191.25, 255
        assert_eq!(greys, vec![0, 64, 128, 191, 255]);
    }

    #[test]
    fn test_gradient_spreads_across_segments() {
        let red = Rgb::new(255, 0, 0);
        let gradient = interpolate_gradient(&[Rgb::BLACK, red, Rgb::WHITE], 5);
        assert_eq!(gradient.len(), 5);
        assert_eq!(gradient[0], Rgb::BLACK);
        // t = 1.0 lands exactly on the middle swatch
        assert_eq!(gradient[2], red);
        assert_eq!(gradient[4], Rgb::WHITE);
        assert_eq!(gradient[1], Rgb::new(128, 0, 0));
        assert_eq!(gradient[3], Rgb::new(255, 128, 128));
    }

    #[test]
    fn test_gradient_endpoints_exact() {
        let a = Rgb::new(13, 200, 77);
        let b = Rgb::new(250, 3, 129);
        let c = Rgb::new(90, 90, 91);
        for steps in 2..40 {
            let gradient = interpolate_gradient(&[a, b, c], steps);
            assert_eq!(gradient.len(), steps);
            assert_eq!(gradient[0], a);
            assert_eq!(gradient[steps - 1], c);
        }
    }

    #[test]
    fn test_derive_strict_keeps_swatches() {
        let swatches = [Rgb::WHITE, Rgb::BLACK, Rgb::WHITE];
        let palette = derive(&swatches, true, 8).unwrap();
        assert_eq!(palette.colors(), &swatches);
    }

    #[test]
    fn test_derive_gradient_dedups() {
        // Same color twice: every gradient entry is identical
        let palette = derive(&[Rgb::WHITE, Rgb::WHITE], false, 8).unwrap();
        assert_eq!(palette.colors(), &[Rgb::WHITE]);

        let palette = derive(&[Rgb::BLACK, Rgb::WHITE], false, 8).unwrap();
        assert_eq!(palette.len(), 8);
    }

    #[test]
    fn test_derive_rejects_bad_counts() {
        assert!(matches!(
            derive(&[Rgb::BLACK], true, 8),
            Err(DeriveError::ColorCount { count: 1, .. })
        ));
        assert!(matches!(
            derive(&[Rgb::BLACK; 9], true, 8),
            Err(DeriveError::ColorCount { count: 9, .. })
        ));
        assert!(matches!(
            derive(&[Rgb::BLACK, Rgb::WHITE], false, 1),
            Err(DeriveError::Steps { steps: 1, .. })
        ));
    }
}
