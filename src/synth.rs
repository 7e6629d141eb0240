use palette::Srgb;

use crate::brightness::BrightnessKey;
use crate::color::{ColorHsl, hsl_to_rgb, lerp, lerp_hue_short, wrap_hue};
use crate::scoring::{ScoringTargets, rank_candidates};

/// Number of interpolation steps between the base and secondary anchors.
/// Primary slot `i` sits at `t = i / PRIMARY_STEPS`.
pub const PRIMARY_STEPS: f32 = 6.0;

/// Hue offset between consecutive accent roles.
pub const ACCENT_HUE_STEP: f32 = 45.0;

/// Accent lightness stays inside this band so accents read on both the dark
/// and the light end of the primary ramp.
pub const ACCENT_BRIGHTNESS_RANGE: (f32, f32) = (35.0, 75.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HslPalette {
    pub primary: [ColorHsl; 8],
    pub accents: [ColorHsl; 8],
}

/// A finished base16 palette: `base00..base07` are the primaries and
/// `base08..base0F` the accents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Base16Palette {
    pub primary: [Srgb<u8>; 8],
    pub accents: [Srgb<u8>; 8],
}

impl Base16Palette {
    pub fn from_hsl(palette: &HslPalette) -> Self {
        Self {
            primary: palette.primary.map(hsl_to_rgb),
            accents: palette.accents.map(hsl_to_rgb),
        }
    }

    /// All sixteen colors in slot order.
    pub fn colors(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        self.primary.iter().chain(self.accents.iter()).copied()
    }
}

/// Naive component-wise interpolation. Hue is lerped as a plain number, so a
/// ramp from 350° to 10° sweeps the long way through 180°. `t` outside
/// `[0, 1]` extrapolates and is clamped back into range.
pub fn lerp_hsl(a: ColorHsl, b: ColorHsl, t: f32) -> ColorHsl {
    ColorHsl::from_components(
        lerp(a.hue as f32, b.hue as f32, t),
        lerp(a.saturation as f32, b.saturation as f32, t),
        lerp(a.brightness as f32, b.brightness as f32, t),
    )
}

/// Primary ramp from `base` towards `secondary`.
///
/// Slots 0..=6 cover `t = 0..=1`, slot 7 extrapolates one step past the
/// secondary anchor. Slots 0 and 1 are then swapped so the color next to the
/// base comes first.
pub fn primary_ramp(base: ColorHsl, secondary: ColorHsl) -> [ColorHsl; 8] {
    let mut primary: [ColorHsl; 8] =
        std::array::from_fn(|i| lerp_hsl(base, secondary, i as f32 / PRIMARY_STEPS));
    primary.swap(0, 1);
    primary
}

/// Eight accents spread around the wheel, starting at the base hue.
///
/// Accent `k` has a role hue `base.hue + 45·k`. The image cluster closest to
/// that role supplies the saturation, and the accent hue lands halfway
/// between role and cluster along the short arc. Falls back to the role
/// itself when there are no candidates.
pub fn accent_colors(base: ColorHsl, secondary: ColorHsl, keys: &[BrightnessKey]) -> [ColorHsl; 8] {
    let (low, high) = ACCENT_BRIGHTNESS_RANGE;
    let brightness = ((base.brightness as f32 + secondary.brightness as f32) / 2.0).clamp(low, high);
    let targets = ScoringTargets::closest_match();

    std::array::from_fn(|k| {
        let role_hue = wrap_hue(base.hue as f32 + ACCENT_HUE_STEP * k as f32);
        let role = ColorHsl::from_components(role_hue, base.saturation as f32, brightness);
        let best = rank_candidates(keys, role, &targets)
            .first()
            .map(|candidate| candidate.color)
            .unwrap_or(role);
        ColorHsl::from_components(
            lerp_hue_short(role_hue, best.hue as f32, 0.5),
            best.saturation as f32,
            brightness,
        )
    })
}

pub fn synthesize(base: ColorHsl, secondary: ColorHsl, keys: &[BrightnessKey]) -> HslPalette {
    HslPalette {
        primary: primary_ramp(base, secondary),
        accents: accent_colors(base, secondary, keys),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hue::HueKey;
    use pretty_assertions::assert_eq;

    fn single_band(color: ColorHsl) -> Vec<BrightnessKey> {
        vec![BrightnessKey {
            population: 4,
            brightness: color.brightness as f32,
            saturation: color.saturation as f32,
            hue_keys: vec![HueKey {
                population: 4,
                hue: color.hue as f32,
                saturation: color.saturation as f32,
            }],
        }]
    }

    #[test]
    fn test_primary_ramp_swaps_first_two() {
        let base = ColorHsl::new(240, 99, 11);
        let secondary = ColorHsl::new(0, 99, 29);
        let ramp = primary_ramp(base, secondary);

        assert_eq!(ramp[1], base);
        assert_eq!(ramp[0], ColorHsl::new(200, 99, 14));
        assert_eq!(ramp[6], secondary);
    }

    #[test]
    fn test_primary_ramp_takes_the_naive_hue_path() {
        let ramp = primary_ramp(ColorHsl::new(350, 50, 20), ColorHsl::new(10, 50, 80));
        // Half way between 350 and 10 as plain numbers is 180
        assert_eq!(ramp[3].hue, 180);
    }

    #[test]
    fn test_extrapolated_slot_stays_in_range() {
        let ramp = primary_ramp(ColorHsl::new(300, 10, 20), ColorHsl::new(355, 95, 95));
        let last = ramp[7];
        assert!(last.hue < 360);
        assert_eq!(last.saturation, 99);
        assert_eq!(last.brightness, 99);
    }

    #[test]
    fn test_uniform_color_palette() {
        let color = ColorHsl::new(120, 60, 50);
        let palette = synthesize(color, color, &single_band(color));

        assert!(palette.primary.iter().all(|&c| c == color));
        for (k, accent) in palette.accents.iter().enumerate() {
            assert_eq!(accent.saturation, color.saturation);
            assert_eq!(accent.brightness, color.brightness);
            if k == 0 {
                assert_eq!(accent.hue, color.hue);
            }
        }
    }

    #[test]
    fn test_accent_roles_spread_around_the_wheel() {
        let base = ColorHsl::new(0, 80, 20);
        let secondary = ColorHsl::new(60, 80, 80);
        let accents = accent_colors(base, secondary, &[]);

        let hues: Vec<u16> = accents.iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0, 45, 90, 135, 180, 225, 270, 315]);
        assert!(accents.iter().all(|c| c.brightness == 50));
    }

    #[test]
    fn test_accent_brightness_is_clamped() {
        let dark = ColorHsl::new(0, 80, 10);
        let accents = accent_colors(dark, dark, &[]);
        assert!(accents.iter().all(|c| c.brightness == 35));
    }

    #[test]
    fn test_base16_palette_slot_order() {
        let mut hsl = HslPalette::default();
        hsl.primary[0] = ColorHsl::new(0, 0, 99);
        hsl.accents[7] = ColorHsl::new(0, 99, 50);
        let palette = Base16Palette::from_hsl(&hsl);
        let colors: Vec<_> = palette.colors().collect();

        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], Srgb::new(252, 252, 252));
        assert_eq!(colors[1], Srgb::new(0, 0, 0));
        assert_eq!(colors[15], palette.accents[7]);
    }
}
