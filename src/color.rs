use palette::Srgb;

pub const HUE_VALUE_COUNT: usize = 360;
pub const SATURATION_VALUE_COUNT: usize = 100;
pub const BRIGHTNESS_VALUE_COUNT: usize = 100;

/// Quantized hue/saturation/brightness color.
///
/// Every component is a histogram bucket index: hue in `0..360` (circular),
/// saturation and brightness in `0..100`. Brightness is luma, not true HSL
/// lightness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorHsl {
    pub hue: u16,
    pub saturation: u8,
    pub brightness: u8,
}

impl ColorHsl {
    pub const fn new(hue: u16, saturation: u8, brightness: u8) -> Self {
        Self { hue, saturation, brightness }
    }

    /// Quantize continuous bucket-space components. Hue is wrapped into
    /// `[0, 360)`, the others are floored and clamped to their range.
    pub fn from_components(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue: bucket_of(wrap_hue(hue), HUE_VALUE_COUNT) as u16,
            saturation: bucket_of(saturation, SATURATION_VALUE_COUNT) as u8,
            brightness: bucket_of(brightness, BRIGHTNESS_VALUE_COUNT) as u8,
        }
    }
}

/// Map a value expressed in bucket units to its bucket index.
///
/// Rounds down and clamps into `0..bucket_count`. NaN lands in bucket 0.
#[inline]
pub fn bucket_of(value: f32, bucket_count: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    (value.floor() as usize).min(bucket_count.saturating_sub(1))
}

/// Renormalize a hue in degrees into `[0, 360)`.
#[inline]
pub fn wrap_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest angular distance between two hues, in `[0, 180]`.
#[inline]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let raw = (a - b).abs() % 360.0;
    raw.min(360.0 - raw)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two hues along the shorter arc of the wheel.
pub fn lerp_hue_short(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    wrap_hue(a + delta * t)
}

// ------------------------------------------------------------
// RGB -> HSL
// ------------------------------------------------------------

#[inline(always)]
fn min_channel(r: f32, g: f32, b: f32) -> f32 {
    r.min(g).min(b)
}

#[inline(always)]
fn max_channel(r: f32, g: f32, b: f32) -> f32 {
    r.max(g).max(b)
}

/// Perceptually weighted luma of normalized channels, in `[0, 1]`.
pub fn color_brightness(r: f32, g: f32, b: f32) -> f32 {
    (r * 0.299 + g * 0.587 + b * 0.114).clamp(0.0, 1.0)
}

/// Saturation of normalized channels, in `[0, 1]`. Black has saturation 0.
pub fn color_saturation(r: f32, g: f32, b: f32) -> f32 {
    let min = min_channel(r, g, b);
    let max = max_channel(r, g, b);

    if max == 0.0 {
        return 0.0;
    }

    let delta = max - min;
    if delta <= 0.5 {
        delta / (max + min)
    } else {
        (delta / (2.0 - max - min)).clamp(0.0, 1.0)
    }
}

/// Hue of normalized channels in degrees. Achromatic colors report 0.
pub fn color_hue(r: f32, g: f32, b: f32) -> f32 {
    let min = min_channel(r, g, b);
    let max = max_channel(r, g, b);

    if max == 0.0 || max == min {
        return 0.0;
    }

    let delta = max - min;
    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    let mut hue = sector * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }
    hue.clamp(0.0, 360.0)
}

/// Convert an 8-bit RGB color to its quantized hue/saturation/brightness buckets.
pub fn rgb_to_hsl(color: Srgb<u8>) -> ColorHsl {
    let r = color.red as f32 / 255.0;
    let g = color.green as f32 / 255.0;
    let b = color.blue as f32 / 255.0;

    ColorHsl {
        hue: bucket_of(color_hue(r, g, b), HUE_VALUE_COUNT) as u16,
        saturation: bucket_of(
            color_saturation(r, g, b) * SATURATION_VALUE_COUNT as f32,
            SATURATION_VALUE_COUNT,
        ) as u8,
        brightness: bucket_of(
            color_brightness(r, g, b) * BRIGHTNESS_VALUE_COUNT as f32,
            BRIGHTNESS_VALUE_COUNT,
        ) as u8,
    }
}

// ------------------------------------------------------------
// HSL -> RGB
// ------------------------------------------------------------

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[inline(always)]
fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert quantized HSL back to 8-bit RGB, treating brightness as lightness.
pub fn hsl_to_rgb(color: ColorHsl) -> Srgb<u8> {
    let h = color.hue as f32 / HUE_VALUE_COUNT as f32;
    let s = color.saturation as f32 / SATURATION_VALUE_COUNT as f32;
    let l = color.brightness as f32 / BRIGHTNESS_VALUE_COUNT as f32;

    if s == 0.0 {
        let v = to_channel(l);
        return Srgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Srgb::new(
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}
