use palette::Srgb;

use crate::color::{
    BRIGHTNESS_VALUE_COUNT, ColorHsl, HUE_VALUE_COUNT, SATURATION_VALUE_COUNT, rgb_to_hsl,
};
use crate::error::{ExtractError, Result};

/// Read-only view over a decoded, row-major pixel buffer.
///
/// Only the first three channels of every pixel are read, so RGBA buffers
/// can be passed through without repacking.
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    channels: usize,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: usize) -> Result<Self> {
        if channels < 3 {
            return Err(ExtractError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() < expected {
            return Err(ExtractError::BufferTooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixels(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        self.data
            .chunks_exact(self.channels)
            .take(self.pixel_count())
            .map(|px| Srgb::new(px[0], px[1], px[2]))
    }

    pub fn hsl_pixels(&self) -> impl Iterator<Item = ColorHsl> + '_ {
        self.pixels().map(rgb_to_hsl)
    }
}

/// Population counts over the quantized HSL space.
#[derive(Clone, Debug)]
pub struct Histogram {
    pub by_brightness: [u32; BRIGHTNESS_VALUE_COUNT],
    pub by_hue: [u32; HUE_VALUE_COUNT],
    /// Indexed `[brightness][saturation]`.
    pub by_brightness_saturation: Vec<[u32; SATURATION_VALUE_COUNT]>,
    pub total_population: u32,
}

impl Histogram {
    /// Single pass over every pixel.
    pub fn build(pixels: &PixelBuffer<'_>) -> Self {
        let mut histogram = Self {
            by_brightness: [0; BRIGHTNESS_VALUE_COUNT],
            by_hue: [0; HUE_VALUE_COUNT],
            by_brightness_saturation: vec![[0; SATURATION_VALUE_COUNT]; BRIGHTNESS_VALUE_COUNT],
            total_population: pixels.pixel_count() as u32,
        };

        for hsl in pixels.hsl_pixels() {
            let brightness = hsl.brightness as usize;
            histogram.by_brightness[brightness] += 1;
            histogram.by_hue[hsl.hue as usize] += 1;
            histogram.by_brightness_saturation[brightness][hsl.saturation as usize] += 1;
        }

        histogram
    }

    /// Mean saturation bucket of the pixels in one brightness bucket, or 0
    /// when the bucket is empty.
    pub fn average_saturation(&self, brightness: usize) -> f32 {
        let row = &self.by_brightness_saturation[brightness];
        let population: u32 = row.iter().sum();
        if population == 0 {
            return 0.0;
        }
        let weighted: f64 = row
            .iter()
            .enumerate()
            .map(|(saturation, &count)| saturation as f64 * count as f64)
            .sum();
        (weighted / population as f64) as f32
    }
}
