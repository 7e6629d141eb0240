use tracing::trace;

use crate::color::BRIGHTNESS_VALUE_COUNT;
use crate::histogram::Histogram;
use crate::hue::HueKey;

/// A bucket must hold more than `total / BRIGHTNESS_SIGNIFICANCE_DIVISOR`
/// pixels to become a key.
pub const BRIGHTNESS_SIGNIFICANCE_DIVISOR: u32 = 1000;

/// Keys closer than this many brightness units are merged.
pub const BRIGHTNESS_MERGE_GAP: f32 = 8.0;

/// A dominant lightness band.
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessKey {
    pub population: u32,
    /// Population-weighted average brightness bucket.
    pub brightness: f32,
    /// Population-weighted average saturation bucket of the band.
    pub saturation: f32,
    /// Hue/saturation sub-clusters, most populated first. Empty until
    /// [`crate::hue::assign_hue_keys`] runs.
    pub hue_keys: Vec<HueKey>,
}

impl BrightnessKey {
    fn from_bucket(histogram: &Histogram, bucket: usize) -> Self {
        Self {
            population: histogram.by_brightness[bucket],
            brightness: bucket as f32,
            saturation: histogram.average_saturation(bucket),
            hue_keys: Vec::new(),
        }
    }

    /// Combine two bands. Populations add up; brightness and saturation are
    /// population-weighted averages.
    pub fn merge(&self, other: &Self) -> Self {
        let population = self.population + other.population;
        let (wa, wb) = if population == 0 {
            (1.0, 1.0)
        } else {
            (self.population as f32, other.population as f32)
        };
        Self {
            population,
            brightness: (self.brightness * wa + other.brightness * wb) / (wa + wb),
            saturation: (self.saturation * wa + other.saturation * wb) / (wa + wb),
            hue_keys: Vec::new(),
        }
    }
}

/// Brightness buckets whose population exceeds the significance threshold,
/// in ascending brightness order.
pub fn significant_buckets(histogram: &Histogram) -> Vec<BrightnessKey> {
    let threshold = histogram.total_population / BRIGHTNESS_SIGNIFICANCE_DIVISOR;
    (0..BRIGHTNESS_VALUE_COUNT)
        .filter(|&bucket| histogram.by_brightness[bucket] > threshold)
        .map(|bucket| BrightnessKey::from_bucket(histogram, bucket))
        .collect()
}

/// Fold neighbouring keys together until no two consecutive keys are closer
/// than `gap`. Input must be sorted by ascending brightness.
///
/// A merged key is immediately compared against the next one, so merging is
/// transitive: `[10, 14, 19]` with gap 8 collapses into a single key.
pub fn merge_close_keys(keys: Vec<BrightnessKey>, gap: f32) -> Vec<BrightnessKey> {
    let mut merged: Vec<BrightnessKey> = Vec::with_capacity(keys.len());
    for key in keys {
        match merged.last_mut() {
            Some(last) if key.brightness - last.brightness < gap => {
                trace!(
                    from = last.brightness,
                    to = key.brightness,
                    "Merging brightness keys"
                );
                *last = last.merge(&key);
            }
            _ => merged.push(key),
        }
    }
    merged
}

/// Discover the dominant lightness bands of an image, most populated first.
/// Bands with equal population keep ascending brightness order.
pub fn extract_brightness_keys(histogram: &Histogram) -> Vec<BrightnessKey> {
    let mut keys = merge_close_keys(significant_buckets(histogram), BRIGHTNESS_MERGE_GAP);
    keys.sort_by(|a, b| b.population.cmp(&a.population));
    keys
}
