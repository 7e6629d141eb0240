use tracing::trace;

use crate::brightness::BrightnessKey;
use crate::color::{HUE_VALUE_COUNT, SATURATION_VALUE_COUNT, hue_distance, wrap_hue};
use crate::histogram::PixelBuffer;

/// A hue bucket must hold more than `parent population / HUE_SIGNIFICANCE_DIVISOR`
/// pixels to become a sub-cluster.
pub const HUE_SIGNIFICANCE_DIVISOR: u32 = 500;

/// Sub-clusters whose circular hue distance is below this many degrees merge.
pub const HUE_MERGE_THRESHOLD: f32 = 20.0;

/// A dominant hue within one brightness band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HueKey {
    pub population: u32,
    /// Degrees in `[0, 360)`.
    pub hue: f32,
    /// Average saturation bucket.
    pub saturation: f32,
}

impl HueKey {
    /// Combine two sub-clusters with population weighting.
    ///
    /// Hue is averaged across the wrap boundary: when the raw difference
    /// exceeds 180° the smaller hue is lifted by 360° before weighting and the
    /// result is folded back into `[0, 360)`. Two empty clusters average
    /// unweighted.
    pub fn merge(self, other: HueKey) -> HueKey {
        let population = self.population + other.population;
        let (wa, wb) = if population == 0 {
            (1.0, 1.0)
        } else {
            (self.population as f32, other.population as f32)
        };

        let (mut a, mut b) = (self.hue, other.hue);
        if (a - b).abs() > 180.0 {
            if a < b {
                a += 360.0;
            } else {
                b += 360.0;
            }
        }

        HueKey {
            population,
            hue: wrap_hue((a * wa + b * wb) / (wa + wb)),
            saturation: (self.saturation * wa + other.saturation * wb) / (wa + wb),
        }
    }
}

// ------------------------------------------------------------
// Per-band hue histograms
// ------------------------------------------------------------

/// Hue counts and the joint hue×saturation counts of one brightness band.
#[derive(Clone, Debug)]
pub struct HueHistogram {
    pub by_hue: [u32; HUE_VALUE_COUNT],
    /// Indexed `[hue][saturation]`.
    pub by_hue_saturation: Vec<[u32; SATURATION_VALUE_COUNT]>,
}

impl Default for HueHistogram {
    fn default() -> Self {
        Self {
            by_hue: [0; HUE_VALUE_COUNT],
            by_hue_saturation: vec![[0; SATURATION_VALUE_COUNT]; HUE_VALUE_COUNT],
        }
    }
}

impl HueHistogram {
    fn add(&mut self, hue: usize, saturation: usize) {
        self.by_hue[hue] += 1;
        self.by_hue_saturation[hue][saturation] += 1;
    }

    /// Hue buckets above the significance threshold, ascending by hue, each
    /// carrying the weighted average saturation of its pixels.
    pub fn significant_keys(&self, parent_population: u32) -> Vec<HueKey> {
        let threshold = parent_population / HUE_SIGNIFICANCE_DIVISOR;
        (0..HUE_VALUE_COUNT)
            .filter(|&hue| self.by_hue[hue] > threshold)
            .map(|hue| {
                let population = self.by_hue[hue];
                let weighted: f64 = self.by_hue_saturation[hue]
                    .iter()
                    .enumerate()
                    .map(|(saturation, &count)| saturation as f64 * count as f64)
                    .sum();
                HueKey {
                    population,
                    hue: hue as f32,
                    saturation: (weighted / population as f64) as f32,
                }
            })
            .collect()
    }
}

/// Index of the key whose brightness is nearest to `brightness`. Equidistant
/// keys resolve to the brighter one.
pub fn nearest_key(brightness: u8, keys: &[BrightnessKey]) -> Option<usize> {
    let brightness = brightness as f32;
    let mut best: Option<(usize, f32)> = None;
    for (index, key) in keys.iter().enumerate() {
        let distance = (brightness - key.brightness).abs();
        best = match best {
            Some((best_index, best_distance))
                if distance > best_distance
                    || (distance == best_distance
                        && key.brightness <= keys[best_index].brightness) =>
            {
                Some((best_index, best_distance))
            }
            _ => Some((index, distance)),
        };
    }
    best.map(|(index, _)| index)
}

/// Attribute every pixel to its nearest brightness key and accumulate one hue
/// histogram per key, in the same order as `keys`.
pub fn attribute_hues(pixels: &PixelBuffer<'_>, keys: &[BrightnessKey]) -> Vec<HueHistogram> {
    let mut histograms = vec![HueHistogram::default(); keys.len()];
    if keys.is_empty() {
        return histograms;
    }
    for hsl in pixels.hsl_pixels() {
        if let Some(index) = nearest_key(hsl.brightness, keys) {
            histograms[index].add(hsl.hue as usize, hsl.saturation as usize);
        }
    }
    histograms
}

// ------------------------------------------------------------
// Circular merging
// ------------------------------------------------------------

/// First pair of hue-adjacent keys (the last key neighbours the first) that
/// lies within `threshold` degrees. `keys` must be sorted by hue.
fn first_close_pair(keys: &[HueKey], threshold: f32) -> Option<(usize, usize)> {
    if keys.len() < 2 {
        return None;
    }
    (0..keys.len())
        .map(|i| (i, (i + 1) % keys.len()))
        .find(|&(i, j)| hue_distance(keys[i].hue, keys[j].hue) < threshold)
}

/// Merge circularly close sub-clusters until none remain within `threshold`,
/// then order them by descending population.
///
/// Each pass re-sorts by hue, merges the first close pair and rebuilds the
/// list, so the total population never changes.
pub fn merge_circular(mut keys: Vec<HueKey>, threshold: f32) -> Vec<HueKey> {
    loop {
        keys.sort_by(|a, b| a.hue.total_cmp(&b.hue));
        let Some((i, j)) = first_close_pair(&keys, threshold) else {
            break;
        };
        let merged = keys[i].merge(keys[j]);
        trace!(
            a = keys[i].hue,
            b = keys[j].hue,
            merged = merged.hue,
            "Merging hue keys"
        );
        keys = keys
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i && k != j)
            .map(|(_, key)| *key)
            .chain(std::iter::once(merged))
            .collect();
    }
    keys.sort_by(|a, b| b.population.cmp(&a.population));
    keys
}

/// Fill in the hue sub-clusters of every brightness key.
pub fn assign_hue_keys(pixels: &PixelBuffer<'_>, keys: &mut [BrightnessKey]) {
    let histograms = attribute_hues(pixels, keys);
    for (key, histogram) in keys.iter_mut().zip(histograms) {
        let candidates = histogram.significant_keys(key.population);
        key.hue_keys = merge_circular(candidates, HUE_MERGE_THRESHOLD);
    }
}
