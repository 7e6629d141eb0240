use crate::brightness::BrightnessKey;
use crate::color::ColorHsl;

/// Darkest and brightest brightness allowed for the base anchor.
pub const BASE_BRIGHTNESS_RANGE: (u8, u8) = (10, 90);

/// Relative weight of each scoring term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TermWeights {
    pub brightness: f32,
    pub hue: f32,
    pub saturation: f32,
    pub popularity: f32,
}

impl Default for TermWeights {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            hue: 0.5,
            saturation: 0.25,
            popularity: 0.5,
        }
    }
}

/// The relationship a candidate should have with the anchor it is scored
/// against. Each gap is the ideal absolute difference for that component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringTargets {
    pub brightness_gap: f32,
    pub hue_gap: f32,
    pub saturation_gap: f32,
    pub weights: TermWeights,
}

impl Default for ScoringTargets {
    /// Near-opposite lightness, moderate hue separation, similar saturation.
    fn default() -> Self {
        Self {
            brightness_gap: 80.0,
            hue_gap: 50.0,
            saturation_gap: 0.0,
            weights: TermWeights::default(),
        }
    }
}

impl ScoringTargets {
    /// Targets that reward the candidate closest to the anchor itself.
    pub fn closest_match() -> Self {
        Self {
            brightness_gap: 0.0,
            hue_gap: 0.0,
            saturation_gap: 0.0,
            weights: TermWeights::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCandidate {
    /// Lower is better.
    pub score: f32,
    pub color: ColorHsl,
}

/// How far the absolute difference between `a` and `b` is from `target`.
#[inline]
pub fn difference_matching_score(a: f32, b: f32, target: f32) -> f32 {
    ((a - b).abs() - target).abs()
}

/// Score one candidate against an anchor.
///
/// `share` is the candidate's fraction of its brightness band; dominant
/// sub-clusters pay a smaller popularity penalty. Hue is compared as a plain
/// number, not around the wheel. The popularity term and the total are
/// truncated to whole points, so near-ties collapse into exact ties.
pub fn score_candidate(
    candidate: ColorHsl,
    share: f32,
    anchor: ColorHsl,
    targets: &ScoringTargets,
) -> f32 {
    let brightness = difference_matching_score(
        candidate.brightness as f32,
        anchor.brightness as f32,
        targets.brightness_gap,
    );
    let hue = difference_matching_score(candidate.hue as f32, anchor.hue as f32, targets.hue_gap);
    let saturation = difference_matching_score(
        candidate.saturation as f32,
        anchor.saturation as f32,
        targets.saturation_gap,
    );
    let popularity = (100.0 - share * 100.0).trunc();

    let w = &targets.weights;
    (brightness * w.brightness + hue * w.hue + saturation * w.saturation + popularity * w.popularity)
        .trunc()
}

/// The base anchor: the most populated hue of the most populated brightness
/// band, with brightness kept away from black and white. `keys` must be
/// sorted by descending population.
pub fn base_color(keys: &[BrightnessKey]) -> Option<ColorHsl> {
    let key = keys.first()?;
    let hue_key = key.hue_keys.first()?;
    let (low, high) = BASE_BRIGHTNESS_RANGE;
    let color = ColorHsl::from_components(hue_key.hue, hue_key.saturation, key.brightness);
    Some(ColorHsl {
        brightness: color.brightness.clamp(low, high),
        ..color
    })
}

/// Score every (brightness band × hue sub-cluster) pair against `anchor`,
/// best first. Equal scores keep band-then-sub-cluster order.
pub fn rank_candidates(
    keys: &[BrightnessKey],
    anchor: ColorHsl,
    targets: &ScoringTargets,
) -> Vec<ScoredCandidate> {
    score_pairs(keys, anchor, targets, None)
}

/// Candidates for the secondary anchor: every pair except the base's own,
/// which is the first sub-cluster of the first band. Empty when the image
/// has a single cluster.
pub fn rank_secondary_candidates(
    keys: &[BrightnessKey],
    base: ColorHsl,
    targets: &ScoringTargets,
) -> Vec<ScoredCandidate> {
    score_pairs(keys, base, targets, Some((0, 0)))
}

fn score_pairs(
    keys: &[BrightnessKey],
    anchor: ColorHsl,
    targets: &ScoringTargets,
    skip: Option<(usize, usize)>,
) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = keys
        .iter()
        .enumerate()
        .flat_map(|(band, key)| {
            key.hue_keys
                .iter()
                .enumerate()
                .filter(move |&(sub, _)| skip != Some((band, sub)))
                .map(move |(_, hue_key)| {
                    let color =
                        ColorHsl::from_components(hue_key.hue, hue_key.saturation, key.brightness);
                    let share = if key.population == 0 {
                        0.0
                    } else {
                        hue_key.population as f32 / key.population as f32
                    };
                    ScoredCandidate {
                        score: score_candidate(color, share, anchor, targets),
                        color,
                    }
                })
        })
        .collect();
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brightness::extract_brightness_keys;
    use crate::histogram::{Histogram, PixelBuffer};
    use crate::hue::{HueKey, assign_hue_keys};

    fn two_bands(red: usize, blue: usize) -> Vec<u8> {
        let mut data = [255u8, 0, 0].repeat(red);
        data.extend([0u8, 0, 255].repeat(blue));
        data
    }

    fn analyze(data: &[u8], width: u32, height: u32) -> Vec<BrightnessKey> {
        let pixels = PixelBuffer::new(data, width, height, 3).unwrap();
        let mut keys = extract_brightness_keys(&Histogram::build(&pixels));
        assign_hue_keys(&pixels, &mut keys);
        keys
    }

    #[test]
    fn test_difference_matching_score() {
        assert_eq!(difference_matching_score(10.0, 90.0, 80.0), 0.0);
        assert_eq!(difference_matching_score(90.0, 10.0, 80.0), 0.0);
        assert_eq!(difference_matching_score(50.0, 50.0, 80.0), 80.0);
        assert_eq!(difference_matching_score(30.0, 20.0, 0.0), 10.0);
    }

    #[test]
    fn test_score_uses_fixed_weights() {
        let anchor = ColorHsl::new(0, 50, 10);
        let candidate = ColorHsl::new(100, 60, 50);
        // brightness |40 - 80| = 40, hue |100 - 50| = 50, saturation 10,
        // popularity 100 * (1 - 0.5) = 50
        // 40 + 25 + 2.5 + 25 = 92.5, truncated
        let score = score_candidate(candidate, 0.5, anchor, &ScoringTargets::default());
        assert_eq!(score, 92.0);
    }

    #[test]
    fn test_popularity_term_is_truncated() {
        let anchor = ColorHsl::new(0, 50, 50);
        let targets = ScoringTargets {
            weights: TermWeights {
                brightness: 0.0,
                hue: 0.0,
                saturation: 0.0,
                popularity: 1.0,
            },
            ..ScoringTargets::closest_match()
        };
        // 100 - 66.67 = 33.33
        assert_eq!(score_candidate(anchor, 2.0 / 3.0, anchor, &targets), 33.0);
    }

    #[test]
    fn test_hue_term_is_plain_difference() {
        let targets = ScoringTargets {
            weights: TermWeights {
                brightness: 0.0,
                hue: 1.0,
                saturation: 0.0,
                popularity: 0.0,
            },
            ..ScoringTargets::default()
        };
        // |300 - 10| = 290, 240 away from the 50 degree target
        let anchor = ColorHsl::new(10, 50, 50);
        let score = score_candidate(ColorHsl::new(300, 50, 50), 1.0, anchor, &targets);
        assert_eq!(score, 240.0);

        // 340 -> 30 is short around the wheel but 310 as plain numbers
        let anchor = ColorHsl::new(340, 50, 50);
        let score = score_candidate(ColorHsl::new(30, 50, 50), 1.0, anchor, &targets);
        assert_eq!(score, 260.0);
    }

    #[test]
    fn test_base_color_brightness_is_clamped() {
        let key = BrightnessKey {
            population: 10,
            brightness: 99.0,
            saturation: 0.0,
            hue_keys: vec![HueKey {
                population: 10,
                hue: 42.7,
                saturation: 12.2,
            }],
        };
        assert_eq!(base_color(&[key]), Some(ColorHsl::new(42, 12, 90)));
    }

    #[test]
    fn test_base_color_requires_clusters() {
        assert_eq!(base_color(&[]), None);
        let key = BrightnessKey {
            population: 0,
            brightness: 50.0,
            saturation: 0.0,
            hue_keys: Vec::new(),
        };
        assert_eq!(base_color(&[key]), None);
    }

    #[test]
    fn test_red_blue_bands_split_evenly() {
        let keys = analyze(&two_bands(50, 50), 10, 10);
        assert_eq!(keys.len(), 2);
        for key in &keys {
            assert_eq!(key.population, 50);
            assert_eq!(key.hue_keys.len(), 1);
        }
    }

    #[test]
    fn test_other_band_is_top_secondary() {
        let keys = analyze(&two_bands(50, 50), 10, 10);
        let base = base_color(&keys).unwrap();
        let ranked = rank_secondary_candidates(&keys, base, &ScoringTargets::default());

        assert_eq!(ranked.len(), 1);
        assert_ne!(ranked[0].color.hue, base.hue);
    }

    #[test]
    fn test_other_band_wins_whichever_is_dominant() {
        let keys = analyze(&two_bands(70, 30), 10, 10);
        let base = base_color(&keys).unwrap();
        assert_eq!(base.hue, 0);

        let ranked = rank_secondary_candidates(&keys, base, &ScoringTargets::default());
        assert_eq!(ranked[0].color.hue, 240);
    }

    #[test]
    fn test_base_pair_is_not_a_secondary_candidate() {
        // 60% red, 40% cyan: scored against itself red would beat cyan
        let mut data = [255u8, 0, 0].repeat(60);
        data.extend([0u8, 150, 150].repeat(40));
        let keys = analyze(&data, 10, 10);
        let base = base_color(&keys).unwrap();
        assert_eq!(base, ColorHsl::new(0, 99, 29));

        let everything = rank_candidates(&keys, base, &ScoringTargets::default());
        assert_eq!(everything.len(), 2);
        assert_eq!(everything[0].color, base);

        let ranked = rank_secondary_candidates(&keys, base, &ScoringTargets::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].color.hue, 180);
    }

    #[test]
    fn test_uniform_image_has_no_secondary_candidates() {
        let data = [90u8, 160, 60].repeat(9);
        let keys = analyze(&data, 3, 3);
        let base = base_color(&keys).unwrap();

        assert!(rank_secondary_candidates(&keys, base, &ScoringTargets::default()).is_empty());
        let ranked = rank_candidates(&keys, base, &ScoringTargets::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].color.hue, base.hue);
    }
}
