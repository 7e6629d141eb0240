//! Extract a base16 palette (8 primaries + 8 accents) from a photograph.
//!
//! The pipeline buckets every pixel by hue, saturation and brightness,
//! discovers the dominant brightness bands and the dominant hues inside each
//! band, scores the resulting clusters against a base anchor and finally
//! interpolates a palette between the base and the best-scoring secondary
//! color.

use js_sys::{Array, Object, Reflect};
use palette::Srgb;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

pub mod brightness;
pub mod color;
pub mod error;
pub mod histogram;
pub mod hue;
pub mod output;
pub mod scoring;
pub mod synth;

pub use brightness::BrightnessKey;
pub use color::{ColorHsl, hsl_to_rgb, rgb_to_hsl};
pub use error::{ExtractError, Result};
pub use histogram::{Histogram, PixelBuffer};
pub use hue::HueKey;
pub use output::{render_html, render_json, to_hex, write_html, write_json};
pub use scoring::{ScoredCandidate, ScoringTargets, TermWeights};
pub use synth::{Base16Palette, HslPalette};

/// Intermediate results of one extraction, kept for inspection and logging.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub total_population: u32,
    /// Brightness bands, most populated first, each with its hue sub-clusters.
    pub keys: Vec<BrightnessKey>,
    pub base: ColorHsl,
    /// Best-scoring candidate against `base`, or `base` itself when there is
    /// no other cluster.
    pub secondary: ColorHsl,
    /// Every cluster other than the base, scored against it, best first.
    pub candidates: Vec<ScoredCandidate>,
}

// ------------------------------------------------------------
// Pipeline
// ------------------------------------------------------------

/// Run clustering and scoring over a pixel buffer.
///
/// Fails with [`ExtractError::NoClusters`] when the image has no pixels.
pub fn analyze(pixels: &PixelBuffer<'_>, targets: &ScoringTargets) -> Result<Analysis> {
    // ----------------------
    // 1. Histograms
    // ----------------------
    let histogram = Histogram::build(pixels);

    // ----------------------
    // 2. Brightness bands, then hues per band
    // ----------------------
    let mut keys = brightness::extract_brightness_keys(&histogram);
    if keys.is_empty() {
        return Err(ExtractError::NoClusters);
    }
    hue::assign_hue_keys(pixels, &mut keys);
    log_clusters(&keys, histogram.total_population);

    // ----------------------
    // 3. Anchors
    // ----------------------
    let base = scoring::base_color(&keys).ok_or(ExtractError::NoClusters)?;
    let candidates = scoring::rank_secondary_candidates(&keys, base, targets);
    // A single-cluster image has nothing to pair with, so the ramp is flat
    let secondary = candidates
        .first()
        .map(|candidate| candidate.color)
        .unwrap_or(base);

    info!(
        brightness_keys = keys.len(),
        base = ?base,
        secondary = ?secondary,
        "Clustering finished"
    );

    Ok(Analysis {
        total_population: histogram.total_population,
        keys,
        base,
        secondary,
        candidates,
    })
}

/// Extract the palette from an in-memory pixel buffer.
pub fn extract_palette(pixels: &PixelBuffer<'_>) -> Result<Base16Palette> {
    let analysis = analyze(pixels, &ScoringTargets::default())?;
    let hsl = synth::synthesize(analysis.base, analysis.secondary, &analysis.keys);
    Ok(Base16Palette::from_hsl(&hsl))
}

/// Decode an encoded image (PNG, JPEG, ...) and extract its palette.
pub fn extract_palette_bytes(input: &[u8]) -> Result<Base16Palette> {
    let rgb = image::load_from_memory(input)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    info!(width, height, "Decoded image");
    let pixels = PixelBuffer::new(rgb.as_raw(), width, height, 3)?;
    extract_palette(&pixels)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_from_path(path: &std::path::Path) -> Result<Base16Palette> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    info!(path = %path.display(), width, height, "Decoded image");
    let pixels = PixelBuffer::new(rgb.as_raw(), width, height, 3)?;
    extract_palette(&pixels)
}

fn log_clusters(keys: &[BrightnessKey], total_population: u32) {
    let percent = |part: u32, whole: u32| {
        if whole == 0 {
            0
        } else {
            (part as f32 / whole as f32 * 100.0) as u32
        }
    };
    for key in keys {
        debug!(
            population = percent(key.population, total_population),
            brightness = key.brightness as u32,
            saturation = key.saturation as u32,
            "KeyL"
        );
        for hue_key in &key.hue_keys {
            debug!(
                population = percent(hue_key.population, key.population),
                hue = hue_key.hue as u32,
                saturation = hue_key.saturation as u32,
                "  KeyHS"
            );
        }
    }
}

// ------------------------------------------------------------
// WebAssembly entry point
// ------------------------------------------------------------

/// Extract a base16 palette from an encoded image.
///
/// Returns `{ primary: string[8], accents: string[8] }` with `#rrggbb`
/// colors.
#[wasm_bindgen]
pub fn extract_base16(input: Vec<u8>) -> std::result::Result<Object, JsValue> {
    let base16 =
        extract_palette_bytes(&input).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let to_js = |colors: &[Srgb<u8>]| {
        let array = Array::new();
        for &color in colors {
            array.push(&JsValue::from_str(&to_hex(color)));
        }
        array
    };

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("primary"), &to_js(&base16.primary))?;
    Reflect::set(&result, &JsValue::from_str("accents"), &to_js(&base16.accents))?;

    Ok(result)
}
