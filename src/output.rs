use std::path::Path;

use palette::Srgb;
use serde_json::{Map, Value};

use crate::error::{ExtractError, Result};
use crate::synth::Base16Palette;

pub const SLOT_NAMES: [&str; 16] = [
    "base00", "base01", "base02", "base03", "base04", "base05", "base06", "base07", "base08",
    "base09", "base0A", "base0B", "base0C", "base0D", "base0E", "base0F",
];

/// Text color for the first slots, which are dark backgrounds.
const LIGHT_TEXT: &str = "#cdd6f4";
const DARK_TEXT: &str = "#1e1e2e";
const LIGHT_TEXT_SLOTS: usize = 3;

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parse `#rrggbb` or `rrggbb`.
pub fn parse_hex(value: &str) -> Result<Srgb<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ExtractError::InvalidColor(value.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| ExtractError::InvalidColor(value.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

// ------------------------------------------------------------
// JSON
// ------------------------------------------------------------

impl Base16Palette {
    /// `{"base00": "#rrggbb", ..., "base0F": "#rrggbb"}`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = SLOT_NAMES
            .iter()
            .zip(self.colors())
            .map(|(name, color)| (name.to_string(), Value::String(to_hex(color))))
            .collect();
        Value::Object(map)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let mut colors = [Srgb::new(0u8, 0, 0); 16];
        for (slot, name) in colors.iter_mut().zip(SLOT_NAMES) {
            let hex = value
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| ExtractError::InvalidColor(format!("missing {name}")))?;
            *slot = parse_hex(hex)?;
        }
        let mut primary = [Srgb::new(0u8, 0, 0); 8];
        let mut accents = [Srgb::new(0u8, 0, 0); 8];
        primary.copy_from_slice(&colors[..8]);
        accents.copy_from_slice(&colors[8..]);
        Ok(Self { primary, accents })
    }
}

pub fn render_json(palette: &Base16Palette) -> Result<String> {
    Ok(serde_json::to_string_pretty(&palette.to_json())?)
}

pub fn write_json(palette: &Base16Palette, path: &Path) -> Result<()> {
    std::fs::write(path, render_json(palette)?)?;
    Ok(())
}

// ------------------------------------------------------------
// HTML
// ------------------------------------------------------------

/// Static swatch sheet: primaries in one row, accents in the next.
pub fn render_html(palette: &Base16Palette) -> String {
    let styles: String = SLOT_NAMES
        .iter()
        .zip(palette.colors())
        .enumerate()
        .map(|(slot, (name, color))| {
            let text = if slot < LIGHT_TEXT_SLOTS { LIGHT_TEXT } else { DARK_TEXT };
            format!(
                "                #{name} {{ background-color: {}; color: {text}; }}\n",
                to_hex(color)
            )
        })
        .collect();

    let swatches = |names: &[&str]| -> String {
        names
            .iter()
            .map(|name| {
                format!(
                    "                <div id=\"{name}\">{}</div>\n",
                    name.trim_start_matches("base")
                )
            })
            .collect()
    };

    format!(
        r#"<html>
    <head>
        <style>
            body {{
                margin: 2rem;
                font-family: sans-serif;
            }}
            body > div {{
                display: flex;
                flex-direction: row;
                flex-wrap: wrap;
                gap: 1em;
            }}
            body > div > div {{
                width: 5rem;
                height: 5rem;
                display: flex;
                justify-content: center;
                align-items: center;
            }}
{styles}        </style>
    </head>
    <body>
        <h2>Primary colors</h2>
        <div>
{primary}        </div>
        <h2>Accents</h2>
        <div>
{accents}        </div>
    </body>
</html>
"#,
        primary = swatches(&SLOT_NAMES[..8]),
        accents = swatches(&SLOT_NAMES[8..]),
    )
}

pub fn write_html(palette: &Base16Palette, path: &Path) -> Result<()> {
    std::fs::write(path, render_html(palette))?;
    Ok(())
}
