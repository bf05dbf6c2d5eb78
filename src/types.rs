//! Type definitions for certificate generation

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RenderError, RenderResult};

/// One input row, mapped to one output document. Field names come from the
/// input table's header; all records of a batch share the same field set.
pub type Record = HashMap<String, String>;

/// RGB color, each channel 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string (the form the original UI's color picker emits)
    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RenderError::InvalidStyleConfig(format!(
                "color '{hex}' is not of the form #rrggbb"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| {
                RenderError::InvalidStyleConfig(format!("color '{hex}' is not valid hex"))
            })
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Rgb([u8; 3]),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Hex(hex) => Color::from_hex(&hex).map_err(serde::de::Error::custom),
            Repr::Rgb([r, g, b]) => Ok(Color { r, g, b }),
        }
    }
}

/// Per-field rendering configuration.
///
/// Family and style stay as plain strings here; they are resolved against the
/// built-in font set at draw time so that an unresolvable request fails the
/// affected document rather than being silently substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStyle {
    /// Point size in canvas units (1 unit = 1 background pixel)
    pub size: u32,
    /// Font family: Arial, Courier or Helvetica
    pub family: String,
    /// Style flags: "", "B", "I" or "BI"
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub color: Color,
}

/// Mapping from field name to [`FieldStyle`], loaded from JSON.
///
/// Fields of a record without an entry here are skipped entirely: not drawn,
/// and the layout cursor does not advance for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet(pub BTreeMap<String, FieldStyle>);

impl StyleSheet {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> RenderResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn get(&self, field: &str) -> Option<&FieldStyle> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Structural pre-flight check against the input schema. Styles that
    /// reference unknown fields or carry a zero point size abort the batch
    /// before any document is rendered.
    pub fn validate(&self, schema: &[String]) -> RenderResult<()> {
        for (field, style) in &self.0 {
            if !schema.iter().any(|column| column == field) {
                return Err(RenderError::InvalidStyleConfig(format!(
                    "styled field '{field}' does not exist in the input schema"
                )));
            }
            if style.size == 0 {
                return Err(RenderError::InvalidStyleConfig(format!(
                    "field '{field}' has a zero point size"
                )));
            }
        }
        Ok(())
    }
}

/// Side of the square signature box before scaling, in canvas units
pub const SIGNATURE_BOX: f64 = 130.0;

/// Caller-supplied layout scalars, collected by the UI in the original
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Vertical offset where the first text block starts, in pixels from the top
    pub y_start: f64,
    /// Line height as a multiple of the font point size (typical 1.3)
    pub line_height_multiplier: f64,
    /// Percentage (1-100) applied to the signature box dimensions
    pub signature_scale: u32,
    /// Point size for signature captions
    pub caption_size: u32,
}

impl LayoutOptions {
    /// Scaled side of the signature image box
    pub fn signature_box(&self) -> f64 {
        SIGNATURE_BOX * f64::from(self.signature_scale) / 100.0
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            y_start: 260.0,
            line_height_multiplier: 1.3,
            signature_scale: 100,
            caption_size: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::BLACK);
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::new(255, 128, 0));
        assert_eq!(Color::from_hex("102030").unwrap(), Color::new(16, 32, 48));
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
    }

    #[test]
    fn style_sheet_accepts_hex_and_rgb_colors() {
        let sheet = StyleSheet::from_json(
            r##"{
                "nombre": { "size": 35, "family": "Arial", "style": "B", "color": "#203040" },
                "fecha": { "size": 20, "family": "Courier", "color": [255, 0, 0] }
            }"##,
        )
        .unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.get("nombre").unwrap().color, Color::new(0x20, 0x30, 0x40));
        assert_eq!(sheet.get("fecha").unwrap().color, Color::new(255, 0, 0));
        // style defaults to regular when omitted
        assert_eq!(sheet.get("fecha").unwrap().style, "");
    }

    #[test]
    fn validate_rejects_unknown_fields() {
        let sheet = StyleSheet::from_json(
            r#"{ "firma": { "size": 12, "family": "Arial" } }"#,
        )
        .unwrap();
        let schema = vec!["nombre".to_string(), "fecha".to_string()];
        assert!(matches!(
            sheet.validate(&schema),
            Err(RenderError::InvalidStyleConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_point_size() {
        let sheet = StyleSheet::from_json(
            r#"{ "nombre": { "size": 0, "family": "Arial" } }"#,
        )
        .unwrap();
        let schema = vec!["nombre".to_string()];
        assert!(matches!(
            sheet.validate(&schema),
            Err(RenderError::InvalidStyleConfig(_))
        ));
    }

    #[test]
    fn signature_box_scales() {
        let mut opts = LayoutOptions::default();
        assert_eq!(opts.signature_box(), 130.0);
        opts.signature_scale = 50;
        assert_eq!(opts.signature_box(), 65.0);
    }
}
