//! Built-in font resolution and text measurement
//!
//! The original UI offers a fixed family set (Arial, Courier, Helvetica) with
//! regular/bold/italic/bold-italic styles. These resolve to the PDF base-14
//! Type1 fonts, with Arial mapped onto the Helvetica program. Measurement
//! uses the Adobe AFM advance widths so that wrapping decisions match what
//! the viewer will actually lay out; an unresolvable family/style is an
//! error, never a silent substitution.

use pdf_writer::Name;

use crate::error::{RenderError, RenderResult};

/// Capability interface for text measurement, so the wrap logic does not
/// depend on a particular font backend.
pub trait TextMeasurer {
    /// Width of `text` at `size` in canvas units
    fn measure_text(&self, text: &str, size: f64) -> f64;
}

/// AFM advance widths in 1/1000 em
#[derive(Debug, Clone, Copy)]
enum Metrics {
    /// Widths for the printable ASCII range 0x20..=0x7E
    Proportional(&'static [u16; 95]),
    /// Fixed-pitch advance for every glyph (Courier)
    Fixed(u16),
}

/// One of the base-14 Type1 fonts, with its page resource name and metrics
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFont {
    base_font: &'static str,
    resource: &'static str,
    metrics: Metrics,
    missing_width: u16,
}

impl BuiltinFont {
    /// PostScript name, e.g. `Helvetica-BoldOblique`
    pub fn base_font(&self) -> Name<'static> {
        Name(self.base_font.as_bytes())
    }

    /// Page resource name, e.g. `F2`
    pub fn resource(&self) -> Name<'static> {
        Name(self.resource.as_bytes())
    }

    pub fn resource_key(&self) -> &'static str {
        self.resource
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_width(&self, ch: char) -> u16 {
        let ch = fold_latin1(ch);
        match self.metrics {
            Metrics::Fixed(width) => width,
            Metrics::Proportional(widths) => {
                let code = ch as u32;
                if (0x20..=0x7E).contains(&code) {
                    widths[(code - 0x20) as usize]
                } else {
                    self.missing_width
                }
            }
        }
    }

    /// Width of `text` at `size` in canvas units
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let em: u32 = text.chars().map(|ch| u32::from(self.char_width(ch))).sum();
        f64::from(em) * size / 1000.0
    }
}

impl TextMeasurer for BuiltinFont {
    fn measure_text(&self, text: &str, size: f64) -> f64 {
        self.text_width(text, size)
    }
}

/// Resolve a family/style request from the style configuration.
///
/// Family matching is case-insensitive and style flags may come in either
/// order ("BI" or "IB"), mirroring what the original's PDF library accepted.
pub fn resolve(family: &str, style: &str) -> RenderResult<BuiltinFont> {
    let unsupported = || RenderError::UnsupportedFont {
        family: family.to_string(),
        style: style.to_string(),
    };

    let style_index = match style.to_ascii_uppercase().as_str() {
        "" => 0,
        "B" => 1,
        "I" => 2,
        "BI" | "IB" => 3,
        _ => return Err(unsupported()),
    };

    let faces: &[BuiltinFont; 4] = if family.eq_ignore_ascii_case("arial")
        || family.eq_ignore_ascii_case("helvetica")
    {
        &HELVETICA_FACES
    } else if family.eq_ignore_ascii_case("courier") {
        &COURIER_FACES
    } else {
        return Err(unsupported());
    };

    Ok(faces[style_index])
}

/// Font used for signature captions (the original hard-codes Arial regular)
pub fn caption_font() -> BuiltinFont {
    HELVETICA_FACES[0]
}

/// Fold Latin-1 accented letters onto their base letter. The AFM composite
/// glyphs carry the base letter's advance, so this keeps measurement exact
/// for the accented characters certificates actually contain.
fn fold_latin1(ch: char) -> char {
    match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '¡' => '!',
        '¿' => '?',
        _ => ch,
    }
}

const HELVETICA_FACES: [BuiltinFont; 4] = [
    BuiltinFont {
        base_font: "Helvetica",
        resource: "F1",
        metrics: Metrics::Proportional(&HELVETICA_WIDTHS),
        missing_width: 556,
    },
    BuiltinFont {
        base_font: "Helvetica-Bold",
        resource: "F2",
        metrics: Metrics::Proportional(&HELVETICA_BOLD_WIDTHS),
        missing_width: 556,
    },
    // Oblique faces share the upright advance widths
    BuiltinFont {
        base_font: "Helvetica-Oblique",
        resource: "F3",
        metrics: Metrics::Proportional(&HELVETICA_WIDTHS),
        missing_width: 556,
    },
    BuiltinFont {
        base_font: "Helvetica-BoldOblique",
        resource: "F4",
        metrics: Metrics::Proportional(&HELVETICA_BOLD_WIDTHS),
        missing_width: 556,
    },
];

const COURIER_FACES: [BuiltinFont; 4] = [
    BuiltinFont {
        base_font: "Courier",
        resource: "F5",
        metrics: Metrics::Fixed(600),
        missing_width: 600,
    },
    BuiltinFont {
        base_font: "Courier-Bold",
        resource: "F6",
        metrics: Metrics::Fixed(600),
        missing_width: 600,
    },
    BuiltinFont {
        base_font: "Courier-Oblique",
        resource: "F7",
        metrics: Metrics::Fixed(600),
        missing_width: 600,
    },
    BuiltinFont {
        base_font: "Courier-BoldOblique",
        resource: "F8",
        metrics: Metrics::Fixed(600),
        missing_width: 600,
    },
];

/// Helvetica AFM widths for 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM widths for 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
