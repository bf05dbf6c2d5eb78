//! Single-page canvas over pdf-writer
//!
//! The page is sized exactly to the background image's pixel dimensions and
//! laid out in those units directly (1 unit = 1 pixel). The public API uses
//! top-down coordinates like the rest of the pipeline; the flip into PDF's
//! bottom-up space happens here and nowhere else.
//!
//! A canvas is exclusive to one document's composition: text state, embedded
//! images and the content stream all live and die with it. `finish` turns it
//! into an in-memory PDF.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::encoding::unicode_to_winansi;
use crate::error::RenderResult;
use crate::font::{self, BuiltinFont};
use crate::types::Color;

/// Current text state, mirroring the set-then-draw call pattern of the
/// original's PDF library
#[derive(Clone, Copy)]
struct TextState {
    font: BuiltinFont,
    size: f64,
}

struct EmbeddedImage {
    name: String,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
    px_width: u32,
    px_height: u32,
}

/// One output page with its pending resources
pub struct Canvas {
    width: f64,
    height: f64,
    content: Content,
    state: TextState,
    fonts: BTreeMap<&'static str, BuiltinFont>,
    images: Vec<EmbeddedImage>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: Content::new(),
            state: TextState {
                font: font::caption_font(),
                size: 12.0,
            },
            fonts: BTreeMap::new(),
            images: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_font(&mut self, font: BuiltinFont, size: f64) {
        self.state = TextState { font, size };
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.content.set_fill_rgb(
            f32::from(color.r) / 255.0,
            f32::from(color.g) / 255.0,
            f32::from(color.b) / 255.0,
        );
    }

    /// Draw one line of text with its baseline at `y` units from the top
    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        let font = self.state.font;
        self.fonts.insert(font.resource_key(), font);

        self.content.begin_text();
        self.content.set_font(font.resource(), self.state.size as f32);
        self.content
            .next_line(x as f32, (self.height - y) as f32);
        self.content.show(Str(&unicode_to_winansi(text)));
        self.content.end_text();
    }

    /// Place a decoded image with its top-left corner at `(x, y)` from the
    /// top, scaled to `width` x `height` canvas units
    pub fn draw_image(&mut self, image: &DynamicImage, x: f64, y: f64, width: f64, height: f64) {
        let index = self.images.len();
        let embedded = embed(image, format!("Im{index}"));
        self.images.push(embedded);

        let pdf_y = self.height - y - height;
        self.content.save_state();
        self.content.transform([
            width as f32,
            0.0,
            0.0,
            height as f32,
            x as f32,
            pdf_y as f32,
        ]);
        self.content.x_object(Name(self.images[index].name.as_bytes()));
        self.content.restore_state();
    }

    /// Draw the background image across the whole page
    pub fn draw_background(&mut self, image: &DynamicImage) {
        let (w, h) = (self.width, self.height);
        self.draw_image(image, 0.0, 0.0, w, h);
    }

    /// Assemble the single-page PDF and return its bytes
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let Canvas {
            width,
            height,
            content,
            fonts,
            images,
            ..
        } = self;
        let content_bytes = content.finish();

        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let mut next_ref = 5;
        let mut alloc = move || {
            let id = Ref::new(next_ref);
            next_ref += 1;
            id
        };

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut font_refs: Vec<(&'static str, Ref)> = Vec::new();
        for (key, builtin) in &fonts {
            let id = alloc();
            pdf.type1_font(id)
                .base_font(builtin.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            font_refs.push((key, id));
        }

        let mut image_refs: Vec<Ref> = Vec::new();
        for img in &images {
            let smask_id = match &img.alpha {
                Some(alpha) => {
                    let id = alloc();
                    let data = flate_compress(alpha)?;
                    let mut smask = pdf.image_xobject(id, &data);
                    smask.filter(Filter::FlateDecode);
                    smask.width(img.px_width as i32);
                    smask.height(img.px_height as i32);
                    smask.color_space().device_gray();
                    smask.bits_per_component(8);
                    Some(id)
                }
                None => None,
            };

            let id = alloc();
            let data = flate_compress(&img.rgb)?;
            let mut xobject = pdf.image_xobject(id, &data);
            xobject.filter(Filter::FlateDecode);
            xobject.width(img.px_width as i32);
            xobject.height(img.px_height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if let Some(smask_id) = smask_id {
                xobject.s_mask(smask_id);
            }
            drop(xobject);
            image_refs.push(id);
        }

        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, width as f32, height as f32));
            page.parent(page_tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            if !font_refs.is_empty() {
                let mut dict = resources.fonts();
                for (key, id) in &font_refs {
                    dict.pair(Name(key.as_bytes()), *id);
                }
            }
            if !image_refs.is_empty() {
                let mut dict = resources.x_objects();
                for (img, id) in images.iter().zip(&image_refs) {
                    dict.pair(Name(img.name.as_bytes()), *id);
                }
            }
        }

        pdf.stream(content_id, &content_bytes);
        Ok(pdf.finish())
    }
}

/// Split a decoded image into DeviceRGB samples plus an optional DeviceGray
/// soft mask when an alpha channel is present
fn embed(image: &DynamicImage, name: String) -> EmbeddedImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        let bytes = rgba.into_raw();
        let mut rgb = Vec::with_capacity((w * h * 3) as usize);
        let mut alpha = Vec::with_capacity((w * h) as usize);
        for chunk in bytes.chunks_exact(4) {
            rgb.push(chunk[0]);
            rgb.push(chunk[1]);
            rgb.push(chunk[2]);
            alpha.push(chunk[3]);
        }
        EmbeddedImage {
            name,
            rgb,
            alpha: Some(alpha),
            px_width: w,
            px_height: h,
        }
    } else {
        let rgb = image.to_rgb8();
        let (w, h) = rgb.dimensions();
        EmbeddedImage {
            name,
            rgb: rgb.into_raw(),
            alpha: None,
            px_width: w,
            px_height: h,
        }
    }
}

fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
