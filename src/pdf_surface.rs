//! PDF surface - writes drawing calls into a PDF document
//!
//! Each page accumulates content stream operations; `show_page` closes the
//! page and starts a new one. Fonts are the standard Type1 faces, so nothing
//! is embedded. Images become RGB XObjects, shared between draws of the same
//! image with the same mask. A colour-key mask replaces the image's own
//! alpha channel.

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, warn};

use crate::config::CanvasConfig;
use crate::error::{Error, Result};
use crate::image::{ColorMask, ImageReader};
use crate::metrics::StandardFont;
use crate::surface::{LineCap, Surface, TextOptions};

const DEFAULT_FONT_SIZE: f32 = 12.0;
const LEADING_RATIO: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    font: StandardFont,
    font_size: f32,
    leading: f32,
    line_cap: LineCap,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            font: StandardFont::Helvetica,
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_FONT_SIZE * LEADING_RATIO,
            line_cap: LineCap::Butt,
        }
    }
}

pub struct PdfSurface {
    config: CanvasConfig,
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    ops: Vec<Operation>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    fonts: Vec<(StandardFont, ObjectId)>,
    images: HashMap<(u64, Option<ColorMask>), (String, ObjectId)>,
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// WinAnsi bytes for `text`; characters outside Latin-1 become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

impl PdfSurface {
    pub fn new(config: CanvasConfig) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            config,
            doc,
            pages_id,
            page_ids: Vec::new(),
            ops: Vec::new(),
            state: GraphicsState::default(),
            stack: Vec::new(),
            fonts: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Pages finished so far, not counting the one being drawn.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn font_name(&self) -> &'static str {
        self.state.font.base_name()
    }

    pub fn font_size(&self) -> f32 {
        self.state.font_size
    }

    pub fn leading(&self) -> f32 {
        self.state.leading
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.op("w", vec![real(width)]);
    }

    /// Stroke colour, components in `0.0..=1.0`.
    pub fn set_stroke_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.op("RG", vec![real(r), real(g), real(b)]);
    }

    /// Fill colour, components in `0.0..=1.0`.
    pub fn set_fill_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.op("rg", vec![real(r), real(g), real(b)]);
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn font_resource(&mut self, font: StandardFont) -> String {
        if let Some(index) = self.fonts.iter().position(|(f, _)| *f == font) {
            return format!("F{}", index + 1);
        }
        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
        };
        if !font.is_symbolic() {
            dict.set("Encoding", "WinAnsiEncoding");
        }
        let id = self.doc.add_object(dict);
        self.fonts.push((font, id));
        format!("F{}", self.fonts.len())
    }

    fn image_resource(&mut self, image: &ImageReader, mask: Option<ColorMask>) -> String {
        let key = (image.key(), mask);
        if let Some((resource, _)) = self.images.get(&key) {
            return resource.clone();
        }

        let (width, height) = image.size();
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        };
        if let Some(mask) = mask {
            let ranges = mask.ranges().into_iter().map(|v| Object::Integer(i64::from(v)));
            dict.set("Mask", Object::Array(ranges.collect()));
        } else if let Some(alpha) = image.alpha_samples() {
            let smask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(width),
                    "Height" => i64::from(height),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8_i64,
                },
                alpha,
            );
            let smask_id = self.doc.add_object(smask);
            dict.set("SMask", smask_id);
        }

        let id = self.doc.add_object(Stream::new(dict, image.rgb_samples()));
        let resource = format!("Im{}", self.images.len() + 1);
        debug!("Embedded {width}x{height} image as /{resource}");
        self.images.insert(key, (resource.clone(), id));
        resource
    }

    fn resources(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        for (index, (_, id)) in self.fonts.iter().enumerate() {
            fonts.set(format!("F{}", index + 1), *id);
        }
        let mut xobjects = Dictionary::new();
        for (resource, id) in self.images.values() {
            xobjects.set(resource.as_str(), *id);
        }
        dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, options: &TextOptions) {
        let font = self.font_resource(self.state.font);
        self.op("BT", vec![]);
        self.op("Tf", vec![name(&font), real(self.state.font_size)]);
        if let Some(mode) = options.mode {
            self.op("Tr", vec![Object::Integer(mode as i64)]);
        }
        if let Some(space) = options.char_space {
            self.op("Tc", vec![real(space)]);
        }
        if let Some(space) = options.word_space {
            self.op("Tw", vec![real(space)]);
        }
        self.op("Td", vec![real(x), real(y)]);
        self.op(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );

        // Text state outlives ET; put back whatever this string changed.
        if options.mode.is_some() {
            self.op("Tr", vec![Object::Integer(0)]);
        }
        if options.char_space.is_some() {
            self.op("Tc", vec![real(0.0)]);
        }
        if options.word_space.is_some() {
            self.op("Tw", vec![real(0.0)]);
        }
        self.op("ET", vec![]);
    }

    /// Advance width of `text` in the current font, spacing included.
    pub fn string_width(&self, text: &str, options: &TextOptions) -> f32 {
        let mut width = self.state.font.string_width(text, self.state.font_size);
        let chars = text.chars().count();
        if let Some(space) = options.char_space {
            width += space * chars.saturating_sub(1) as f32;
        }
        if let Some(space) = options.word_space {
            width += space * text.chars().filter(|&c| c == ' ').count() as f32;
        }
        width
    }

    /// Close the current page and start a new one.
    ///
    /// Graphics state left saved on the page is restored and the new page
    /// starts from the defaults.
    pub fn show_page(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            warn!(
                "Page {} ended with {} unrestored graphics states",
                self.page_ids.len() + 1,
                self.stack.len()
            );
            for _ in 0..self.stack.len() {
                self.op("Q", vec![]);
            }
        }

        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));
        let (width, height) = self.config.page_size();
        let resources = self.resources();
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), real(width), real(height)],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        debug!("Finished page {}", self.page_ids.len());

        self.state = GraphicsState::default();
        self.stack.clear();
        Ok(())
    }

    fn finish(mut self) -> Result<Document> {
        if !self.ops.is_empty() || self.page_ids.is_empty() {
            self.show_page()?;
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let fields = [
            ("Title", &self.config.title),
            ("Author", &self.config.author),
            ("Subject", &self.config.subject),
            ("Creator", &self.config.creator),
        ];
        if fields.iter().any(|(_, value)| value.is_some()) {
            let mut info = Dictionary::new();
            for (key, value) in fields {
                if let Some(value) = value {
                    info.set(key, Object::string_literal(value.as_str()));
                }
            }
            let info_id = self.doc.add_object(info);
            self.doc.trailer.set("Info", info_id);
        }

        if self.config.compress {
            self.doc.compress();
        }
        debug!("Document finished with {} pages", self.page_ids.len());
        Ok(self.doc)
    }

    /// Finish the document and return the file bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.finish()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Finish the document and write it to `path`.
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut doc = self.finish()?;
        doc.save(path)?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Surface for PdfSurface {
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.op("m", vec![real(x1), real(y1)]);
        self.op("l", vec![real(x2), real(y2)]);
        self.op("S", vec![]);
        Ok(())
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool)
    -> Result<()> {
        self.op("re", vec![real(x), real(y), real(width), real(height)]);
        let paint = match (stroke, fill) {
            (true, true) => "B",
            (false, true) => "f",
            (true, false) => "S",
            (false, false) => "n",
        };
        self.op(paint, vec![]);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageReader,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        mask: Option<ColorMask>,
    ) -> Result<()> {
        let resource = self.image_resource(image, mask);
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![
                real(width),
                real(0.0),
                real(0.0),
                real(height),
                real(x),
                real(y),
            ],
        );
        self.op("Do", vec![name(&resource)]);
        self.op("Q", vec![]);
        Ok(())
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions) -> Result<()> {
        self.text(x, y, text, options);
        Ok(())
    }

    fn draw_right_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions)
    -> Result<()> {
        let width = self.string_width(text, options);
        self.text(x - width, y, text, options);
        Ok(())
    }

    fn draw_centred_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        options: &TextOptions,
    ) -> Result<()> {
        let width = self.string_width(text, options);
        self.text(x - 0.5 * width, y, text, options);
        Ok(())
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        self.state.line_cap = cap;
        self.op("J", vec![Object::Integer(cap.code())]);
        Ok(())
    }

    fn save_state(&mut self) -> Result<()> {
        self.stack.push(self.state.clone());
        self.op("q", vec![]);
        Ok(())
    }

    fn restore_state(&mut self) -> Result<()> {
        self.state = self.stack.pop().ok_or(Error::StateUnderflow)?;
        self.op("Q", vec![]);
        Ok(())
    }

    fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()> {
        let font = StandardFont::by_name(name)?;
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::argument(format!("font size must be positive, got {size}")));
        }
        self.state.font = font;
        self.state.font_size = size;
        self.state.leading = leading.unwrap_or(size * LEADING_RATIO);
        Ok(())
    }

    fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()> {
        if let Some(size) = size {
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::argument(format!("font size must be positive, got {size}")));
            }
            self.state.font_size = size;
        }
        if let Some(leading) = leading {
            self.state.leading = leading;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::TextRenderMode;

    fn operators(surface: &PdfSurface) -> Vec<&str> {
        surface.ops.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn test_line_ops() {
        let mut surface = PdfSurface::default();
        surface.line(0.0, 0.0, 10.0, 5.0).unwrap();
        assert_eq!(operators(&surface), vec!["m", "l", "S"]);
    }

    #[test]
    fn test_rect_paint_operator() {
        let mut surface = PdfSurface::default();
        surface.rect(0.0, 0.0, 1.0, 1.0, true, true).unwrap();
        surface.rect(0.0, 0.0, 1.0, 1.0, false, true).unwrap();
        surface.rect(0.0, 0.0, 1.0, 1.0, true, false).unwrap();
        surface.rect(0.0, 0.0, 1.0, 1.0, false, false).unwrap();
        assert_eq!(
            operators(&surface),
            vec!["re", "B", "re", "f", "re", "S", "re", "n"]
        );
    }

    #[test]
    fn test_save_restore_tracks_state() {
        let mut surface = PdfSurface::default();
        surface.save_state().unwrap();
        surface.set_line_cap(LineCap::Round).unwrap();
        surface.set_font("Courier", 20.0, None).unwrap();
        assert_eq!(surface.line_cap(), LineCap::Round);
        assert!((surface.leading() - 24.0).abs() < 1e-4);
        surface.restore_state().unwrap();
        assert_eq!(surface.line_cap(), LineCap::Butt);
        assert_eq!(surface.font_name(), "Helvetica");
        assert_eq!(surface.font_size(), 12.0);
        assert!(matches!(surface.restore_state(), Err(Error::StateUnderflow)));
    }

    #[test]
    fn test_set_font_rejects_bad_input() {
        let mut surface = PdfSurface::default();
        assert!(matches!(
            surface.set_font("Wingdings", 10.0, None),
            Err(Error::UnknownFont(_))
        ));
        assert!(matches!(
            surface.set_font("Courier", 0.0, None),
            Err(Error::Argument(_))
        ));
        assert!(surface.set_font_size(Some(f32::NAN), None).is_err());
        assert_eq!(surface.font_name(), "Helvetica");
    }

    #[test]
    fn test_set_font_size_keeps_leading() {
        let mut surface = PdfSurface::default();
        surface.set_font_size(Some(20.0), None).unwrap();
        assert_eq!(surface.font_size(), 20.0);
        assert!((surface.leading() - 14.4).abs() < 1e-4);
        surface.set_font_size(None, Some(30.0)).unwrap();
        assert_eq!(surface.font_size(), 20.0);
        assert_eq!(surface.leading(), 30.0);
    }

    #[test]
    fn test_right_string_is_shifted_by_width() {
        let mut surface = PdfSurface::default();
        surface.set_font("Courier", 10.0, None).unwrap();
        surface
            .draw_right_string(100.0, 50.0, "abcd", &TextOptions::default())
            .unwrap();
        let td = surface.ops.iter().find(|op| op.operator == "Td").unwrap();
        assert_eq!(td.operands[0].as_float().unwrap(), 76.0);
        assert_eq!(td.operands[1].as_float().unwrap(), 50.0);
    }

    #[test]
    fn test_string_width_with_spacing() {
        let surface = PdfSurface::default();
        let options = TextOptions::default()
            .with_char_space(1.0)
            .with_word_space(2.0);
        let plain = surface.string_width("a b", &TextOptions::default());
        assert!((surface.string_width("a b", &options) - (plain + 4.0)).abs() < 1e-4);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A(é)"), vec![b'A', b'(', 0xE9, b')']);
        assert_eq!(encode_win_ansi("→"), vec![b'?']);
    }

    #[test]
    fn test_font_resources_are_shared() {
        let mut surface = PdfSurface::default();
        assert_eq!(surface.font_resource(StandardFont::Helvetica), "F1");
        assert_eq!(surface.font_resource(StandardFont::Courier), "F2");
        assert_eq!(surface.font_resource(StandardFont::Helvetica), "F1");
    }

    #[test]
    fn test_show_page_closes_open_states() {
        let mut surface = PdfSurface::default();
        surface.save_state().unwrap();
        surface.show_page().unwrap();
        assert_eq!(surface.page_count(), 1);
        assert!(surface.ops.is_empty());
        assert!(surface.restore_state().is_err());
    }

    #[test]
    fn test_text_options_do_not_leak_into_later_strings() {
        let mut surface = PdfSurface::default();
        let options = TextOptions::default()
            .with_mode(TextRenderMode::Invisible)
            .with_char_space(5.0);
        surface.draw_string(0.0, 0.0, "hidden", &options).unwrap();
        surface
            .draw_string(0.0, 20.0, "shown", &TextOptions::default())
            .unwrap();
        assert_eq!(
            operators(&surface),
            vec![
                "BT", "Tf", "Tr", "Tc", "Td", "Tj", "Tr", "Tc", "ET", // first
                "BT", "Tf", "Td", "Tj", "ET", // second
            ]
        );
        let reset_mode = &surface.ops[6];
        assert_eq!(reset_mode.operands[0].as_i64().unwrap(), 0);
        let reset_space = &surface.ops[7];
        assert_eq!(reset_space.operands[0].as_float().unwrap(), 0.0);
    }

    #[test]
    fn test_symbolic_fonts_keep_builtin_encoding() {
        let mut surface = PdfSurface::default();
        surface.font_resource(StandardFont::ZapfDingbats);
        surface.font_resource(StandardFont::TimesRoman);
        let dict = |index: usize| {
            surface
                .doc
                .get_dictionary(surface.fonts[index].1)
                .unwrap()
                .clone()
        };
        assert!(dict(0).get(b"Encoding").is_err());
        assert_eq!(
            dict(1).get(b"Encoding").unwrap().as_name().unwrap(),
            b"WinAnsiEncoding"
        );
    }

    #[test]
    fn test_distinct_images_get_distinct_resources() {
        let mut surface = PdfSurface::default();
        let first = ImageReader::from_image(image::DynamicImage::new_rgb8(4, 2));
        let first_name = surface.image_resource(&first, None);
        drop(first);
        let second = ImageReader::from_image(image::DynamicImage::new_rgb8(8, 8));
        let second_name = surface.image_resource(&second, None);
        assert_ne!(first_name, second_name);
        assert_eq!(surface.image_resource(&second.clone(), None), second_name);
        assert_eq!(surface.images.len(), 2);
    }

    #[test]
    fn test_color_mask_replaces_alpha() {
        let mut pixels = image::RgbaImage::from_pixel(2, 1, image::Rgba([9, 9, 9, 255]));
        pixels.put_pixel(1, 0, image::Rgba([9, 9, 9, 0]));
        let reader = ImageReader::from_image(image::DynamicImage::ImageRgba8(pixels));
        let mut surface = PdfSurface::default();

        surface.image_resource(&reader, None);
        surface.image_resource(&reader, Some(ColorMask::new((0, 10), (0, 10), (0, 10))));

        let dicts: HashMap<bool, Dictionary> = surface
            .images
            .iter()
            .map(|((_, mask), (_, id))| {
                let stream = surface.doc.get_object(*id).unwrap().as_stream().unwrap();
                (mask.is_some(), stream.dict.clone())
            })
            .collect();
        assert!(dicts[&false].get(b"SMask").is_ok());
        assert!(dicts[&false].get(b"Mask").is_err());
        assert!(dicts[&true].get(b"SMask").is_err());
        assert!(dicts[&true].get(b"Mask").is_ok());
    }
}
