//! Drawing surface trait
//!
//! A surface is the stateful page the canvas draws on. It owns the graphics
//! state (line cap, font, save/restore stack); the canvas only issues calls.

use crate::error::Result;
use crate::image::{ColorMask, ImageReader};

/// Line cap style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LineCap {
    #[default]
    Butt = 0,
    Round = 1,
    /// Projecting square cap (extends beyond the endpoint)
    Square = 2,
}

impl LineCap {
    /// The operand of the PDF `J` operator.
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Text rendering mode (`Tr`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextRenderMode {
    #[default]
    Fill = 0,
    Stroke = 1,
    FillStroke = 2,
    Invisible = 3,
}

/// Extra string-drawing options, passed through to the surface unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextOptions {
    pub mode: Option<TextRenderMode>,
    pub char_space: Option<f32>,
    pub word_space: Option<f32>,
}

impl TextOptions {
    pub fn with_mode(mut self, mode: TextRenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_char_space(mut self, space: f32) -> Self {
        self.char_space = Some(space);
        self
    }

    pub fn with_word_space(mut self, space: f32) -> Self {
        self.word_space = Some(space);
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// The primitive operations a canvas draws with.
pub trait Surface {
    /// Stroke a straight line.
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()>;

    /// Rectangle with lower-left corner `(x, y)`. Negative sizes flip it.
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool)
    -> Result<()>;

    /// Paint `image` into the box with origin `(x, y)`. Negative sizes
    /// mirror the image along that axis. A `mask` takes the place of the
    /// image's alpha channel.
    fn draw_image(
        &mut self,
        image: &ImageReader,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        mask: Option<ColorMask>,
    ) -> Result<()>;

    /// Text starting at `(x, y)`.
    fn draw_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions) -> Result<()>;

    /// Text ending at `(x, y)`.
    fn draw_right_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions)
    -> Result<()>;

    /// Text centred on `(x, y)`.
    fn draw_centred_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        options: &TextOptions,
    ) -> Result<()>;

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()>;

    fn save_state(&mut self) -> Result<()>;

    fn restore_state(&mut self) -> Result<()>;

    /// Select a font. Leading defaults to 1.2 × size.
    fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()>;

    /// Change size and/or leading without changing the face.
    fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        (**self).line(x1, y1, x2, y2)
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool)
    -> Result<()> {
        (**self).rect(x, y, width, height, stroke, fill)
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
        (**self).draw_image(image, x, y, width, height, mask)
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions) -> Result<()> {
        (**self).draw_string(x, y, text, options)
    }

    fn draw_right_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions)
    -> Result<()> {
        (**self).draw_right_string(x, y, text, options)
    }

    fn draw_centred_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        options: &TextOptions,
    ) -> Result<()> {
        (**self).draw_centred_string(x, y, text, options)
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        (**self).set_line_cap(cap)
    }

    fn save_state(&mut self) -> Result<()> {
        (**self).save_state()
    }

    fn restore_state(&mut self) -> Result<()> {
        (**self).restore_state()
    }

    fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()> {
        (**self).set_font(name, size, leading)
    }

    fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()> {
        (**self).set_font_size(size, leading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cap_codes() {
        assert_eq!(LineCap::Butt.code(), 0);
        assert_eq!(LineCap::Round.code(), 1);
        assert_eq!(LineCap::Square.code(), 2);
    }

    #[test]
    fn test_text_options_builder() {
        let options = TextOptions::default()
            .with_mode(TextRenderMode::Stroke)
            .with_char_space(0.5);
        assert_eq!(options.mode, Some(TextRenderMode::Stroke));
        assert_eq!(options.char_space, Some(0.5));
        assert_eq!(options.word_space, None);
        assert!(!options.is_default());
        assert!(TextOptions::default().is_default());
    }
}
