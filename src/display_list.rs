//! Display list - record and replay surface calls
//!
//! `ListSurface` accepts every surface operation and stores it as a
//! [`Command`]. The resulting [`DisplayList`] can be inspected or replayed
//! into any other surface.

use crate::error::{Error, Result};
use crate::image::{ColorMask, ImageReader};
use crate::surface::{LineCap, Surface, TextOptions};

/// Horizontal alignment of a recorded string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
    Centre,
}

/// One recorded surface call
#[derive(Debug, Clone)]
pub enum Command {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: bool,
        fill: bool,
    },
    Image {
        image: ImageReader,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        mask: Option<ColorMask>,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        align: TextAlign,
        options: TextOptions,
    },
    SetLineCap(LineCap),
    SaveState,
    RestoreState,
    SetFont {
        name: String,
        size: f32,
        leading: Option<f32>,
    },
    SetFontSize {
        size: Option<f32>,
        leading: Option<f32>,
    },
}

/// Display list - recorded surface calls in issue order
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<Command>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Just the line segments, as `(x1, y1, x2, y2)`.
    pub fn lines(&self) -> Vec<(f32, f32, f32, f32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match *cmd {
                Command::Line { x1, y1, x2, y2 } => Some((x1, y1, x2, y2)),
                _ => None,
            })
            .collect()
    }

    /// Run every command against `surface`, stopping at the first error.
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        for cmd in &self.commands {
            match cmd {
                Command::Line { x1, y1, x2, y2 } => surface.line(*x1, *y1, *x2, *y2)?,
                Command::Rect {
                    x,
                    y,
                    width,
                    height,
                    stroke,
                    fill,
                } => surface.rect(*x, *y, *width, *height, *stroke, *fill)?,
                Command::Image {
                    image,
                    x,
                    y,
                    width,
                    height,
                    mask,
                } => surface.draw_image(image, *x, *y, *width, *height, *mask)?,
                Command::Text {
                    x,
                    y,
                    text,
                    align,
                    options,
                } => match align {
                    TextAlign::Left => surface.draw_string(*x, *y, text, options)?,
                    TextAlign::Right => surface.draw_right_string(*x, *y, text, options)?,
                    TextAlign::Centre => surface.draw_centred_string(*x, *y, text, options)?,
                },
                Command::SetLineCap(cap) => surface.set_line_cap(*cap)?,
                Command::SaveState => surface.save_state()?,
                Command::RestoreState => surface.restore_state()?,
                Command::SetFont {
                    name,
                    size,
                    leading,
                } => surface.set_font(name, *size, *leading)?,
                Command::SetFontSize { size, leading } => surface.set_font_size(*size, *leading)?,
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// List surface - records drawing operations to a display list
///
/// Save/restore pairing is checked so a stray restore fails the same way it
/// would on a real page.
#[derive(Debug, Default)]
pub struct ListSurface {
    list: DisplayList,
    depth: usize,
}

impl ListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn into_display_list(self) -> DisplayList {
        self.list
    }

    /// Current save/restore nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn push(&mut self, cmd: Command) -> Result<()> {
        self.list.commands.push(cmd);
        Ok(())
    }

    fn text(&mut self, x: f32, y: f32, text: &str, align: TextAlign, options: &TextOptions)
    -> Result<()> {
        self.push(Command::Text {
            x,
            y,
            text: text.to_string(),
            align,
            options: *options,
        })
    }
}

impl Surface for ListSurface {
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.push(Command::Line { x1, y1, x2, y2 })
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool)
    -> Result<()> {
        self.push(Command::Rect {
            x,
            y,
            width,
            height,
            stroke,
            fill,
        })
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
        self.push(Command::Image {
            image: image.clone(),
            x,
            y,
            width,
            height,
            mask,
        })
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions) -> Result<()> {
        self.text(x, y, text, TextAlign::Left, options)
    }

    fn draw_right_string(&mut self, x: f32, y: f32, text: &str, options: &TextOptions)
    -> Result<()> {
        self.text(x, y, text, TextAlign::Right, options)
    }

    fn draw_centred_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        options: &TextOptions,
    ) -> Result<()> {
        self.text(x, y, text, TextAlign::Centre, options)
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        self.push(Command::SetLineCap(cap))
    }

    fn save_state(&mut self) -> Result<()> {
        self.depth += 1;
        self.push(Command::SaveState)
    }

    fn restore_state(&mut self) -> Result<()> {
        self.depth = self.depth.checked_sub(1).ok_or(Error::StateUnderflow)?;
        self.push(Command::RestoreState)
    }

    fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()> {
        self.push(Command::SetFont {
            name: name.to_string(),
            size,
            leading,
        })
    }

    fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()> {
        self.push(Command::SetFontSize { size, leading })
    }
}
