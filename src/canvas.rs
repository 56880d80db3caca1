//! Canvas - convenience drawing on top of a surface
//!
//! Arrows, polar and dashed lines, rectangles by corner coordinates and
//! anchored images and text. Every method computes coordinates and then
//! calls the wrapped [`Surface`]; nothing is buffered.
//!
//! Operations the canvas does not add are reached through `Deref`, so a
//! `Canvas<PdfSurface>` can call `show_page()` or `line()` directly.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::anchor::{Anchor, Horizontal};
use crate::error::{Error, Result};
use crate::geometry::{
    Angle, Point, barb_angles, dash_segments, default_arrowhead_length, default_dash_count,
};
use crate::image::{ColorMask, ImageSource};
use crate::metrics::{StandardFont, TextMeasure};
use crate::surface::{LineCap, Surface, TextOptions};

/// Font size a fresh surface starts with (Helvetica 12).
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

pub struct Canvas<S: Surface> {
    surface: S,
    measure: Box<dyn TextMeasure>,
    font_size: f32,
}

impl<S: Surface> Canvas<S> {
    /// Wrap `surface`, measuring text with Helvetica metrics.
    pub fn new(surface: S) -> Self {
        Self::with_measure(surface, Box::new(StandardFont::Helvetica))
    }

    pub fn with_measure(surface: S, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            surface,
            measure,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    /// The last font size set through this canvas.
    ///
    /// Font changes made on the surface directly are not seen here.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    // ------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------

    /// Line from `(x1, y1)` to the polar offset `(r, theta)`. Returns the endpoint.
    pub fn line_angle(&mut self, x1: f32, y1: f32, r: f32, theta: Angle) -> Result<Point> {
        let end = Point::new(x1, y1).polar(r, theta);
        self.surface.line(x1, y1, end.x, end.y)?;
        Ok(end)
    }

    /// Line between two polar offsets from `(x, y)`. Returns the second point.
    pub fn line_polar(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        r2: f32,
        theta2: Angle,
    ) -> Result<Point> {
        let origin = Point::new(x, y);
        let start = origin.polar(r1, theta1);
        let end = origin.polar(r2, theta2);
        self.surface.line(start.x, start.y, end.x, end.y)?;
        Ok(end)
    }

    /// Line starting at polar offset `(r1, theta1)` from `(x, y)` and running
    /// `dr` along `dtheta` from there.
    pub fn line_polar_relative(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        dr: f32,
        dtheta: Angle,
    ) -> Result<Point> {
        let start = Point::new(x, y).polar(r1, theta1);
        self.line_angle(start.x, start.y, dr, dtheta)
    }

    pub fn line_relative(&mut self, x1: f32, y1: f32, dx: f32, dy: f32) -> Result<Point> {
        let end = Point::new(x1, y1).offset(dx, dy);
        self.surface.line(x1, y1, end.x, end.y)?;
        Ok(end)
    }

    // ------------------------------------------------------------------
    // Dashed lines
    // ------------------------------------------------------------------

    /// Dashed line from `(x1, y1)` to `(x2, y2)`.
    ///
    /// With `num_dashes` unset the count is `floor(length / 30) + 2`.
    pub fn line_dashed(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        num_dashes: Option<u32>,
    ) -> Result<()> {
        let start = Point::new(x1, y1);
        let end = Point::new(x2, y2);
        let count = num_dashes.unwrap_or_else(|| default_dash_count(start.distance(end)));
        trace!("Dashing ({x1}, {y1}) -> ({x2}, {y2}) in {count} dashes");

        for dash in dash_segments(start, end, count) {
            self.line_relative(dash.start.x, dash.start.y, dash.dx, dash.dy)?;
        }
        Ok(())
    }

    pub fn line_angle_dashed(
        &mut self,
        x1: f32,
        y1: f32,
        r: f32,
        theta: Angle,
        num_dashes: Option<u32>,
    ) -> Result<Point> {
        let end = Point::new(x1, y1).polar(r, theta);
        let count = num_dashes.unwrap_or_else(|| default_dash_count(r.abs()));
        self.line_dashed(x1, y1, end.x, end.y, Some(count))?;
        Ok(end)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn line_polar_dashed(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        r2: f32,
        theta2: Angle,
        num_dashes: Option<u32>,
    ) -> Result<Point> {
        let origin = Point::new(x, y);
        let start = origin.polar(r1, theta1);
        let end = origin.polar(r2, theta2);
        self.line_dashed(start.x, start.y, end.x, end.y, num_dashes)?;
        Ok(end)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn line_polar_relative_dashed(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        dr: f32,
        dtheta: Angle,
        num_dashes: Option<u32>,
    ) -> Result<Point> {
        let start = Point::new(x, y).polar(r1, theta1);
        self.line_angle_dashed(start.x, start.y, dr, dtheta, num_dashes)
    }

    pub fn line_relative_dashed(
        &mut self,
        x1: f32,
        y1: f32,
        dx: f32,
        dy: f32,
        num_dashes: Option<u32>,
    ) -> Result<Point> {
        let end = Point::new(x1, y1).offset(dx, dy);
        self.line_dashed(x1, y1, end.x, end.y, num_dashes)?;
        Ok(end)
    }

    // ------------------------------------------------------------------
    // Arrows
    // ------------------------------------------------------------------

    /// Runs `draw` between a save and a restore with round line caps.
    ///
    /// The restore happens whenever the save succeeded, whatever `draw`
    /// returned. Butt and square caps clip the join of the barbs.
    fn with_round_caps<T>(&mut self, draw: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.surface.save_state()?;
        let drawn = self
            .surface
            .set_line_cap(LineCap::Round)
            .and_then(|()| draw(self));
        let restored = self.surface.restore_state();
        let value = drawn?;
        restored?;
        Ok(value)
    }

    fn barbs(&mut self, tip: Point, shaft: Angle, length: f32) -> Result<()> {
        for barb in barb_angles(shaft) {
            self.line_angle(tip.x, tip.y, length, barb)?;
        }
        Ok(())
    }

    /// Arrow from `(x1, y1)` to `(x2, y2)` with the head at `(x2, y2)`.
    ///
    /// The head defaults to about 1/12 of the shaft length.
    pub fn arrow(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        arrowhead_length: Option<f32>,
    ) -> Result<()> {
        let start = Point::new(x1, y1);
        let tip = Point::new(x2, y2);
        let head =
            arrowhead_length.unwrap_or_else(|| default_arrowhead_length(start.distance(tip)));

        self.with_round_caps(|canvas| {
            canvas.surface.line(x1, y1, x2, y2)?;
            canvas.barbs(tip, start.direction_to(tip), head)
        })
    }

    /// Arrow from `(x1, y1)` to the polar offset `(r, theta)`. Returns the tip.
    ///
    /// Barbs are laid out against `theta` itself, so a negative `r` gives a
    /// head that opens away from the shaft.
    pub fn arrow_angle(
        &mut self,
        x1: f32,
        y1: f32,
        r: f32,
        theta: Angle,
        arrowhead_length: Option<f32>,
    ) -> Result<Point> {
        self.with_round_caps(|canvas| {
            let tip = canvas.line_angle(x1, y1, r, theta)?;
            let head = arrowhead_length
                .unwrap_or_else(|| default_arrowhead_length(Point::new(x1, y1).distance(tip)));
            canvas.barbs(tip, theta, head)?;
            Ok(tip)
        })
    }

    /// Arrow between two polar offsets from `(x, y)`. Returns the tip.
    #[allow(clippy::too_many_arguments)]
    pub fn arrow_polar(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        r2: f32,
        theta2: Angle,
        arrowhead_length: Option<f32>,
    ) -> Result<Point> {
        let origin = Point::new(x, y);
        let start = origin.polar(r1, theta1);
        let tip = origin.polar(r2, theta2);
        self.arrow(start.x, start.y, tip.x, tip.y, arrowhead_length)?;
        Ok(tip)
    }

    /// Arrow starting at polar offset `(r1, theta1)` from `(x, y)` and
    /// running `dr` along `dtheta`. Returns the tip.
    #[allow(clippy::too_many_arguments)]
    pub fn arrow_polar_relative(
        &mut self,
        x: f32,
        y: f32,
        r1: f32,
        theta1: Angle,
        dr: f32,
        dtheta: Angle,
        arrowhead_length: Option<f32>,
    ) -> Result<Point> {
        let start = Point::new(x, y).polar(r1, theta1);
        self.arrow_angle(start.x, start.y, dr, dtheta, arrowhead_length)
    }

    pub fn arrow_relative(
        &mut self,
        x1: f32,
        y1: f32,
        dx: f32,
        dy: f32,
        arrowhead_length: Option<f32>,
    ) -> Result<Point> {
        let tip = Point::new(x1, y1).offset(dx, dy);
        self.arrow(x1, y1, tip.x, tip.y, arrowhead_length)?;
        Ok(tip)
    }

    // ------------------------------------------------------------------
    // Rectangles
    // ------------------------------------------------------------------

    /// Rectangle with corners `(x1, y1)` and `(x2, y2)`.
    pub fn rect_coords(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: bool,
        fill: bool,
    ) -> Result<()> {
        self.surface.rect(x1, y1, x2 - x1, y2 - y1, stroke, fill)
    }

    // ------------------------------------------------------------------
    // Anchored placement
    // ------------------------------------------------------------------

    /// Draw an image with its `anchor` point on `(x, y)`.
    ///
    /// Without `width` and `height` the image is drawn at one point per
    /// pixel. With one of them the other follows the image's aspect ratio
    /// (floored). With both the image is stretched to fit. Negative sizes
    /// mirror the image. A colour-key `mask` replaces any alpha channel
    /// the image carries.
    ///
    /// Returns the image's size in pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_anchored_image<'a>(
        &mut self,
        image: impl Into<ImageSource<'a>>,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
        mask: Option<ColorMask>,
        anchor: Anchor,
    ) -> Result<(u32, u32)> {
        let source = image.into();
        let reader = source.resolve()?;
        let (img_width, img_height) = reader.size();
        let (px_width, px_height) = (img_width as f32, img_height as f32);

        let (width, height) = match (width, height) {
            (None, None) => (px_width, px_height),
            (None, Some(_)) if img_height == 0 => {
                return Err(Error::argument("cannot scale an image with zero height"));
            }
            (Some(_), None) if img_width == 0 => {
                return Err(Error::argument("cannot scale an image with zero width"));
            }
            (None, Some(h)) => ((h * px_width / px_height).floor(), h),
            (Some(w), None) => (w, (w * px_height / px_width).floor()),
            (Some(w), Some(h)) => (w, h),
        };

        let (x_offset, y_offset) = anchor.offset(width, height);
        trace!("Anchoring {img_width}x{img_height} image at {anchor}: {width}x{height}");
        self.surface
            .draw_image(&reader, x - x_offset, y - y_offset, width, height, mask)?;
        Ok((img_width, img_height))
    }

    /// Draw `text` with its `anchor` point on `(x, y)`.
    ///
    /// The height comes from measuring `text` at the current font size; the
    /// horizontal edge picks left, right or centred drawing.
    pub fn draw_anchored_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        anchor: Anchor,
        options: &TextOptions,
    ) -> Result<()> {
        let text_height = self.measure.bounds(text, self.font_size).height();
        let y = y - anchor.y_offset(text_height);

        match anchor.horizontal {
            Horizontal::West => self.surface.draw_string(x, y, text, options),
            Horizontal::East => self.surface.draw_right_string(x, y, text, options),
            Horizontal::Center => self.surface.draw_centred_string(x, y, text, options),
        }
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    /// Select a font on the surface and remember its size.
    pub fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()> {
        self.surface.set_font(name, size, leading)?;
        self.font_size = size;
        Ok(())
    }

    /// Change the size and/or leading. The remembered size only changes
    /// when `size` is given.
    pub fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()> {
        self.surface.set_font_size(size, leading)?;
        if let Some(size) = size {
            self.font_size = size;
        }
        Ok(())
    }
}

impl<S: Surface> Deref for Canvas<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> DerefMut for Canvas<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{Command, ListSurface};

    const EPS: f32 = 1e-4;

    fn canvas() -> Canvas<ListSurface> {
        Canvas::new(ListSurface::new())
    }

    /// Fails every call after the first `budget` calls.
    struct FailingSurface {
        inner: ListSurface,
        budget: usize,
    }

    impl FailingSurface {
        fn tick(&mut self) -> Result<()> {
            if self.budget == 0 {
                return Err(Error::argument("surface gave up"));
            }
            self.budget -= 1;
            Ok(())
        }
    }

    impl Surface for FailingSurface {
        fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
            self.tick()?;
            self.inner.line(x1, y1, x2, y2)
        }
        fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, stroke: bool, fill: bool)
        -> Result<()> {
            self.inner.rect(x, y, w, h, stroke, fill)
        }
        fn draw_image(
            &mut self,
            image: &crate::image::ImageReader,
            x: f32,
            y: f32,
            w: f32,
            h: f32,
            mask: Option<ColorMask>,
        ) -> Result<()> {
            self.inner.draw_image(image, x, y, w, h, mask)
        }
        fn draw_string(&mut self, x: f32, y: f32, t: &str, o: &TextOptions) -> Result<()> {
            self.inner.draw_string(x, y, t, o)
        }
        fn draw_right_string(&mut self, x: f32, y: f32, t: &str, o: &TextOptions) -> Result<()> {
            self.inner.draw_right_string(x, y, t, o)
        }
        fn draw_centred_string(&mut self, x: f32, y: f32, t: &str, o: &TextOptions)
        -> Result<()> {
            self.inner.draw_centred_string(x, y, t, o)
        }
        fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
            self.inner.set_line_cap(cap)
        }
        fn save_state(&mut self) -> Result<()> {
            self.inner.save_state()
        }
        fn restore_state(&mut self) -> Result<()> {
            self.inner.restore_state()
        }
        fn set_font(&mut self, name: &str, size: f32, leading: Option<f32>) -> Result<()> {
            if name == "Nope" {
                return Err(Error::unknown_font(name));
            }
            self.inner.set_font(name, size, leading)
        }
        fn set_font_size(&mut self, size: Option<f32>, leading: Option<f32>) -> Result<()> {
            self.inner.set_font_size(size, leading)
        }
    }

    #[test]
    fn test_line_angle_endpoint() {
        let mut c = canvas();
        let end = c.line_angle(1.0, 1.0, 2.0, Angle::degrees(90.0)).unwrap();
        assert!((end.x - 1.0).abs() < EPS);
        assert!((end.y - 3.0).abs() < EPS);
        assert_eq!(c.display_list().lines(), vec![(1.0, 1.0, end.x, end.y)]);
    }

    #[test]
    fn test_line_relative() {
        let mut c = canvas();
        let end = c.line_relative(1.0, 2.0, 3.0, -4.0).unwrap();
        assert_eq!(end, Point::new(4.0, -2.0));
    }

    #[test]
    fn test_dashed_default_count() {
        let mut c = canvas();
        c.line_dashed(0.0, 0.0, 100.0, 0.0, None).unwrap();
        // floor(100 / 30) + 2
        assert_eq!(c.display_list().lines().len(), 5);
    }

    #[test]
    fn test_dashed_zero_dashes_draws_nothing() {
        let mut c = canvas();
        let end = c
            .line_relative_dashed(0.0, 0.0, 10.0, 10.0, Some(0))
            .unwrap();
        assert_eq!(end, Point::new(10.0, 10.0));
        assert!(c.display_list().is_empty());
    }

    #[test]
    fn test_arrow_restores_state() {
        let mut c = canvas();
        c.arrow(0.0, 0.0, 10.0, 0.0, None).unwrap();
        let cmds = c.display_list().commands();
        assert!(matches!(cmds[0], Command::SaveState));
        assert!(matches!(cmds[1], Command::SetLineCap(LineCap::Round)));
        assert!(matches!(cmds.last(), Some(Command::RestoreState)));
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_arrow_restores_state_after_failure() {
        let surface = FailingSurface {
            inner: ListSurface::new(),
            budget: 1,
        };
        let mut c = Canvas::new(surface);
        assert!(c.arrow(0.0, 0.0, 10.0, 0.0, None).is_err());
        let inner = &c.surface().inner;
        assert_eq!(inner.depth(), 0);
        assert!(matches!(
            inner.display_list().commands().last(),
            Some(Command::RestoreState)
        ));
    }

    #[test]
    fn test_failed_set_font_keeps_shadow_size() {
        let surface = FailingSurface {
            inner: ListSurface::new(),
            budget: 0,
        };
        let mut c = Canvas::new(surface);
        assert!(matches!(
            c.set_font("Nope", 30.0, None),
            Err(Error::UnknownFont(_))
        ));
        assert_eq!(c.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_font_size_shadow() {
        let mut c = canvas();
        assert_eq!(c.font_size(), 12.0);
        c.set_font("Courier", 9.0, None).unwrap();
        assert_eq!(c.font_size(), 9.0);
        c.set_font_size(None, Some(14.0)).unwrap();
        assert_eq!(c.font_size(), 9.0);
        c.set_font_size(Some(18.0), None).unwrap();
        assert_eq!(c.font_size(), 18.0);
    }

    #[test]
    fn test_surface_font_changes_are_not_tracked() {
        let mut c = canvas();
        c.surface_mut().set_font("Courier", 30.0, None).unwrap();
        assert_eq!(c.font_size(), DEFAULT_FONT_SIZE);
    }
}
