//! Draws a sample sheet of every canvas primitive.
//!
//! Usage: `pdfcanvas [OUT.pdf] [CONFIG.json]`

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use image::{DynamicImage, Rgb, RgbImage};
use pdfcanvas::{
    Anchor, Angle, Canvas, CanvasConfig, ColorMask, ImageReader, PdfSurface, Surface,
    TextOptions, TextRenderMode,
};
use tracing::{error, info};

fn swatch() -> ImageReader {
    let img = RgbImage::from_fn(48, 32, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([(x * 5) as u8, 80, (y * 7) as u8])
        }
    });
    ImageReader::from_image(DynamicImage::ImageRgb8(img))
}

fn draw_sheet(canvas: &mut Canvas<PdfSurface>) -> pdfcanvas::Result<()> {
    let (_, page_height) = canvas.config().page_size();
    let top = page_height - 60.0;

    canvas.set_font("Helvetica", 18.0, None)?;
    let plain = TextOptions::default();
    canvas.draw_anchored_string(60.0, top, "pdfcanvas sample sheet", Anchor::NW, &plain)?;
    canvas.set_font("Helvetica", 10.0, None)?;

    // Polar fan with arrowheads
    let hub = (160.0, top - 150.0);
    for step in 0..12 {
        let theta = Angle::degrees(30.0 * step as f32);
        canvas.arrow_polar(hub.0, hub.1, 20.0, theta, 90.0, theta, None)?;
    }
    canvas.draw_anchored_string(hub.0, hub.1 - 110.0, "arrow_polar", Anchor::N, &plain)?;

    // Dashed lines, default and explicit counts
    let x = 320.0;
    let mut y = top - 60.0;
    for count in [None, Some(3), Some(8)] {
        canvas.line_dashed(x, y, x + 200.0, y, count)?;
        let label = count.map_or_else(|| "default".to_string(), |n| n.to_string());
        canvas.draw_anchored_string(x + 210.0, y, &label, Anchor::W, &plain)?;
        y -= 25.0;
    }
    let end = canvas.line_angle_dashed(x, y, 150.0, Angle::degrees(-20.0), None)?;
    canvas.arrow_relative(end.x, end.y, 40.0, 0.0, Some(8.0))?;

    // Rectangles by corners, one of them backwards
    let base = top - 320.0;
    canvas.set_stroke_rgb(0.1, 0.3, 0.7);
    canvas.set_fill_rgb(0.85, 0.9, 1.0);
    canvas.rect_coords(60.0, base, 200.0, base - 80.0, true, true)?;
    canvas.rect_coords(360.0, base - 80.0, 240.0, base, true, false)?;

    // The same image at every anchor around one point
    let img = swatch();
    let centre = (300.0, base - 220.0);
    canvas.line(centre.0 - 120.0, centre.1, centre.0 + 120.0, centre.1)?;
    canvas.line(centre.0, centre.1 - 90.0, centre.0, centre.1 + 90.0)?;
    let mask = Some(ColorMask::new((250, 255), (250, 255), (250, 255)));
    for anchor in Anchor::ALL {
        let (dx, dy) = anchor.offset(-100.0, -70.0);
        canvas.draw_anchored_image(
            &img,
            centre.0 + dx + 50.0,
            centre.1 + dy + 35.0,
            Some(32.0),
            None,
            mask,
            anchor,
        )?;
    }

    // Anchored strings around a cross
    let mark = (300.0, 120.0);
    canvas.arrow_angle(mark.0 - 60.0, mark.1, 50.0, Angle::ZERO, None)?;
    let outline = plain.with_mode(TextRenderMode::Stroke);
    for (anchor, text) in [(Anchor::SE, "SE"), (Anchor::NW, "NW"), (Anchor::C, "C")] {
        canvas.draw_anchored_string(mark.0, mark.1, text, anchor, &outline)?;
    }

    canvas.show_page()
}

fn run() -> pdfcanvas::Result<PathBuf> {
    let mut args = env::args_os().skip(1);
    let output = args.next().map_or_else(|| PathBuf::from("sample.pdf"), PathBuf::from);
    let config = args
        .next()
        .map_or_else(CanvasConfig::default, CanvasConfig::load_or_default)
        .with_title("pdfcanvas sample sheet");

    let mut canvas = Canvas::new(PdfSurface::new(config));
    draw_sheet(&mut canvas)?;
    canvas.into_inner().save(&output)?;
    Ok(output)
}

fn main() -> ExitCode {
    pdfcanvas::init_logging();

    match run() {
        Ok(path) => {
            info!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to draw sample sheet: {e}");
            ExitCode::FAILURE
        }
    }
}
