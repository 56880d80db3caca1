//! pdfcanvas - drawing helpers on top of a PDF page
//!
//! [`Canvas`] wraps any [`Surface`] and adds arrows, polar and dashed lines,
//! rectangles given by two corners, and images and strings placed by a
//! compass-point [`Anchor`]. [`PdfSurface`] writes to a PDF document;
//! [`ListSurface`] records calls for inspection or replay.
//!
//! ```no_run
//! use pdfcanvas::{Anchor, Angle, Canvas, CanvasConfig, PdfSurface, TextOptions};
//!
//! let mut canvas = Canvas::new(PdfSurface::new(CanvasConfig::default()));
//! canvas.arrow(100.0, 100.0, 200.0, 150.0, None)?;
//! canvas.line_angle_dashed(100.0, 300.0, 120.0, Angle::degrees(30.0), None)?;
//! canvas.draw_anchored_string(300.0, 400.0, "Label", Anchor::NE, &TextOptions::default())?;
//! canvas.into_inner().save("out.pdf")?;
//! # Ok::<(), pdfcanvas::Error>(())
//! ```

pub mod anchor;
pub mod canvas;
pub mod config;
pub mod display_list;
pub mod error;
pub mod geometry;
pub mod image;
pub mod metrics;
pub mod pdf_surface;
pub mod surface;

pub use anchor::{Anchor, Horizontal, Vertical};
pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use display_list::{Command, DisplayList, ListSurface, TextAlign};
pub use error::{Error, Result};
pub use geometry::{Angle, Point, Rect};
pub use self::image::{ColorMask, ImageReader, ImageSource};
pub use metrics::{StandardFont, TextMeasure};
pub use pdf_surface::PdfSurface;
pub use surface::{LineCap, Surface, TextOptions, TextRenderMode};

/// Install a `tracing` subscriber that prints to stderr.
///
/// `RUST_LOG` selects what is shown; the default level is `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    // A second call keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
