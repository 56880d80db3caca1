//! Image loading and size discovery

use crate::error::Result;
use image::{DynamicImage, GenericImageView};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// A decoded raster image. Clones share the pixel data and the identity.
#[derive(Clone)]
pub struct ImageReader {
    id: u64,
    image: Arc<DynamicImage>,
}

impl ImageReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Decoding image {}", path.display());
        let image = image::open(path)?;
        Ok(Self::from_image(image))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        debug!("Decoding image from memory ({} bytes)", data.len());
        Ok(Self::from_image(image::load_from_memory(data)?))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            image: Arc::new(image),
        }
    }

    /// Intrinsic size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Packed 8-bit RGB samples, row by row from the top.
    pub fn rgb_samples(&self) -> Vec<u8> {
        self.image.to_rgb8().into_raw()
    }

    /// The alpha plane, or `None` when every pixel is opaque.
    pub fn alpha_samples(&self) -> Option<Vec<u8>> {
        if !self.image.color().has_alpha() {
            return None;
        }
        let rgba = self.image.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(alpha)
        }
    }

    /// Identity of the decoded image, shared by clones and never reused.
    pub(crate) const fn key(&self) -> u64 {
        self.id
    }
}

impl std::fmt::Debug for ImageReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.size();
        f.debug_struct("ImageReader")
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

/// Either an already decoded image or a file to decode on use.
#[derive(Debug, Clone)]
pub enum ImageSource<'a> {
    Reader(&'a ImageReader),
    File(Cow<'a, Path>),
}

impl ImageSource<'_> {
    pub(crate) fn resolve(&self) -> Result<Cow<'_, ImageReader>> {
        match self {
            ImageSource::Reader(reader) => Ok(Cow::Borrowed(*reader)),
            ImageSource::File(path) => ImageReader::open(path).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a ImageReader> for ImageSource<'a> {
    fn from(reader: &'a ImageReader) -> Self {
        ImageSource::Reader(reader)
    }
}

impl<'a> From<&'a str> for ImageSource<'a> {
    fn from(path: &'a str) -> Self {
        ImageSource::File(Cow::Borrowed(Path::new(path)))
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::File(Cow::Borrowed(path))
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageSource::File(Cow::Borrowed(path.as_path()))
    }
}

impl From<PathBuf> for ImageSource<'_> {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(Cow::Owned(path))
    }
}

/// Colour-key transparency: pixels whose red, green and blue samples all
/// fall in the given inclusive ranges are not painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMask(pub [u8; 6]);

impl ColorMask {
    pub const fn new(red: (u8, u8), green: (u8, u8), blue: (u8, u8)) -> Self {
        Self([red.0, red.1, green.0, green.1, blue.0, blue.1])
    }

    /// `[Rmin, Rmax, Gmin, Gmax, Bmin, Bmax]`
    pub const fn ranges(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for ColorMask {
    fn from(ranges: [u8; 6]) -> Self {
        Self(ranges)
    }
}
