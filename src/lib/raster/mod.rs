//! Grayscale image access for the toolpath generator.

use std::path::Path;

use image::GrayImage;
use tracing::debug;

use crate::error::{Error, Result};

/// Width, in pixels, a lamp body image must have. One pixel per angular step.
pub const BODY_WIDTH: u32 = 1200;
/// Height, in pixels, a lamp body image must have. One pixel row per layer.
pub const BODY_HEIGHT: u32 = 400;

/// A read-only grayscale image.
pub trait Raster {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Grayscale intensity at `row`, `col`, with 0 black and 255 white.
    fn intensity(&self, row: u32, col: u32) -> u8;
}

impl Raster for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn intensity(&self, row: u32, col: u32) -> u8 {
        self.get_pixel(col, row).0[0]
    }
}

/// Row-major owned grayscale buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayRaster {
    /// Build a raster from rows of intensities. All rows must be the same length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.first().map_or(0, |r| r.len());
        assert!(
            rows.iter().all(|r| r.len() == width),
            "Refusing to build a ragged raster"
        );
        Self {
            width: width as u32,
            height: rows.len() as u32,
            pixels: rows.concat(),
        }
    }

    /// Build a raster by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

impl Raster for GrayRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn intensity(&self, row: u32, col: u32) -> u8 {
        self.pixels[(row * self.width + col) as usize]
    }
}

/// Load any image format the `image` crate understands, as 8-bit luma.
pub fn load(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded image");
    Ok(img.to_luma8())
}

/// A lamp body must be exactly `BODY_WIDTH` x `BODY_HEIGHT`.
pub fn check_body(raster: &dyn Raster) -> Result<()> {
    if raster.width() == BODY_WIDTH && raster.height() == BODY_HEIGHT {
        Ok(())
    } else {
        Err(Error::ImageSize {
            expected_width: BODY_WIDTH,
            expected_height: BODY_HEIGHT,
            width: raster.width(),
            height: raster.height(),
        })
    }
}

/// Any raster fed to the generator needs at least one pixel, so the angular step is finite.
pub fn check_non_empty(raster: &dyn Raster) -> Result<()> {
    if raster.width() == 0 || raster.height() == 0 {
        Err(Error::EmptyImage)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_body_size_check() {
        let ok = GrayRaster::from_fn(1200, 400, |_, _| 128);
        assert!(check_body(&ok).is_ok());

        let tall = GrayRaster::from_fn(1200, 401, |_, _| 128);
        match check_body(&tall) {
            Err(Error::ImageSize { width, height, .. }) => {
                assert_eq!((width, height), (1200, 401));
            }
            other => panic!("Expected size error, got {other:?}"),
        }

        let narrow = GrayRaster::from_fn(1199, 400, |_, _| 128);
        assert!(check_body(&narrow).is_err());
    }

    #[test]
    fn test_empty_check() {
        let empty = GrayRaster::from_rows(&[]);
        assert!(matches!(check_non_empty(&empty), Err(Error::EmptyImage)));
        let one = GrayRaster::from_rows(&[&[3]]);
        assert!(check_non_empty(&one).is_ok());
    }

    #[test]
    fn test_gray_raster_indexing() {
        let r = GrayRaster::from_rows(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 2);
        assert_eq!(r.intensity(0, 2), 3);
        assert_eq!(r.intensity(1, 0), 4);
    }

    #[test]
    fn test_gray_image_is_row_col() {
        let mut img = GrayImage::new(4, 2);
        img.put_pixel(3, 1, Luma([200]));
        assert_eq!(Raster::width(&img), 4);
        assert_eq!(Raster::height(&img), 2);
        assert_eq!(img.intensity(1, 3), 200);
        assert_eq!(img.intensity(0, 0), 0);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(Error::Image { .. })));
    }

    #[test]
    fn test_load_converts_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([255, 255, 255]));
        rgb.save(&path).unwrap();
        let gray = load(&path).unwrap();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.intensity(1, 2), 255);
    }
}
