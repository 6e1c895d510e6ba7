//! Procedural decorative bands, used above and below the lamp body.
use crate::raster::GrayRaster;

/// Circumference of the stock band, matching the body image so columns line up.
pub const BAND_WIDTH: u32 = 1200;
/// Rows (layers) in the stock band.
pub const BAND_HEIGHT: u32 = 24;

const DARK: u8 = 0;
const LIGHT: u8 = 255;

/// A band of `n` evenly spaced vertical ribs between two solid rims.
///
/// Ribs whose index is a multiple of any entry in `skip_mods` are left out, which
/// gives the band a rhythm (e.g. `&[5]` drops every fifth rib). `duty` is the fraction
/// of each rib period that is dark, and `rim` is the number of solid rows top and bottom.
pub fn radial_ribs(
    width: u32,
    height: u32,
    n: u32,
    duty: f64,
    rim: u32,
    skip_mods: &[u32],
) -> GrayRaster {
    GrayRaster::from_fn(width, height, |row, col| {
        if row < rim || row + rim >= height {
            return DARK;
        }
        let t = f64::from(col) * f64::from(n) / f64::from(width);
        let rib = t.floor() as u32;
        if skip_mods.iter().any(|m| rib % m == 0) {
            return LIGHT;
        }
        if t - t.floor() < duty {
            DARK
        } else {
            LIGHT
        }
    })
}

/// The stock header/footer band.
pub fn header_footer() -> GrayRaster {
    radial_ribs(BAND_WIDTH, BAND_HEIGHT, 120, 0.5, 3, &[6])
}
