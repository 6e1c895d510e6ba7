//! G-Code generator for cylindrical lithophane lamp shades.
//! The image is wrapped once around the shade, one pixel row per layer. Dark pixels
//! make the wall thicker, so they show up dark when the lamp is lit.
use anyhow::{Context, Result};
use lithophane::assembly::{assemble_to, Section, BODY, FOOTER, HEADER};
use lithophane::raster::{self, Raster, BODY_HEIGHT, BODY_WIDTH};
use lithophane::{patterns, FileSink, PrinterConfig};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lithophane_gen",
    about = "Generates a cylindrical lithophane lamp shade from a 1200x400 image"
)]
struct Opt {
    /// Image to wrap around the shade. Must be 1200x400 pixels.
    #[structopt(short, long, parse(from_os_str))]
    image: PathBuf,

    /// Image for the decorative bands above and below the body. Defaults to a ribbed band.
    #[structopt(long, parse(from_os_str))]
    header_footer: Option<PathBuf>,

    /// Bed width (X), in mm
    #[structopt(long, default_value = "200")]
    bed_width: f64,

    /// Bed depth (Y), in mm
    #[structopt(long, default_value = "200")]
    bed_depth: f64,

    /// Layer height, in mm
    #[structopt(long, default_value = "0.2")]
    layer_height: f64,

    /// Output file for the resulting G code
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,
}

impl Opt {
    fn config(&self) -> PrinterConfig {
        PrinterConfig {
            bed_width: self.bed_width,
            bed_depth: self.bed_depth,
            layer_height: self.layer_height,
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn help_text(opt: &Opt, band_rows: u32) {
    let config = opt.config();
    let center = config.center();
    let rows = BODY_HEIGHT + 2 * band_rows;
    let widest = [HEADER, BODY, FOOTER]
        .iter()
        .map(|p| p.radius + p.amplitude)
        .fold(0.0, f64::max);
    println!(
        "Before print:
        - Body image {} must be {BODY_WIDTH}x{BODY_HEIGHT} pixels
        - Shade is centered at X{} Y{}, outer diameter up to {}mm
        - Height {}mm over {} layers",
        opt.image.display(),
        center.x,
        center.y,
        2.0 * widest,
        config.layer_height * f64::from(rows + 1),
        rows,
    )
}

fn main() -> Result<()> {
    init_logging();
    let opt = Opt::from_args();

    let body = raster::load(&opt.image)
        .with_context(|| format!("Loading body image {}", opt.image.display()))?;
    let decoration: Box<dyn Raster> = match &opt.header_footer {
        Some(path) => Box::new(
            raster::load(path)
                .with_context(|| format!("Loading header/footer image {}", path.display()))?,
        ),
        None => Box::new(patterns::header_footer()),
    };
    help_text(&opt, decoration.height());

    let mut last_section = None;
    let program = assemble_to(
        &mut FileSink,
        &opt.output,
        &opt.config(),
        &body,
        decoration.as_ref(),
        &mut |section: Section, row, rows| {
            if last_section != Some(section) {
                info!(%section, rows, "Generating section");
                last_section = Some(section);
            }
            if row % 50 == 0 {
                debug!(%section, row, rows, "Progress");
            }
        },
    )
    .with_context(|| format!("Generating {}", opt.output.display()))?;

    info!(lines = program.len(), output = %opt.output.display(), "GCODE saved");
    Ok(())
}
