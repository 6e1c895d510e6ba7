//! Whole-program assembly: preamble, the three cylinder passes, and the closing move.
use std::fmt;
use std::path::Path;

use nalgebra::Vector2;
use tracing::info;

use crate::error::{Error, Result};
use crate::raster::{check_body, check_non_empty, Raster};
use crate::toolpath::{generate_pass, PrintState};
use crate::{g0, g21, g28, g90, heating, z, Program, ProgramSink};

/// Printer settings that come from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    /// Bed size along X, in mm
    pub bed_width: f64,
    /// Bed size along Y, in mm
    pub bed_depth: f64,
    /// Z rise per revolution, in mm
    pub layer_height: f64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            bed_width: 200.0,
            bed_depth: 200.0,
            layer_height: 0.2,
        }
    }
}

impl PrinterConfig {
    /// The shade is printed around the middle of the bed.
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.bed_width / 2.0, self.bed_depth / 2.0)
    }
}

/// Cylinder parameters for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pass {
    /// Inner wall radius, in mm
    pub radius: f64,
    /// Maximum outward displacement for a black pixel, in mm
    pub amplitude: f64,
}

pub const HEADER: Pass = Pass {
    radius: 72.0,
    amplitude: 7.0,
};

pub const BODY: Pass = Pass {
    radius: 76.0,
    amplitude: 1.5,
};

pub const FOOTER: Pass = Pass {
    radius: 76.0,
    amplitude: 3.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Body,
    Footer,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "header"),
            Section::Body => write!(f, "body"),
            Section::Footer => write!(f, "footer"),
        }
    }
}

/// Build the complete program for a lamp shade.
///
/// `body` must be exactly 1200x400; it is checked before anything is generated.
/// `decoration` is printed below the body at a small radius and above it with a deeper
/// relief. `progress` is called once per image row with the section, row, and row count.
pub fn assemble(
    config: &PrinterConfig,
    body: &dyn Raster,
    decoration: &dyn Raster,
    progress: &mut dyn FnMut(Section, u32, u32),
) -> Result<Program> {
    check_body(body)?;
    check_non_empty(decoration)?;

    let mut program = Program::new();
    let mut state = PrintState::new(config.center(), config.layer_height);

    g28(&mut program);
    heating(&mut program);
    g21(&mut program);
    g90(&mut program);
    state.reset_extrusion(&mut program, 0.0);
    g0(&mut program, z(state.z()));

    for (section, raster, pass) in [
        (Section::Header, decoration, HEADER),
        (Section::Body, body, BODY),
        (Section::Footer, decoration, FOOTER),
    ] {
        info!(%section, "Generating");
        generate_pass(
            &mut program,
            &mut state,
            raster,
            pass.radius,
            pass.amplitude,
            config.layer_height,
            &mut |row, rows| progress(section, row, rows),
        );
    }

    program.line("G0 X0 Y0");

    info!(
        lines = program.len(),
        height = state.z(),
        filament = state.e(),
        "Program assembled"
    );
    Ok(program)
}

/// Assemble a program and hand it to `sink` for `path`.
///
/// An empty `path` is refused before any generation happens.
pub fn assemble_to(
    sink: &mut dyn ProgramSink,
    path: &Path,
    config: &PrinterConfig,
    body: &dyn Raster,
    decoration: &dyn Raster,
    progress: &mut dyn FnMut(Section, u32, u32),
) -> Result<Program> {
    if path.as_os_str().is_empty() {
        return Err(Error::NoOutputPath);
    }
    let program = assemble(config, body, decoration, progress)?;
    sink.write_program(path, &program)?;
    Ok(program)
}
