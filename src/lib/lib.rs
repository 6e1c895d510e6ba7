//! Toolpath generation for cylindrical lithophane lamp shades.
//!
//! A grayscale image is wrapped around a cylinder, one pixel row per layer and one
//! pixel column per angular step. Dark pixels push the wall outwards, so less light
//! gets through.
use std::fmt::Write;

pub mod assembly;
pub mod error;
pub mod geometry;
pub mod patterns;
pub mod program;
pub mod raster;
pub mod toolpath;

pub use assembly::{assemble, assemble_to, Pass, PrinterConfig, Section};
pub use error::{Error, Result};
pub use program::{FileSink, MemorySink, Program, ProgramSink};
pub use raster::{GrayRaster, Raster};
pub use toolpath::{generate_pass, PrintState};

/// Feed rate, in mm/min, for non-extruding positioning moves.
pub const TRAVEL_FEED: f64 = 1000.0;

/// Hotend temperature, in C.
pub const HOTEND_TEMP: u32 = 220;
/// Bed temperature, in C.
pub const BED_TEMP: u32 = 60;

/// Home all axes.
pub fn g28(program: &mut Program) {
    program.line("G28");
}

/// Absolute positioning.
pub fn g90(program: &mut Program) {
    program.line("G90");
}

/// Millimetre units.
pub fn g21(program: &mut Program) {
    program.line("G21");
}

/// Set the current extruder position to `e`.
pub fn g92(program: &mut Program, e: f64) {
    program.line(&format!("G92 E{}", fixed(e)));
}

/// Start the hotend warming, wait for the bed, then wait for the hotend.
pub fn heating(program: &mut Program) {
    program.line(&format!("M104 S{HOTEND_TEMP}"));
    program.line(&format!("M190 S{BED_TEMP}"));
    program.line(&format!("M109 S{HOTEND_TEMP}"));
}

#[derive(Clone, Debug, Default)]
pub struct PosAndFeed {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    e: Option<f64>,
    feed: Option<f64>,
}

pub fn xyf(x: f64, y: f64, feed: f64) -> PosAndFeed {
    PosAndFeed {
        x: Some(x),
        y: Some(y),
        feed: Some(feed),
        ..Default::default()
    }
}

pub fn xyze(x: f64, y: f64, z: f64, e: f64) -> PosAndFeed {
    PosAndFeed {
        x: Some(x),
        y: Some(y),
        z: Some(z),
        e: Some(e),
        feed: None,
    }
}

pub fn z(z: f64) -> PosAndFeed {
    PosAndFeed {
        z: Some(z),
        ..Default::default()
    }
}

impl PosAndFeed {
    fn as_gvals(&self, out: &mut String) {
        if self.x.is_none() && self.y.is_none() && self.z.is_none() {
            panic!("Refusing to make illegal move");
        }
        g_val(out, "X", self.x);
        g_val(out, "Y", self.y);
        g_val(out, "Z", self.z);
        g_val(out, "E", self.e);
        if let Some(feed) = self.feed {
            let _ = write!(out, " F{feed:.0}");
        }
    }
}

/// Format `v` with exactly three fractional digits.
pub fn fixed(v: f64) -> String {
    format!("{v:.3}")
}

/// Emit a gcode parameter value, if `ov` is `Some`.
fn g_val(out: &mut String, name: &str, ov: Option<f64>) {
    if let Some(v) = ov {
        assert!(v.is_finite(), "Refusing to emit non-finite {name}");
        // Writing to a String can't fail
        let _ = write!(out, " {name}{}", fixed(v));
    }
}

fn g_move_linear(program: &mut Program, g: &str, p: &PosAndFeed) {
    let mut line = String::from(g);
    p.as_gvals(&mut line);
    program.line(&line);
}

/// Non-extruding move.
pub fn g0(program: &mut Program, p: PosAndFeed) {
    assert!(p.e.is_none(), "g0 moves must not extrude");
    g_move_linear(program, "G0", &p)
}

/// Extruding move. `E` is the absolute extruder position after the move.
pub fn g1(program: &mut Program, p: PosAndFeed) {
    assert!(p.e.is_some(), "g1 moves must include an extruder position");
    g_move_linear(program, "G1", &p)
}
