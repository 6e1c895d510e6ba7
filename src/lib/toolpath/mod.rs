use nalgebra::{Point3, Vector2};
use tracing::{debug, info};

use crate::geometry::{depth, polar};
use crate::raster::Raster;
use crate::{g0, g1, g92, xyf, xyze, Program, TRAVEL_FEED};

/// Filament length fed per mm of travel. Calibrated by hand for a 0.4mm nozzle.
pub const FILAMENT_RATIO: f64 = 20.0;

/// Machine state shared by every pass of one program: nozzle height, extruder
/// position, and where the cylinder axis sits on the bed.
#[derive(Debug, Clone)]
pub struct PrintState {
    z: f64,
    e: f64,
    center: Vector2<f64>,
}

impl PrintState {
    pub fn new(center: Vector2<f64>, z: f64) -> Self {
        Self { z, e: 0.0, center }
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    /// Redefine the current extruder position, emitting the matching G92.
    pub fn reset_extrusion(&mut self, program: &mut Program, e: f64) {
        self.e = e;
        g92(program, e);
    }

    /// Rapid to `p` without extruding. Only X and Y are sent.
    fn travel(&self, program: &mut Program, p: &Point3<f64>) {
        g0(
            program,
            xyf(p.x + self.center.x, p.y + self.center.y, TRAVEL_FEED),
        );
    }

    /// Print a line to `p`, feeding `delta` more filament.
    fn extrude(&mut self, program: &mut Program, p: &Point3<f64>, delta: f64) {
        self.e += delta;
        g1(
            program,
            xyze(p.x + self.center.x, p.y + self.center.y, p.z, self.e),
        );
    }
}

/// Per-pass wall tracking: where the nozzle last went, and which wall the next sample is on.
struct Walls {
    prev: Option<Point3<f64>>,
    inner: bool,
}

impl Walls {
    fn radius(&self, base: f64, depth: f64) -> f64 {
        if self.inner {
            base
        } else {
            base + depth
        }
    }

    /// Extrude from the previous point to `p`.
    fn print_to(&mut self, program: &mut Program, state: &mut PrintState, p: Point3<f64>) {
        let prev = self.prev.unwrap_or(p);
        state.extrude(program, &p, (p - prev).norm() / FILAMENT_RATIO);
        self.prev = Some(p);
    }
}

/// Wrap `raster` once around a cylinder of `radius`, pushing the outer wall out by up to
/// `amplitude` for dark pixels.
///
/// Each image row is one layer: Z climbs `layer_height / width` per column, so a row adds
/// exactly `layer_height`. Samples alternate between the inner wall and the displaced
/// outer wall, and every sample after the first is followed by a second move to the other
/// wall at the same angle and height.
///
/// `progress` is called with `(row, rows)` before each row.
pub fn generate_pass(
    program: &mut Program,
    state: &mut PrintState,
    raster: &dyn Raster,
    radius: f64,
    amplitude: f64,
    layer_height: f64,
    progress: &mut dyn FnMut(u32, u32),
) {
    let width = raster.width();
    let height = raster.height();
    let angle_step = 360.0 / width as f64;
    let z_step = layer_height / width as f64;

    info!(width, height, radius, amplitude, z = state.z, "Starting pass");

    let mut walls = Walls {
        prev: None,
        inner: true,
    };

    for row in 0..height {
        progress(row, height);
        debug!(row, z = state.z, e = state.e, "Row");

        for col in 0..width {
            let angle = col as f64 * angle_step;
            let d = depth(raster.intensity(row, col), amplitude);

            let pos = polar(angle, walls.radius(radius, d));
            walls.inner = !walls.inner;
            state.z += z_step;

            let p = Point3::new(pos.x, pos.y, state.z);
            if walls.prev.is_none() {
                // First point of the pass: get there without stringing
                state.travel(program, &p);
                walls.prev = Some(p);
                continue;
            }
            walls.print_to(program, state, p);

            // Then straight across to the other wall
            let pos = polar(angle, walls.radius(radius, d));
            walls.print_to(program, state, Point3::new(pos.x, pos.y, state.z));
        }
    }

    info!(z = state.z, e = state.e, "Finished pass");
}
