// Other modules in this crate `use crate::errors::*;` to get the Error, ErrorKind,
// ResultExt and Result types that `error_chain!` creates.
use error_chain::*;

error_chain! {

    errors {
        InvalidDimension(width: i32, height: i32) {
            description("invalid grid dimension")
            display("invalid grid dimension {}x{}: width and height must be positive", width, height)
        }

        InvalidCoordinate(x: i32, y: i32, width: i32, height: i32) {
            description("invalid grid coordinate")
            display("coordinate ({}, {}) is outside the {}x{} grid", x, y, width, height)
        }

        InvalidCellSize(size: f32) {
            description("invalid cell size")
            display("invalid cell size {}: must be a positive finite number", size)
        }

        InvalidWallSide(raw: u8) {
            description("invalid wall side")
            display("invalid wall side {}: expected 0 (top), 1 (right), 2 (bottom) or 3 (left)", raw)
        }
    }
}
