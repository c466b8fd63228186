//! LUT loading module
//!
//! Reads a LUT image into a `LutSpec` and validates its cube geometry.

mod loader;
pub mod types;

pub use loader::load_lut;
pub use types::{DEFAULT_CUBE_TOLERANCE, LutSpec, cube_level};
