//! The layer builders.
//!
//! They only look at the positions, never at the flight itself, and every builder is
//! independent from the others.
//!

pub use camera::*;
pub use path::*;
pub use placemark::*;
pub use vector::*;

mod camera;
mod path;
mod placemark;
mod vector;
