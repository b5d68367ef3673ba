pub use aeroapi::*;
pub use memory::*;
pub use snapshot::*;
pub use store::*;

mod aeroapi;
mod memory;
mod snapshot;
mod store;
