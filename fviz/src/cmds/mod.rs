pub use list::*;
pub use tracks::*;

mod list;
mod tracks;
