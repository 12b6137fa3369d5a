//! Version-indexed access to game state.

mod accessor;
mod draw;
mod functions;
pub mod layout;
mod unit;
mod window;

pub use accessor::*;
pub use draw::*;
pub use functions::*;
pub use unit::*;
pub use window::*;
