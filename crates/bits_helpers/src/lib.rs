mod bit;
pub use bit::*;

pub mod input;
