pub mod market;
pub mod prediction;
pub mod signals;

pub use market::*;
pub use prediction::*;
pub use signals::*;
