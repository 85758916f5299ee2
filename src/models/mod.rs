pub mod recommendation;
pub mod snippet;

pub use recommendation::*;
pub use snippet::*;
