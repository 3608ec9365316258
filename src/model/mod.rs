pub mod index;
pub mod types;

pub use index::*;
pub use types::*;
