pub mod components;
pub mod markdown;
pub mod registry;
pub mod traits;

pub use components::*;
pub use markdown::*;
pub use registry::*;
pub use traits::*;
