//! # docdown
//!
//! Renders a parsed documentation object tree (modules, classes, functions
//! and attributes with structured docstrings) to markdown.
//!
//! ```
//! use docdown::{build, Entity, Kind, Node, Parameter, Render};
//!
//! let add = Entity::new(Kind::Function, "add").with_parameters(vec![
//!     Parameter::new("a").annotated("int"),
//!     Parameter::new("b").annotated("int").with_default("0"),
//! ]);
//!
//! let renderer = build("markdown").unwrap();
//! assert_eq!(
//!     renderer.render(Node::Entity(&add)).unwrap(),
//!     "## add { #add }\n\n`add(a: int, b: int = 0)`"
//! );
//! ```

pub mod error;
pub mod model;
pub mod renderer;


pub use error::*;
pub use model::*;
pub use renderer::*;
