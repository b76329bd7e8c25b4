//! Declarative deck generation.
//!
//! A JSON deck description is compiled into a python-pptx script, which is
//! then run through the script sandbox like any other generation script.

pub mod error;
pub mod generator;
pub mod script;
pub mod spec;
pub mod theme;

pub use error::GenerateError;
pub use generator::DeckGenerator;
pub use script::compile_script;
pub use spec::{DeckSpec, SlideLayout, SlideSpec, TextBoxSpec};
pub use theme::Theme;
