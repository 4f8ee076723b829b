//! SHADERed project synthesis: the `.sprj` tree and the GLSL that goes with it.

pub mod document;
pub mod emit;
pub mod templates;

pub use document::{ProjectDocument, XmlElement, XmlNode};
pub use emit::{emit, emit_shader_source};

pub const PROJECT_FILE: &str = "project.sprj";
