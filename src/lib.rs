//! Import published Shadertoy projects as SHADERed projects.
//!
//! The pipeline runs in one synchronous pass: fetch the shader JSON, parse its
//! render-pass graph, resolve which passes and inputs become render targets and
//! textures, emit the `.sprj` project tree plus per-pass GLSL, then write
//! everything (and the referenced textures) below an output directory.

pub mod config;
pub mod error;
pub mod graph;
pub mod import;
pub mod materialize;
pub mod plugin;
pub mod project;
pub mod remote;
pub mod resolve;

pub use config::ImporterConfig;
pub use error::ImportError;
pub use import::{ImportReport, generate, import_shader};
pub use remote::{Fetch, FetchResponse, RemoteClient};
