//! Hot-reloadable GPU shader programs built from one composite source.
//!
//! This crate ties together [`hotshader_core`] (source loading and stage
//! splitting) and [`hotshader_gl`] (the GL capability) into a [`Shader`] that
//! owns one linked program and can rebuild it when its file changes.
//!
//! # Overview
//!
//! - [`Shader`] is the aggregate: program, uniform table, source origin and
//!   modification watch.
//! - [`build_program`] compiles stage slices and links them.
//! - [`UniformTable`] caches uniform locations and remembers inactive names.
//! - [`ShaderConfig`] selects bind-time hot reload and the poll interval.
//!
//! # Source format
//!
//! ```text
//! INCLUDE "common_vertex.glsl"
//! FRAGMENT
//! #version 330
//! out vec4 color;
//! void main() { color = vec4(1.0); }
//! ```
//!
//! Markers may come in any order; at least one is required.
//!
//! # Example
//!
//! ```rust,ignore
//! let gl = unsafe { hotshader_gl::NativeGl::load()? };
//! let mut shader = Shader::from_file_with_config(
//!     gl,
//!     "shaders/sprite.glsl",
//!     ShaderConfig::default().with_hot_reload(true),
//! );
//!
//! loop {
//!     if shader.hot_reload(frame_time) {
//!         mvp = shader.uniform_location("MVP");
//!     }
//!     shader.bind();
//!     // draw
//! }
//! ```

pub mod config;
pub mod pipeline;
pub mod program;
pub mod shader;
pub mod uniforms;
pub mod watch;

#[cfg(test)]
mod testing;

pub use config::{ShaderConfig, DEFAULT_POLL_INTERVAL};
pub use hotshader_core::{logging, ShaderError, SourceOrigin, StageKind};
pub use pipeline::build_program;
pub use program::Program;
pub use shader::{ReloadOutcome, Shader};
pub use uniforms::UniformTable;
pub use watch::ModificationWatch;
