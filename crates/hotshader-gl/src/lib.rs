//! The graphics-subsystem capability used to build shader programs.
//!
//! [`GlApi`] is the narrow set of shader/program calls the build pipeline
//! needs. [`NativeGl`] implements it on top of raw OpenGL through the `gl`
//! crate.
//!
//! ### Warning
//!
//! Every call is issued on the current thread and assumes an OpenGL context
//! is current there.

pub mod api;
mod gl_backend;
pub mod native;

pub use api::GlApi;
pub use gl::types::{GLenum, GLint, GLuint};
pub use native::NativeGl;
