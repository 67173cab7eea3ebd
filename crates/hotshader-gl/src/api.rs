//! Common interface over the shader and program calls of a GL context.

use gl::types::{GLint, GLuint};
use hotshader_core::StageKind;

/// Shader/program object calls against one graphics context.
///
/// Object names are plain `GLuint`s. `0` never names a live object.
/// Implementations are cheap handles: cloning one must not create a second
/// context.
pub trait GlApi: Clone {
    /// Create an empty shader object for the given stage.
    fn create_shader(&self, stage: StageKind) -> GLuint;

    /// Upload `source` to a shader object and compile it.
    fn compile_shader(&self, shader: GLuint, source: &str);

    /// Whether the last compilation of `shader` succeeded.
    fn compile_status(&self, shader: GLuint) -> bool;

    fn shader_info_log(&self, shader: GLuint) -> String;

    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;

    fn attach_shader(&self, program: GLuint, shader: GLuint);

    fn detach_shader(&self, program: GLuint, shader: GLuint);

    fn link_program(&self, program: GLuint);

    /// Whether the last link of `program` succeeded.
    fn link_status(&self, program: GLuint) -> bool;

    fn program_info_log(&self, program: GLuint) -> String;

    fn delete_program(&self, program: GLuint);

    /// Make `program` current for draws and dispatches. `0` unbinds.
    fn use_program(&self, program: GLuint);

    /// Names of every active uniform of a linked program, exactly as the
    /// driver reports them, in index order.
    fn active_uniform_names(&self, program: GLuint) -> Vec<String>;

    /// Location of a uniform by name, `-1` if the driver has none for it.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
}
