//! [`NativeGl`]: [`GlApi`] over raw OpenGL calls.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;

use anyhow::Result;
use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use hotshader_core::StageKind;

use crate::api::GlApi;
use crate::gl_backend;

/// Raw OpenGL implementation of [`GlApi`].
///
/// Zero-sized; every call goes to the context current on the calling thread.
/// Not `Send`, so a handle cannot wander off the thread it was created on.
#[derive(Debug, Clone, Copy)]
pub struct NativeGl {
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// Load GL function pointers with `gl_loader` and return a handle.
    ///
    /// # Safety
    ///
    /// An OpenGL context must be current on this thread, and every later call
    /// through the returned handle must happen while that context (or one
    /// sharing its objects) is current.
    pub unsafe fn load() -> Result<Self> {
        gl_backend::load_system_gl()?;
        Ok(Self {
            _not_send: PhantomData,
        })
    }

    /// Load GL function pointers with a resolver from the windowing library.
    ///
    /// # Safety
    ///
    /// Same requirements as [`NativeGl::load`].
    pub unsafe fn load_with<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl_backend::load_with(loader)?;
        Ok(Self {
            _not_send: PhantomData,
        })
    }
}

fn stage_enum(stage: StageKind) -> GLenum {
    match stage {
        StageKind::Vertex => gl::VERTEX_SHADER,
        StageKind::Geometry => gl::GEOMETRY_SHADER,
        StageKind::Fragment => gl::FRAGMENT_SHADER,
        StageKind::Compute => gl::COMPUTE_SHADER,
    }
}

/// Read an info log of `length` bytes (including the terminating NUL).
fn read_info_log(length: GLint, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    if length <= 0 {
        return String::new();
    }

    let mut buffer = vec![0u8; length as usize];
    let mut written: GLsizei = 0;
    read(length, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.max(0) as usize);

    String::from_utf8_lossy(&buffer).into_owned()
}

/// Read `count` uniform names through one buffer of `max_length` bytes, the
/// size the program reported for its longest name.
fn read_uniform_names(
    count: GLint,
    max_length: GLint,
    mut read: impl FnMut(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> Vec<String> {
    if count <= 0 || max_length <= 0 {
        return Vec::new();
    }

    let mut buffer = vec![0u8; max_length as usize];
    (0..count as GLuint)
        .map(|index| {
            let mut written: GLsizei = 0;
            read(index, max_length, &mut written, buffer.as_mut_ptr() as *mut GLchar);
            let len = (written.max(0) as usize).min(buffer.len());
            String::from_utf8_lossy(&buffer[..len]).into_owned()
        })
        .collect()
}

// SAFETY (all methods): `NativeGl` can only be obtained through the unsafe
// constructors, whose callers guarantee a current context on this thread.
impl GlApi for NativeGl {
    fn create_shader(&self, stage: StageKind) -> GLuint {
        unsafe { gl::CreateShader(stage_enum(stage)) }
    }

    fn compile_shader(&self, shader: GLuint, source: &str) {
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                [source.as_ptr() as *const GLchar].as_ptr(),
                [source.len() as GLint].as_ptr(),
            );
            gl::CompileShader(shader);
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut length = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length) };
        read_info_log(length, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buffer)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut length = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length) };
        read_info_log(length, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, len, written, buffer)
        })
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn active_uniform_names(&self, program: GLuint) -> Vec<String> {
        let mut count = 0;
        let mut max_length = 0;
        unsafe {
            gl::GetProgramiv(program, gl::ACTIVE_UNIFORMS, &mut count);
            gl::GetProgramiv(program, gl::ACTIVE_UNIFORM_MAX_LENGTH, &mut max_length);
        }

        read_uniform_names(count, max_length, |index, len, written, buffer| {
            let mut size: GLint = 0;
            let mut ty: GLenum = 0;
            unsafe {
                gl::GetActiveUniform(program, index, len, written, &mut size, &mut ty, buffer)
            }
        })
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        // Interior NUL: no GL name can match.
        let Ok(name) = CString::new(name) else {
            return -1;
        };
        unsafe { gl::GetUniformLocation(program, name.as_ptr() as *const GLchar) }
    }
}
